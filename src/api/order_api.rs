// ==========================================
// 鞋业生产订单系统 - 生产单 API
// ==========================================
// 职责: 生产单录入、列表检索、批次表查看/保存、删除、CSV 导出与回读
// 约束: 校验失败不发生任何写入；创建/保存/删除均为单事务
// ==========================================

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::{validate_order_form, OrderForm};
use crate::config::allocation_config::AllocationConfig;
use crate::domain::lot::LotEntry;
use crate::domain::lot_sheet::LotSheet;
use crate::domain::order::{OrderSummary, ProductionOrder};
use crate::engine::lot_allocator::LotAllocator;
use crate::engine::lot_validator::{LotSheetValidator, LotTotalViolation};
use crate::exporter::{self, order_csv, ExportLayout};
use crate::repository::error::RepositoryError;
use crate::repository::lot_repo::{LotEntryRepository, SaveCellsOutcome};
use crate::repository::order_repo::OrderRepository;

// ==========================================
// 响应类型
// ==========================================

/// 创建生产单结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    pub order: ProductionOrder,
    pub allocated_pairs: u32,
    /// 超出轮次容量而未分配的双数
    pub unplaced_pairs: u32,
    pub lot_count: usize,
}

/// 批次展示行（派生字段）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotView {
    pub round: u32,
    pub lot_number: u32,
    pub lot_code: String,
    pub sizes_label: String,
    pub total: u32,
    pub status: String,
}

/// 生产单详情
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub order: ProductionOrder,
    pub sheet: LotSheet,
    pub lots: Vec<LotView>,
    pub grand_total: u32,
    /// 保存前需补齐的批次
    pub violations: Vec<LotTotalViolation>,
}

impl OrderDetail {
    fn new(order: ProductionOrder, sheet: LotSheet) -> Self {
        let lots = sheet
            .rounds
            .iter()
            .flat_map(|round| {
                round.lots.iter().map(|lot| LotView {
                    round: round.round,
                    lot_number: lot.lot_number,
                    lot_code: sheet.lot_code(round.round, lot.lot_number),
                    sizes_label: lot.sizes_label(&sheet.size_labels),
                    total: lot.total(),
                    status: sheet.lot_status(lot).to_string(),
                })
            })
            .collect();
        let grand_total = sheet.grand_total();
        let violations = LotSheetValidator::collect_violations(&sheet);
        Self {
            order,
            sheet,
            lots,
            grand_total,
            violations,
        }
    }
}

// ==========================================
// OrderApi - 生产单 API
// ==========================================
pub struct OrderApi {
    order_repo: Arc<OrderRepository>,
    lot_repo: Arc<LotEntryRepository>,
    allocator: Arc<LotAllocator>,
}

impl OrderApi {
    /// 创建新的OrderApi实例
    pub fn new(
        order_repo: Arc<OrderRepository>,
        lot_repo: Arc<LotEntryRepository>,
        allocator: Arc<LotAllocator>,
    ) -> Self {
        Self {
            order_repo,
            lot_repo,
            allocator,
        }
    }

    fn config(&self) -> &AllocationConfig {
        self.allocator.config()
    }

    // ==========================================
    // 录入
    // ==========================================

    /// 创建生产单并生成初始批次
    ///
    /// # 流程
    /// 1. 表单校验（失败不写库）
    /// 2. 按产品类型的尺码曲线分批
    /// 3. 生产单与批次在同一事务内写入
    ///
    /// # 返回
    /// - Err(DuplicateOrderNumber): 生产单号已存在，不写入任何数据
    #[instrument(skip(self, form), fields(order_no = %form.order_no))]
    pub fn create_order(&self, form: &OrderForm) -> ApiResult<CreateOrderResponse> {
        let new_order = validate_order_form(form)?;

        if self.order_repo.find_by_order_no(new_order.order_no)?.is_some() {
            return Err(ApiError::DuplicateOrderNumber {
                order_no: new_order.order_no,
            });
        }

        let plan = self
            .allocator
            .allocate(new_order.total_pairs, new_order.product_type)?;

        let created_at = Local::now().naive_local();
        let order_id = self
            .order_repo
            .create_with_lots(&new_order, created_at, &plan.lots)
            .map_err(|e| match e {
                RepositoryError::UniqueConstraintViolation(_) => ApiError::DuplicateOrderNumber {
                    order_no: new_order.order_no,
                },
                other => other.into(),
            })?;

        let order = self
            .order_repo
            .find_by_id(order_id)?
            .ok_or_else(|| ApiError::InternalError(format!("生产单写入后无法读取: {}", order_id)))?;

        if !plan.is_fully_placed() {
            warn!(
                order_id,
                unplaced_pairs = plan.unplaced_pairs,
                "生产单需求超出可分配容量"
            );
        }
        info!(
            order_id,
            lot_rows = plan.lots.len(),
            allocated_pairs = plan.allocated_pairs,
            "生产单创建完成"
        );

        let lot_count = {
            let mut keys: Vec<(u32, u32)> =
                plan.lots.iter().map(|c| (c.round, c.lot_number)).collect();
            keys.dedup();
            keys.len()
        };

        Ok(CreateOrderResponse {
            order,
            allocated_pairs: plan.allocated_pairs,
            unplaced_pairs: plan.unplaced_pairs,
            lot_count,
        })
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 生产单列表（按客户或生产单号模糊匹配，最新在前）
    pub fn list_orders(&self, filter: &str) -> ApiResult<Vec<OrderSummary>> {
        let orders = self.order_repo.search(filter.trim())?;
        debug!(filter, count = orders.len(), "生产单检索");
        Ok(orders.iter().map(OrderSummary::from).collect())
    }

    /// 生产单详情（生产单 + 批次表）
    pub fn get_order_detail(&self, order_id: i64) -> ApiResult<OrderDetail> {
        let order = self.require_order(order_id)?;
        let sheet = self.load_sheet(order_id)?;
        Ok(OrderDetail::new(order, sheet))
    }

    // ==========================================
    // 批次表保存
    // ==========================================

    /// 保存批次表
    ///
    /// 批次结构（轮次、批次号）必须与已保存的一致；
    /// 全部批次合计等于批量才写入，否则返回第一个违规批次且不写入任何数据
    #[instrument(skip(self, sheet))]
    pub fn save_lot_sheet(&self, order_id: i64, sheet: &LotSheet) -> ApiResult<SaveCellsOutcome> {
        self.require_order(order_id)?;

        if sheet.order_id != order_id {
            return Err(ApiError::InvalidInput(format!(
                "批次表属于生产单{}，不能保存到生产单{}",
                sheet.order_id, order_id
            )));
        }
        if sheet.lot_capacity != self.config().lot_capacity {
            return Err(ApiError::InvalidInput(format!(
                "批次表批量{}与当前配置{}不一致",
                sheet.lot_capacity,
                self.config().lot_capacity
            )));
        }

        let stored = self.load_sheet(order_id)?;
        if lot_keys(sheet) != lot_keys(&stored) {
            return Err(ApiError::InvalidInput(format!(
                "批次表结构与已保存批次不一致: 提交{}个批次，已保存{}个批次",
                sheet.lot_count(),
                stored.lot_count()
            )));
        }

        LotSheetValidator::validate(sheet)?;

        let outcome = self.lot_repo.save_cells(order_id, &sheet.cells())?;
        info!(
            order_id,
            updated = outcome.updated,
            inserted = outcome.inserted,
            "批次表保存完成"
        );
        Ok(outcome)
    }

    // ==========================================
    // 删除
    // ==========================================

    /// 删除生产单及其全部批次
    pub fn delete_order(&self, order_id: i64) -> ApiResult<()> {
        if !self.order_repo.delete_with_lots(order_id)? {
            return Err(ApiError::NotFound(format!("生产单(id={})不存在", order_id)));
        }
        info!(order_id, "生产单已删除");
        Ok(())
    }

    // ==========================================
    // CSV
    // ==========================================

    /// 导出生产单 CSV
    pub fn export_order_csv(
        &self,
        order_id: i64,
        path: &Path,
        layout: ExportLayout,
    ) -> ApiResult<()> {
        let order = self.require_order(order_id)?;
        match layout {
            ExportLayout::Grid => {
                let sheet = self.load_sheet(order_id)?;
                exporter::export_to_path(path, &order, &sheet)?;
            }
            ExportLayout::Long => {
                let entries = self.lot_repo.find_by_order(order_id)?;
                exporter::export_long_to_path(path, &order, &entries)?;
            }
        }
        info!(order_id, path = %path.display(), ?layout, "生产单 CSV 已导出");
        Ok(())
    }

    /// 回读编辑后的网格 CSV 并保存
    ///
    /// CSV 中的数量整体替换批次表当前数量，之后按保存规则校验
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn apply_csv_sheet(&self, order_id: i64, path: &Path) -> ApiResult<SaveCellsOutcome> {
        let parsed = exporter::parse_order_csv_path(path)?;

        if let Some(raw) = parsed.metadata_value(order_csv::LABEL_ORDER_ID) {
            let file_order_id: i64 = raw.parse().map_err(|_| {
                ApiError::InvalidInput(format!("CSV 中的 Order ID 无法解析: {:?}", raw))
            })?;
            if file_order_id != order_id {
                return Err(ApiError::InvalidInput(format!(
                    "CSV 属于生产单{}，不能应用到生产单{}",
                    file_order_id, order_id
                )));
            }
        }

        self.require_order(order_id)?;
        let mut sheet = self.load_sheet(order_id)?;
        sheet.clear_quantities();
        for cell in &parsed.cells {
            sheet.set_quantity(cell.round, cell.lot_number, &cell.size_label, cell.quantity)?;
        }
        debug!(order_id, cells = parsed.cells.len(), "CSV 已合并到批次表");

        self.save_lot_sheet(order_id, &sheet)
    }

    // ==========================================
    // 内部辅助
    // ==========================================

    fn require_order(&self, order_id: i64) -> ApiResult<ProductionOrder> {
        self.order_repo
            .find_by_id(order_id)?
            .ok_or_else(|| ApiError::NotFound(format!("生产单(id={})不存在", order_id)))
    }

    fn load_sheet(&self, order_id: i64) -> ApiResult<LotSheet> {
        let entries = self.lot_repo.find_by_order(order_id)?;
        let cells: Vec<_> = entries.iter().map(LotEntry::to_cell).collect();
        Ok(LotSheet::from_cells(order_id, self.config(), &cells))
    }
}

/// 批次表中的 (轮次, 批次号) 集合
fn lot_keys(sheet: &LotSheet) -> BTreeSet<(u32, u32)> {
    sheet
        .rounds
        .iter()
        .flat_map(|round| round.lots.iter().map(move |lot| (round.round, lot.lot_number)))
        .collect()
}
