// ==========================================
// 鞋业生产订单系统 - 初始分批引擎
// ==========================================
// 职责: 将需求总双数按固定批量拆分到 (轮次, 批次号, 尺码)
// 规则: 逐轮从头遍历尺码曲线，贪心填充，不回溯
// 输入: 需求总双数 + 产品类型
// 输出: AllocationPlan (批次列表 + 未分配双数)
// ==========================================

use crate::config::allocation_config::AllocationConfig;
use crate::config::error::ConfigResult;
use crate::domain::lot::{AllocationPlan, LotCell};
use crate::domain::types::ProductType;
use tracing::instrument;

// ==========================================
// LotAllocator - 初始分批引擎
// ==========================================
pub struct LotAllocator {
    config: AllocationConfig,
}

impl LotAllocator {
    /// 构造函数
    ///
    /// # 参数
    /// - `config`: 分批配置（调用方负责先执行 validate）
    pub fn new(config: AllocationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AllocationConfig {
        &self.config
    }

    /// 该产品类型可分配的最大双数
    pub fn capacity_ceiling(&self, product_type: ProductType) -> ConfigResult<u64> {
        self.config.capacity_ceiling(product_type)
    }

    /// 执行初始分批
    ///
    /// 规则:
    /// 1) 轮次从 1 开始递增，每轮批次号从 1 重新计数
    /// 2) 按曲线顺序遍历尺码，每个尺码预分配 lots 个批次
    /// 3) 每批取 min(批量, 剩余双数)，剩余为 0 时立即停止
    /// 4) 所有轮次遍历完仍有剩余，记入 unplaced_pairs
    ///
    /// # 返回
    /// - Err: 配置中缺少该产品类型的尺码曲线
    #[instrument(skip(self), fields(lot_capacity = self.config.lot_capacity))]
    pub fn allocate(
        &self,
        total_pairs: u32,
        product_type: ProductType,
    ) -> ConfigResult<AllocationPlan> {
        let curve = self.config.curve(product_type)?;
        let capacity = self.config.lot_capacity;

        let mut lots = Vec::new();
        let mut remaining = total_pairs;

        'rounds: for round in self.config.rounds() {
            let mut lot_number = 1;
            for step in curve.steps() {
                for _ in 0..step.lots {
                    if remaining == 0 {
                        break 'rounds;
                    }
                    let quantity = capacity.min(remaining);
                    lots.push(LotCell::new(round, lot_number, step.size.clone(), quantity));
                    remaining -= quantity;
                    lot_number += 1;
                }
            }
            if remaining == 0 {
                break;
            }
        }

        if remaining > 0 {
            tracing::warn!(
                total_pairs,
                unplaced_pairs = remaining,
                "需求超出分批产能上限，剩余双数未分配"
            );
        }

        Ok(AllocationPlan {
            allocated_pairs: total_pairs - remaining,
            unplaced_pairs: remaining,
            lots,
        })
    }
}
