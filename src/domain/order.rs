// ==========================================
// 鞋业生产订单系统 - 生产单领域模型
// ==========================================
// 生产单创建后不再修改，只能整体删除
// ==========================================

use crate::domain::types::ProductType;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 生产单创建时间的存储格式（精确到分钟）
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M";

// ==========================================
// ProductionOrder - 生产单
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionOrder {
    // ===== 主键 =====
    pub order_id: i64, // 内部ID（自增）

    // ===== 业务字段 =====
    pub order_no: i64,            // 生产单号（人工录入，唯一）
    pub client_name: String,      // 客户
    pub created_at: NaiveDateTime, // 创建时间
    pub total_pairs: u32,         // 需求总双数
    pub product_type: ProductType, // 产品类型
}

impl ProductionOrder {
    /// 格式化后的创建时间
    pub fn created_at_display(&self) -> String {
        self.created_at.format(CREATED_AT_FORMAT).to_string()
    }
}

// ==========================================
// NewOrder - 待创建生产单（已通过表单校验）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub order_no: i64,
    pub client_name: String,
    pub total_pairs: u32,
    pub product_type: ProductType,
}

// ==========================================
// OrderSummary - 生产单列表行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub order_id: i64,
    pub order_no: i64,
    pub client_name: String,
    pub created_at: String,
    pub total_pairs: u32,
    pub product_type: ProductType,
}

impl From<&ProductionOrder> for OrderSummary {
    fn from(order: &ProductionOrder) -> Self {
        Self {
            order_id: order.order_id,
            order_no: order.order_no,
            client_name: order.client_name.clone(),
            created_at: order.created_at_display(),
            total_pairs: order.total_pairs,
            product_type: order.product_type,
        }
    }
}
