// ==========================================
// 鞋业生产订单系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、派生视图
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod lot;
pub mod lot_sheet;
pub mod order;
pub mod types;

// 重导出核心类型
pub use lot::{AllocationPlan, LotCell, LotEntry};
pub use lot_sheet::{LotRow, LotSheet, RoundSheet, SheetEditError};
pub use order::{NewOrder, OrderSummary, ProductionOrder, CREATED_AT_FORMAT};
pub use types::{LotStatus, ProductType};
