// ==========================================
// 鞋业生产订单系统 - 引擎层
// ==========================================
// 职责: 实现业务规则（初始分批、批次合计校验）
// 红线: Engine 不拼 SQL
// ==========================================

pub mod lot_allocator;
pub mod lot_validator;

// 重导出核心引擎
pub use lot_allocator::LotAllocator;
pub use lot_validator::{LotSheetValidator, LotTotalViolation};
