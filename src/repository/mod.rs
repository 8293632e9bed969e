// ==========================================
// 鞋业生产订单系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,多行写入使用事务
// ==========================================

pub mod error;
pub mod lot_repo;
pub mod order_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use lot_repo::{LotEntryRepository, SaveCellsOutcome};
pub use order_repo::OrderRepository;
