// ==========================================
// 鞋业生产订单系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口，供命令行调用
// ==========================================

pub mod error;
pub mod order_api;
pub mod validator;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use order_api::{CreateOrderResponse, LotView, OrderApi, OrderDetail};
pub use validator::{validate_order_form, OrderForm};
