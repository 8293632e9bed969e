// ==========================================
// 鞋业生产订单系统 - 配置层
// ==========================================
// 职责: 分批配置的定义、加载与覆写
// 存储: config_kv 表
// ==========================================

pub mod allocation_config;
pub mod config_manager;
pub mod error;

// 重导出核心配置类型
pub use allocation_config::{AllocationConfig, CurveStep, SizeCurve};
pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
