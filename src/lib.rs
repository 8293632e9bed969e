// ==========================================
// 鞋业生产订单系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 生产单录入、按尺码曲线分批、批次表编辑与导出
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 分批与批次校验
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/表结构）
pub mod db;

// 导出层 - CSV
pub mod exporter;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{LotStatus, ProductType};

// 领域实体
pub use domain::{AllocationPlan, LotCell, LotEntry, LotSheet, NewOrder, ProductionOrder};

// 配置
pub use config::{AllocationConfig, SizeCurve};

// 引擎
pub use engine::{LotAllocator, LotSheetValidator};

// API
pub use api::{ApiError, OrderApi, OrderForm};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "鞋业生产订单系统";
