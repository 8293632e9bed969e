// ==========================================
// 鞋业生产订单系统 - 配置层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::domain::types::ProductType;
use thiserror::Error;

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    // ===== 配置编写错误 =====
    #[error("尺码曲线长度不一致: 尺码{sizes}个, 批次数{counts}个")]
    CurveLengthMismatch { sizes: usize, counts: usize },

    #[error("缺少尺码曲线: {0}")]
    MissingCurve(ProductType),

    #[error("尺码曲线为空: {0}")]
    EmptyCurve(ProductType),

    #[error("尺码曲线包含未定义的尺码: product_type={product_type}, size={size}")]
    UnknownSize {
        product_type: ProductType,
        size: String,
    },

    #[error("配置值无效 (key={key}): {message}")]
    InvalidValue { key: String, message: String },

    // ===== 存储错误 =====
    #[error("配置读取失败: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("配置解析失败 (key={key}): {source}")]
    Parse {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("数据库锁获取失败: {0}")]
    LockError(String),
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
