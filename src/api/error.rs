// ==========================================
// 鞋业生产订单系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换下层错误为面向操作员的错误消息
// ==========================================

use crate::config::error::ConfigError;
use crate::domain::lot_sheet::SheetEditError;
use crate::engine::lot_validator::LotTotalViolation;
use crate::exporter::error::ExportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
/// 所有错误信息必须包含显式原因
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 校验错误（不发生任何写入）
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("生产单号已存在: {order_no}")]
    DuplicateOrderNumber { order_no: i64 },

    #[error("轮次{round}批次{lot_number}合计{actual}双，每批必须为{expected}双")]
    LotTotalMismatch {
        round: u32,
        lot_number: u32,
        actual: u32,
        expected: u32,
    },

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),

    // ==========================================
    // 导出 / 配置错误
    // ==========================================
    #[error("CSV 导出失败: {0}")]
    ExportError(#[from] ExportError),

    #[error("配置错误: {0}")]
    ConfigError(#[from] ConfigError),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::DatabaseError(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::DatabaseError(format!("外键约束违反: {}", msg))
            }
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

impl From<LotTotalViolation> for ApiError {
    fn from(v: LotTotalViolation) -> Self {
        ApiError::LotTotalMismatch {
            round: v.round,
            lot_number: v.lot_number,
            actual: v.actual,
            expected: v.expected,
        }
    }
}

impl From<SheetEditError> for ApiError {
    fn from(err: SheetEditError) -> Self {
        ApiError::InvalidInput(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
