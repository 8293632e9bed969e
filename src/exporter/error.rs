// ==========================================
// 鞋业生产订单系统 - CSV 导出/回读错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// CSV 导出/回读错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    // ===== 文件相关错误 =====
    #[error("文件写入失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV 读写失败: {0}")]
    Csv(#[from] csv::Error),

    // ===== 格式错误 =====
    #[error("缺少批次表表头（Round, Lot, ...）")]
    MissingGridHeader,

    #[error("CSV 格式错误 (行 {line}): {message}")]
    Format { line: u64, message: String },

    #[error("批次合计不一致 (轮次 {round}, 批次 {lot_number}): 表中 {declared}, 实际 {actual}")]
    TotalMismatch {
        round: u32,
        lot_number: u32,
        declared: u32,
        actual: u32,
    },
}

/// Result 类型别名
pub type ExportResult<T> = Result<T, ExportError>;
