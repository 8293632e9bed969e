// ==========================================
// 鞋业生产订单系统 - 导出层
// ==========================================
// 职责: 生产单批次表 CSV 导出，以及网格格式回读
// ==========================================

pub mod error;
pub mod order_csv;

use serde::{Deserialize, Serialize};

pub use error::{ExportError, ExportResult};
pub use order_csv::{
    export_long_to_path, export_to_path, parse_order_csv, parse_order_csv_path, write_order_csv,
    write_order_csv_long, ParsedOrderCsv,
};

/// 导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExportLayout {
    /// 每批一行，尺码为列
    #[default]
    Grid,
    /// 每个尺码行一条记录
    Long,
}
