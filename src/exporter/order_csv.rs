// ==========================================
// 鞋业生产订单系统 - 生产单 CSV 导出与回读
// ==========================================
// 网格格式:
//   Order ID,<id> / Client,<...> / Order No,<...> / Created At,<...> / Total Pairs (requested),<...>
//   (空行)
//   Round,Lot,<尺码1>,...,<尺码N>,Lot Total
//   <轮次>,<批次号>,<双数>...,<合计>
// 明细格式: 元数据 + 空行 + Round,Lot,Size,Quantity
// ==========================================

use crate::domain::lot::{LotCell, LotEntry};
use crate::domain::lot_sheet::LotSheet;
use crate::domain::order::ProductionOrder;
use crate::exporter::error::{ExportError, ExportResult};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

pub const LABEL_ORDER_ID: &str = "Order ID";
pub const LABEL_CLIENT: &str = "Client";
pub const LABEL_ORDER_NO: &str = "Order No";
pub const LABEL_CREATED_AT: &str = "Created At";
pub const LABEL_TOTAL_PAIRS: &str = "Total Pairs (requested)";

pub const COL_ROUND: &str = "Round";
pub const COL_LOT: &str = "Lot";
pub const COL_LOT_TOTAL: &str = "Lot Total";
pub const COL_SIZE: &str = "Size";
pub const COL_QUANTITY: &str = "Quantity";

// ==========================================
// ParsedOrderCsv - 回读结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedOrderCsv {
    /// 元数据行 (标签, 值)，保持文件顺序
    pub metadata: Vec<(String, String)>,
    /// 表头中的尺码列
    pub size_labels: Vec<String>,
    /// 非零单元格
    pub cells: Vec<LotCell>,
}

impl ParsedOrderCsv {
    pub fn metadata_value(&self, label: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k == label)
            .map(|(_, v)| v.as_str())
    }
}

// ==========================================
// 写出
// ==========================================

fn write_metadata<W: Write>(
    wtr: &mut csv::Writer<W>,
    order: &ProductionOrder,
) -> ExportResult<()> {
    wtr.write_record([LABEL_ORDER_ID, order.order_id.to_string().as_str()])?;
    wtr.write_record([LABEL_CLIENT, order.client_name.as_str()])?;
    wtr.write_record([LABEL_ORDER_NO, order.order_no.to_string().as_str()])?;
    wtr.write_record([LABEL_CREATED_AT, order.created_at_display().as_str()])?;
    wtr.write_record([LABEL_TOTAL_PAIRS, order.total_pairs.to_string().as_str()])?;
    // 分隔空行: 直接写入换行，不经过 csv 字段引号
    wtr.flush()?;
    wtr.get_mut().write_all(b"\n")?;
    Ok(())
}

/// 按网格格式写出生产单批次表
pub fn write_order_csv<W: Write>(
    writer: W,
    order: &ProductionOrder,
    sheet: &LotSheet,
) -> ExportResult<()> {
    let mut wtr = WriterBuilder::new().flexible(true).from_writer(writer);
    write_metadata(&mut wtr, order)?;

    let mut header = vec![COL_ROUND.to_string(), COL_LOT.to_string()];
    header.extend(sheet.size_labels.iter().cloned());
    header.push(COL_LOT_TOTAL.to_string());
    wtr.write_record(&header)?;

    for round in &sheet.rounds {
        for lot in &round.lots {
            let mut row = vec![round.round.to_string(), lot.lot_number.to_string()];
            row.extend(lot.quantities.iter().map(|q| q.to_string()));
            row.push(lot.total().to_string());
            wtr.write_record(&row)?;
        }
    }

    wtr.flush()?;
    Ok(())
}

/// 按明细格式写出（每个尺码行一条记录）
pub fn write_order_csv_long<W: Write>(
    writer: W,
    order: &ProductionOrder,
    entries: &[LotEntry],
) -> ExportResult<()> {
    let mut wtr = WriterBuilder::new().flexible(true).from_writer(writer);
    write_metadata(&mut wtr, order)?;
    wtr.write_record([COL_ROUND, COL_LOT, COL_SIZE, COL_QUANTITY])?;

    let mut sorted: Vec<&LotEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| {
        (a.round, a.lot_number, &a.size_label).cmp(&(b.round, b.lot_number, &b.size_label))
    });

    for entry in sorted {
        wtr.write_record([
            entry.round.to_string(),
            entry.lot_number.to_string(),
            entry.size_label.clone(),
            entry.quantity.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// 网格格式导出到文件
pub fn export_to_path(path: &Path, order: &ProductionOrder, sheet: &LotSheet) -> ExportResult<()> {
    let file = File::create(path)?;
    write_order_csv(file, order, sheet)
}

/// 明细格式导出到文件
pub fn export_long_to_path(
    path: &Path,
    order: &ProductionOrder,
    entries: &[LotEntry],
) -> ExportResult<()> {
    let file = File::create(path)?;
    write_order_csv_long(file, order, entries)
}

// ==========================================
// 回读
// ==========================================

/// 回读网格格式 CSV
///
/// 规则:
/// 1) 表头之前的非空行视为元数据
/// 2) 表头首列必须为 Round，末列必须为 Lot Total
/// 3) 每行 Lot Total 必须等于各尺码之和
/// 4) 只返回双数 > 0 的单元格
pub fn parse_order_csv<R: Read>(reader: R) -> ExportResult<ParsedOrderCsv> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut metadata = Vec::new();
    let mut size_labels: Option<Vec<String>> = None;
    let mut cells = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        // 跳过空白行
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        match size_labels.as_ref() {
            Some(labels) => parse_grid_row(&record, labels, line, &mut cells)?,
            None => {
                if record.get(0).map(str::trim) == Some(COL_ROUND) {
                    size_labels = Some(parse_grid_header(&record, line)?);
                } else {
                    let key = record.get(0).unwrap_or("").trim().to_string();
                    let value = record.get(1).unwrap_or("").trim().to_string();
                    metadata.push((key, value));
                }
            }
        }
    }

    let size_labels = size_labels.ok_or(ExportError::MissingGridHeader)?;

    Ok(ParsedOrderCsv {
        metadata,
        size_labels,
        cells,
    })
}

/// 从文件回读网格格式 CSV
pub fn parse_order_csv_path(path: &Path) -> ExportResult<ParsedOrderCsv> {
    let file = File::open(path)?;
    parse_order_csv(file)
}

fn parse_grid_row(
    record: &csv::StringRecord,
    labels: &[String],
    line: u64,
    cells: &mut Vec<LotCell>,
) -> ExportResult<()> {
    if record.len() != labels.len() + 3 {
        return Err(ExportError::Format {
            line,
            message: format!("列数 {} 与表头 {} 不一致", record.len(), labels.len() + 3),
        });
    }

    let round = parse_field(record, 0, line)?;
    let lot_number = parse_field(record, 1, line)?;
    let declared = parse_field(record, labels.len() + 2, line)?;

    let mut actual: u32 = 0;
    for (offset, label) in labels.iter().enumerate() {
        let quantity = parse_field(record, offset + 2, line)?;
        actual = actual.checked_add(quantity).ok_or_else(|| ExportError::Format {
            line,
            message: format!("轮次{}批次{}合计超出范围", round, lot_number),
        })?;
        if quantity > 0 {
            cells.push(LotCell::new(round, lot_number, label.clone(), quantity));
        }
    }

    if actual != declared {
        return Err(ExportError::TotalMismatch {
            round,
            lot_number,
            declared,
            actual,
        });
    }
    Ok(())
}

fn parse_grid_header(record: &csv::StringRecord, line: u64) -> ExportResult<Vec<String>> {
    let fields: Vec<&str> = record.iter().map(str::trim).collect();
    if fields.len() < 3 || fields[1] != COL_LOT || fields[fields.len() - 1] != COL_LOT_TOTAL {
        return Err(ExportError::Format {
            line,
            message: format!("无法识别的批次表表头: {}", fields.join(",")),
        });
    }
    Ok(fields[2..fields.len() - 1].iter().map(|s| s.to_string()).collect())
}

fn parse_field(record: &csv::StringRecord, idx: usize, line: u64) -> ExportResult<u32> {
    let raw = record.get(idx).unwrap_or("").trim();
    raw.parse::<u32>().map_err(|_| ExportError::Format {
        line,
        message: format!("第{}列不是非负整数: {:?}", idx + 1, raw),
    })
}
