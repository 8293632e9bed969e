// ==========================================
// 鞋业生产订单系统 - 批次数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑（批次合计校验在 engine 层）
// ==========================================

use crate::domain::lot::{LotCell, LotEntry};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

const LOT_COLUMNS: &str =
    "lot_entry_id, order_id, round, lot_number, size_label, quantity, status";

/// 批次保存统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveCellsOutcome {
    /// 更新的已有行
    pub updated: usize,
    /// 新插入的行（原先不存在且双数 > 0）
    pub inserted: usize,
}

// ==========================================
// LotEntryRepository - 批次仓储
// ==========================================
pub struct LotEntryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl LotEntryRepository {
    /// 创建新的批次仓储
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询生产单全部批次行（按轮次、批次号、写入顺序）
    pub fn find_by_order(&self, order_id: i64) -> RepositoryResult<Vec<LotEntry>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM lot_entry WHERE order_id = ?1 ORDER BY round, lot_number, lot_entry_id",
            LOT_COLUMNS
        ))?;
        let entries = stmt
            .query_map(params![order_id], map_lot_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// 查询生产单某一轮的批次行
    pub fn find_by_order_and_round(
        &self,
        order_id: i64,
        round: u32,
    ) -> RepositoryResult<Vec<LotEntry>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM lot_entry WHERE order_id = ?1 AND round = ?2 ORDER BY lot_number, lot_entry_id",
            LOT_COLUMNS
        ))?;
        let entries = stmt
            .query_map(params![order_id, round], map_lot_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// 保存批次单元格（单事务）
    ///
    /// 规则:
    /// 1) 已存在的 (轮次, 批次号, 尺码) 行直接更新双数（含更新为 0）
    /// 2) 不存在且双数 > 0 的单元格插入新行
    /// 3) 任一语句失败则整体回滚
    pub fn save_cells(&self, order_id: i64, cells: &[LotCell]) -> RepositoryResult<SaveCellsOutcome> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let mut outcome = SaveCellsOutcome::default();

        {
            let mut update = tx.prepare(
                r#"
                UPDATE lot_entry SET quantity = ?1
                WHERE order_id = ?2 AND round = ?3 AND lot_number = ?4 AND size_label = ?5
                "#,
            )?;
            let mut insert = tx.prepare(
                r#"
                INSERT INTO lot_entry (order_id, round, lot_number, size_label, quantity)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )?;

            for cell in cells {
                let affected = update.execute(params![
                    cell.quantity,
                    order_id,
                    cell.round,
                    cell.lot_number,
                    cell.size_label,
                ])?;

                if affected > 0 {
                    outcome.updated += affected;
                } else if cell.quantity > 0 {
                    insert.execute(params![
                        order_id,
                        cell.round,
                        cell.lot_number,
                        cell.size_label,
                        cell.quantity,
                    ])?;
                    outcome.inserted += 1;
                }
            }
        }

        tx.commit().map_err(RepositoryError::commit_failed)?;
        Ok(outcome)
    }

    /// 生产单批次行数
    pub fn count_by_order(&self, order_id: i64) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM lot_entry WHERE order_id = ?1",
            params![order_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn map_lot_row(row: &Row<'_>) -> rusqlite::Result<LotEntry> {
    Ok(LotEntry {
        lot_entry_id: row.get(0)?,
        order_id: row.get(1)?,
        round: row.get(2)?,
        lot_number: row.get(3)?,
        size_label: row.get(4)?,
        quantity: row.get(5)?,
        status: row.get(6)?,
    })
}
