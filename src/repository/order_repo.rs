// ==========================================
// 鞋业生产订单系统 - 生产单数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 生产单与其批次的创建/删除在同一事务内完成
// ==========================================

use crate::domain::lot::LotCell;
use crate::domain::order::{NewOrder, ProductionOrder, CREATED_AT_FORMAT};
use crate::domain::types::ProductType;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const ORDER_COLUMNS: &str =
    "order_id, order_no, client_name, created_at, total_pairs, product_type";

// ==========================================
// OrderRepository - 生产单仓储
// ==========================================
pub struct OrderRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OrderRepository {
    /// 创建新的生产单仓储
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 创建生产单并写入初始批次（单事务）
    ///
    /// # 参数
    /// - `order`: 已校验的生产单
    /// - `created_at`: 创建时间
    /// - `lots`: 初始分批结果
    ///
    /// # 返回
    /// - `Ok(order_id)`: 新生产单的内部ID
    /// - `Err(UniqueConstraintViolation)`: 生产单号重复，不写入任何批次
    pub fn create_with_lots(
        &self,
        order: &NewOrder,
        created_at: NaiveDateTime,
        lots: &[LotCell],
    ) -> RepositoryResult<i64> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO production_order (
                order_no, client_name, created_at, total_pairs, product_type
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                order.order_no,
                order.client_name,
                created_at.format(CREATED_AT_FORMAT).to_string(),
                order.total_pairs,
                order.product_type.as_str(),
            ],
        )?;
        let order_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO lot_entry (order_id, round, lot_number, size_label, quantity)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )?;
            for lot in lots {
                stmt.execute(params![
                    order_id,
                    lot.round,
                    lot.lot_number,
                    lot.size_label,
                    lot.quantity,
                ])?;
            }
        }

        tx.commit().map_err(RepositoryError::commit_failed)?;
        Ok(order_id)
    }

    /// 删除生产单及其全部批次（单事务）
    ///
    /// # 返回
    /// - `Ok(true)`: 已删除
    /// - `Ok(false)`: 生产单不存在
    pub fn delete_with_lots(&self, order_id: i64) -> RepositoryResult<bool> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let lot_rows = tx.execute("DELETE FROM lot_entry WHERE order_id = ?1", params![order_id])?;
        let order_rows = tx.execute(
            "DELETE FROM production_order WHERE order_id = ?1",
            params![order_id],
        )?;

        tx.commit().map_err(RepositoryError::commit_failed)?;

        tracing::debug!(order_id, lot_rows, order_rows, "生产单已删除");
        Ok(order_rows > 0)
    }

    // ==========================================
    // 查询操作
    // ==========================================

    /// 按内部ID查询
    pub fn find_by_id(&self, order_id: i64) -> RepositoryResult<Option<ProductionOrder>> {
        let conn = self.get_conn()?;
        let order = conn
            .query_row(
                &format!("SELECT {} FROM production_order WHERE order_id = ?1", ORDER_COLUMNS),
                params![order_id],
                map_order_row,
            )
            .optional()?;
        Ok(order)
    }

    /// 按生产单号查询
    pub fn find_by_order_no(&self, order_no: i64) -> RepositoryResult<Option<ProductionOrder>> {
        let conn = self.get_conn()?;
        let order = conn
            .query_row(
                &format!("SELECT {} FROM production_order WHERE order_no = ?1", ORDER_COLUMNS),
                params![order_no],
                map_order_row,
            )
            .optional()?;
        Ok(order)
    }

    /// 按客户或生产单号模糊查询，按创建时间倒序
    ///
    /// # 参数
    /// - `filter`: 关键字（空串返回全部）
    pub fn search(&self, filter: &str) -> RepositoryResult<Vec<ProductionOrder>> {
        let conn = self.get_conn()?;
        let filter = filter.trim();

        let orders = if filter.is_empty() {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM production_order ORDER BY created_at DESC, order_id DESC",
                ORDER_COLUMNS
            ))?;
            let rows = stmt.query_map([], map_order_row)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        } else {
            let like = format!("%{}%", filter);
            let mut stmt = conn.prepare(&format!(
                r#"
                SELECT {} FROM production_order
                WHERE client_name LIKE ?1 OR CAST(order_no AS TEXT) LIKE ?1
                ORDER BY created_at DESC, order_id DESC
                "#,
                ORDER_COLUMNS
            ))?;
            let rows = stmt.query_map(params![like], map_order_row)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };

        Ok(orders)
    }

    /// 生产单总数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM production_order", [], |row| row.get(0))?;
        Ok(count)
    }
}

// ==========================================
// 行映射
// ==========================================

fn map_order_row(row: &Row<'_>) -> rusqlite::Result<ProductionOrder> {
    let created_at_raw: String = row.get(3)?;
    let created_at = NaiveDateTime::parse_from_str(&created_at_raw, CREATED_AT_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

    let total_pairs_raw: i64 = row.get(4)?;
    let total_pairs = u32::try_from(total_pairs_raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Integer, Box::new(e)))?;

    let product_type_raw: String = row.get(5)?;
    let product_type = product_type_raw
        .parse::<ProductType>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, e.into()))?;

    Ok(ProductionOrder {
        order_id: row.get(0)?,
        order_no: row.get(1)?,
        client_name: row.get(2)?,
        created_at,
        total_pairs,
        product_type,
    })
}
