// ==========================================
// 鞋业生产订单系统 - SQLite 连接初始化与建表
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为（外键、busy_timeout）
// - 统一建表/建索引，记录 schema_version
// - 兼容旧库: production_order 缺少 product_type 列时自动补列
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
///
/// - v1: production_order / lot_entry / config_kv
/// - v2: production_order.product_type
pub const CURRENT_SCHEMA_VERSION: i64 = 2;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：foreign_keys 与 busy_timeout 都需要“每个连接”单独设置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表（幂等）
///
/// 旧库若已存在不含 product_type 的 production_order 表，会补列并默认 MEN
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL DEFAULT 'global',
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS production_order (
            order_id INTEGER PRIMARY KEY AUTOINCREMENT,
            order_no INTEGER NOT NULL UNIQUE,
            client_name TEXT NOT NULL,
            created_at TEXT NOT NULL,
            total_pairs INTEGER NOT NULL,
            product_type TEXT NOT NULL DEFAULT 'MEN'
        );

        CREATE TABLE IF NOT EXISTS lot_entry (
            lot_entry_id INTEGER PRIMARY KEY AUTOINCREMENT,
            order_id INTEGER NOT NULL REFERENCES production_order(order_id) ON DELETE CASCADE,
            round INTEGER NOT NULL,
            lot_number INTEGER NOT NULL,
            size_label TEXT NOT NULL,
            quantity INTEGER NOT NULL DEFAULT 0,
            status TEXT NOT NULL DEFAULT 'PENDING',
            UNIQUE (order_id, round, lot_number, size_label)
        );

        CREATE INDEX IF NOT EXISTS idx_production_order_no ON production_order(order_no);
        CREATE INDEX IF NOT EXISTS idx_lot_entry_order_round ON lot_entry(order_id, round);
        "#,
    )?;

    if !has_column(conn, "production_order", "product_type")? {
        conn.execute(
            "ALTER TABLE production_order ADD COLUMN product_type TEXT NOT NULL DEFAULT 'MEN'",
            [],
        )?;
        tracing::info!("旧库已补充 production_order.product_type 列");
    }

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    Ok(())
}

/// 判断表中是否存在指定列
pub fn has_column(conn: &Connection, table: &str, column: &str) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(names.iter().any(|n| n == column))
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();

        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();

        assert_eq!(read_schema_version(&conn).unwrap(), Some(CURRENT_SCHEMA_VERSION));
        assert!(has_column(&conn, "lot_entry", "status").unwrap());
    }

    #[test]
    fn test_legacy_table_gets_product_type() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE production_order (
                order_id INTEGER PRIMARY KEY AUTOINCREMENT,
                order_no INTEGER NOT NULL UNIQUE,
                client_name TEXT NOT NULL,
                created_at TEXT NOT NULL,
                total_pairs INTEGER NOT NULL
            );
            INSERT INTO production_order (order_no, client_name, created_at, total_pairs)
            VALUES (7, 'Legacy', '2025-01-01 08:00', 40);
            "#,
        )
        .unwrap();

        ensure_schema(&conn).unwrap();

        let product_type: String = conn
            .query_row("SELECT product_type FROM production_order WHERE order_no = 7", [], |r| r.get(0))
            .unwrap();
        assert_eq!(product_type, "MEN");
    }
}
