// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的临时数据库、应用状态与生产单表单
// ==========================================

#![allow(dead_code)]

use footwear_lot_planner::api::OrderForm;
use footwear_lot_planner::app::AppState;
use footwear_lot_planner::db::{ensure_schema, open_sqlite_connection};
use footwear_lot_planner::domain::types::ProductType;
use rusqlite::Connection;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是 UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    ensure_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试数据库连接（统一 PRAGMA）
pub fn open_test_connection(db_path: &str) -> Result<Connection, Box<dyn Error>> {
    Ok(open_sqlite_connection(db_path)?)
}

/// 打开共享连接，供仓储直接使用
pub fn shared_connection(db_path: &str) -> Result<Arc<Mutex<Connection>>, Box<dyn Error>> {
    Ok(Arc::new(Mutex::new(open_test_connection(db_path)?)))
}

/// 在临时数据库上构建应用状态
pub fn build_state() -> (NamedTempFile, AppState) {
    let (temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let state = AppState::new(db_path).expect("Failed to build AppState");
    (temp_file, state)
}

/// 生产单表单
pub fn order_form(client: &str, order_no: i64, total_pairs: u32, product_type: ProductType) -> OrderForm {
    OrderForm {
        client_name: client.to_string(),
        order_no: order_no.to_string(),
        total_pairs: total_pairs.to_string(),
        product_type,
    }
}

/// 写入一条配置覆写
pub fn insert_config(conn: &Connection, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
    conn.execute(
        "INSERT OR REPLACE INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)",
        [key, value],
    )?;
    Ok(())
}
