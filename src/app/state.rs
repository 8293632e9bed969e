// ==========================================
// 鞋业生产订单系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::OrderApi;
use crate::config::allocation_config::AllocationConfig;
use crate::config::config_manager::ConfigManager;
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::engine::lot_allocator::LotAllocator;
use crate::repository::{lot_repo::LotEntryRepository, order_repo::OrderRepository};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "FOOTWEAR_LOT_PLANNER_DB_PATH";

/// 应用状态
///
/// 包含所有API实例和共享资源，所有组件共用同一个数据库连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 生效的分批配置（启动时加载）
    pub allocation_config: AllocationConfig,

    /// 生产单API
    pub order_api: Arc<OrderApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 生产单仓储
    pub order_repo: Arc<OrderRepository>,

    /// 批次仓储
    pub lot_repo: Arc<LotEntryRepository>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库并确保表结构为最新
    /// 2. 从 config_kv 加载分批配置
    /// 3. 创建仓储、分批器与API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        ensure_schema(&conn).map_err(|e| format!("数据库表结构初始化失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 配置
        // ==========================================
        let config_manager = Arc::new(ConfigManager::from_connection(conn.clone()));
        let allocation_config = config_manager
            .load_allocation_config()
            .map_err(|e| format!("分批配置无效: {}", e))?;

        // ==========================================
        // Repository / Engine / API
        // ==========================================
        let order_repo = Arc::new(OrderRepository::new(conn.clone()));
        let lot_repo = Arc::new(LotEntryRepository::new(conn));
        let allocator = Arc::new(LotAllocator::new(allocation_config.clone()));

        let order_api = Arc::new(OrderApi::new(
            order_repo.clone(),
            lot_repo.clone(),
            allocator,
        ));

        tracing::info!(
            lot_capacity = allocation_config.lot_capacity,
            round_count = allocation_config.round_count,
            "AppState初始化完成"
        );

        Ok(Self {
            db_path,
            allocation_config,
            order_api,
            config_manager,
            order_repo,
            lot_repo,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./footwear_lot_planner.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("footwear-lot-planner");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("footwear_lot_planner.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }

    #[test]
    fn test_app_state_on_fresh_database() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("state.db").to_string_lossy().to_string();

        let state = AppState::new(db_path.clone()).unwrap();
        assert_eq!(state.db_path, db_path);
        assert_eq!(state.allocation_config, AllocationConfig::default());
        assert!(state.order_api.list_orders("").unwrap().is_empty());
    }
}
