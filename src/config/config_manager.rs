// ==========================================
// 鞋业生产订单系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写
// 存储: config_kv 表 (key-value, scope_id='global')
// 缺失的键回退到 AllocationConfig::default()
// ==========================================

use crate::config::allocation_config::{AllocationConfig, SizeCurve};
use crate::config::error::{ConfigError, ConfigResult};
use crate::db::open_sqlite_connection;
use crate::domain::types::ProductType;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    /// 每批双数
    pub const LOT_CAPACITY: &str = "lot_capacity";
    /// 轮次数
    pub const ROUND_COUNT: &str = "round_count";
    /// 尺码列（JSON 数组）
    pub const SIZE_LABELS: &str = "size_labels";
    /// 尺码曲线前缀，完整键为 size_curve/{MEN|WOMEN}
    pub const SIZE_CURVE_PREFIX: &str = "size_curve/";

    pub fn size_curve(product_type: crate::domain::types::ProductType) -> String {
        format!("{}{}", SIZE_CURVE_PREFIX, product_type.as_str())
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> ConfigResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        tracing::info!(key = key, "配置已更新");
        Ok(())
    }

    /// 写入产品类型的尺码曲线
    pub fn set_size_curve(&self, product_type: ProductType, curve: &SizeCurve) -> ConfigResult<()> {
        let key = config_keys::size_curve(product_type);
        let raw = serde_json::to_string(curve).map_err(|source| ConfigError::Parse {
            key: key.clone(),
            source,
        })?;
        self.set_config_value(&key, &raw)
    }

    /// 获取所有 global 配置的快照（JSON 对象）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;

        let mut config_map = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        serde_json::to_string(&config_map).map_err(|source| ConfigError::Parse {
            key: "*".to_string(),
            source,
        })
    }

    // ===== 分批配置 =====

    /// 加载分批配置（库内覆写 + 默认值），并做完整性校验
    pub fn load_allocation_config(&self) -> ConfigResult<AllocationConfig> {
        let mut config = AllocationConfig::default();

        if let Some(v) = self.get_config_value(config_keys::LOT_CAPACITY)? {
            config.lot_capacity = parse_u32(config_keys::LOT_CAPACITY, &v)?;
        }
        if let Some(v) = self.get_config_value(config_keys::ROUND_COUNT)? {
            config.round_count = parse_u32(config_keys::ROUND_COUNT, &v)?;
        }
        if let Some(labels) = self.get_json::<Vec<String>>(config_keys::SIZE_LABELS)? {
            config.size_labels = labels;
        }
        for product_type in ProductType::ALL {
            let key = config_keys::size_curve(product_type);
            if let Some(curve) = self.get_json::<SizeCurve>(&key)? {
                config.curves.insert(product_type, curve);
            }
        }

        config.validate()?;

        tracing::debug!(
            lot_capacity = config.lot_capacity,
            round_count = config.round_count,
            size_columns = config.size_labels.len(),
            "分批配置已加载"
        );

        Ok(config)
    }

    fn get_json<T: DeserializeOwned>(&self, key: &str) -> ConfigResult<Option<T>> {
        match self.get_config_value(key)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| ConfigError::Parse {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }
}

fn parse_u32(key: &str, raw: &str) -> ConfigResult<u32> {
    raw.trim().parse::<u32>().map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })
}
