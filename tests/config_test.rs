// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 验证 config_kv 覆写的读取、默认值回退与校验
// ==========================================

mod test_helpers;

use footwear_lot_planner::config::{config_keys, ConfigError, ConfigManager, SizeCurve};
use footwear_lot_planner::domain::ProductType;
use test_helpers::{create_test_db, insert_config, open_test_connection};

#[test]
fn test_config_manager_creation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path);
    assert!(
        config_manager.is_ok(),
        "ConfigManager should be created successfully"
    );
}

#[test]
fn test_missing_keys_fall_back_to_defaults() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");

    let config = config_manager.load_allocation_config().unwrap();
    assert_eq!(config.lot_capacity, 20);
    assert_eq!(config.round_count, 5);
    assert_eq!(config.size_labels.len(), 12);
    assert_eq!(config.curve(ProductType::Men).unwrap().slots_per_round(), 12);
    assert_eq!(config.curve(ProductType::Women).unwrap().slots_per_round(), 12);
}

#[test]
fn test_overrides_from_config_kv() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let conn = open_test_connection(&db_path).expect("Failed to open db");
    insert_config(&conn, config_keys::LOT_CAPACITY, "24").unwrap();
    insert_config(&conn, config_keys::ROUND_COUNT, "3").unwrap();
    insert_config(
        &conn,
        &config_keys::size_curve(ProductType::Women),
        r#"[{"size":"5","lots":2},{"size":"6","lots":2}]"#,
    )
    .unwrap();

    let config_manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");
    let config = config_manager.load_allocation_config().unwrap();

    assert_eq!(config.lot_capacity, 24);
    assert_eq!(config.round_count, 3);
    assert_eq!(
        config.curve(ProductType::Women).unwrap(),
        &SizeCurve::new([("5", 2), ("6", 2)])
    );
    // 未覆写的曲线保持默认
    assert_eq!(config.curve(ProductType::Men).unwrap().steps()[0].size, "7");
    assert_eq!(config.capacity_ceiling(ProductType::Women).unwrap(), 24 * 4 * 3);
}

#[test]
fn test_set_config_value_upserts() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");

    config_manager
        .set_config_value(config_keys::LOT_CAPACITY, "18")
        .unwrap();
    config_manager
        .set_config_value(config_keys::LOT_CAPACITY, "16")
        .unwrap();

    assert_eq!(
        config_manager
            .get_config_value(config_keys::LOT_CAPACITY)
            .unwrap()
            .as_deref(),
        Some("16")
    );

    let snapshot: serde_json::Value =
        serde_json::from_str(&config_manager.get_config_snapshot().unwrap()).unwrap();
    assert_eq!(snapshot[config_keys::LOT_CAPACITY], "16");
}

#[test]
fn test_set_size_curve_round_trips_through_storage() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");

    let curve = SizeCurve::new([("9x", 1), ("10", 3)]);
    config_manager
        .set_size_curve(ProductType::Men, &curve)
        .unwrap();

    let config = config_manager.load_allocation_config().unwrap();
    assert_eq!(config.curve(ProductType::Men).unwrap(), &curve);
}

#[test]
fn test_invalid_overrides_rejected() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path).expect("Failed to create ConfigManager");

    config_manager
        .set_config_value(config_keys::LOT_CAPACITY, "0")
        .unwrap();
    assert!(matches!(
        config_manager.load_allocation_config(),
        Err(ConfigError::InvalidValue { .. })
    ));

    config_manager
        .set_config_value(config_keys::LOT_CAPACITY, "abc")
        .unwrap();
    assert!(matches!(
        config_manager.load_allocation_config(),
        Err(ConfigError::InvalidValue { .. })
    ));

    config_manager
        .set_config_value(config_keys::LOT_CAPACITY, "20")
        .unwrap();
    config_manager
        .set_config_value(
            &config_keys::size_curve(ProductType::Men),
            r#"[{"size":"13","lots":1}]"#,
        )
        .unwrap();
    assert!(matches!(
        config_manager.load_allocation_config(),
        Err(ConfigError::UnknownSize { .. })
    ));

    config_manager
        .set_config_value(config_keys::SIZE_LABELS, "not json")
        .unwrap();
    assert!(matches!(
        config_manager.load_allocation_config(),
        Err(ConfigError::Parse { .. })
    ));
}
