// ==========================================
// 配置管理集成测试
// ==========================================
// 测试目标: 部分更新合并、校验拒绝时持久化不变、跨实例读取
// ==========================================


use equipment_maintenance::config::{PermissionTable, SettingsError};
use equipment_maintenance::repository::SqliteSettingsRepository;
use equipment_maintenance::ErrorKind;
use serde_json::{json, Map, Value};
use test_helpers::{build_stack, create_test_db, date};

fn patch(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("patch must be an object")
}

#[test]
fn test_defaults_when_nothing_persisted() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let stack = build_stack(&db_path, date(2024, 1, 1));

    let settings = stack.settings.load().unwrap();
    assert!(settings.use_daily_send_time);
    assert!(!settings.use_legacy_interval);
    assert_eq!(settings.email_send_time, "07:00");
    assert_eq!(settings.email_reminder_interval_minutes, 60);
    assert!(settings.reminder_timing.fourteen_days_before);
}

#[test]
fn test_partial_update_persists_across_instances() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    {
        let stack = build_stack(&db_path, date(2024, 1, 1));
        let saved = stack
            .settings
            .update(&patch(json!({
                "recipient_email": "biomed@hospital.org",
                "cc_emails": "a@hospital.org, b@hospital.org",
                "reminder_timing": { "60_days_before": false }
            })))
            .unwrap();
        assert!(!saved.reminder_timing.sixty_days_before);
        assert!(saved.reminder_timing.one_day_before);
    }

    let stack = build_stack(&db_path, date(2024, 1, 1));
    let settings = stack.settings.load().unwrap();
    assert_eq!(settings.recipient_email, "biomed@hospital.org");
    assert_eq!(
        settings.cc_list(),
        vec!["a@hospital.org".to_string(), "b@hospital.org".to_string()]
    );
    assert!(!settings.reminder_timing.sixty_days_before);
    // 未出现在补丁中的键保持默认
    assert_eq!(settings.scheduler_interval_hours, 24);
}

#[test]
fn test_conflicting_send_modes_leave_store_unchanged() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let stack = build_stack(&db_path, date(2024, 1, 1));

    stack
        .settings
        .update(&patch(json!({ "email_send_time": "08:30" })))
        .unwrap();
    let before = stack.settings.current_map().unwrap();

    let err = stack
        .settings
        .update(&patch(json!({
            "use_daily_send_time": true,
            "use_legacy_interval": true
        })))
        .unwrap_err();

    assert!(matches!(err, SettingsError::ConfigurationConflict { .. }));
    assert_eq!(err.kind(), ErrorKind::ConfigurationConflict);
    assert_eq!(stack.settings.current_map().unwrap(), before);
    assert_eq!(stack.settings.load().unwrap().email_send_time, "08:30");
}

#[test]
fn test_zero_interval_is_range_error() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let stack = build_stack(&db_path, date(2024, 1, 1));

    let err = stack
        .settings
        .update(&patch(json!({ "email_reminder_interval_minutes": 0 })))
        .unwrap_err();

    assert!(matches!(err, SettingsError::ConfigurationRange { .. }));
    assert_eq!(err.kind(), ErrorKind::ConfigurationRange);
    assert_eq!(stack.settings.load().unwrap().email_reminder_interval_minutes, 60);
}

#[test]
fn test_wrong_type_is_type_error() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let stack = build_stack(&db_path, date(2024, 1, 1));

    let err = stack
        .settings
        .update(&patch(json!({ "push_notifications_enabled": "yes" })))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ConfigurationType);
}

#[test]
fn test_malformed_roles_leave_store_unchanged() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let stack = build_stack(&db_path, date(2024, 1, 1));
    let repo = SqliteSettingsRepository::new(&db_path).unwrap();
    let before = stack.settings.current_map().unwrap();

    let err = stack
        .settings
        .update(&patch(json!({ "roles": "admin" })))
        .unwrap_err();

    assert!(matches!(err, SettingsError::ConfigurationType { .. }));
    assert_eq!(stack.settings.current_map().unwrap(), before);
    // 存储中的配置仍可构建权限表
    assert_eq!(PermissionTable::load(&repo).unwrap().role_count(), 0);
}

#[test]
fn test_permission_table_reload_after_update() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let stack = build_stack(&db_path, date(2024, 1, 1));
    let repo = SqliteSettingsRepository::new(&db_path).unwrap();

    let mut table = PermissionTable::load(&repo).unwrap();
    assert_eq!(table.role_count(), 0);

    stack
        .settings
        .update(&patch(json!({
            "roles": { "Technician": { "permissions": ["equipment.update"] } }
        })))
        .unwrap();

    // 显式 reload 之前,已持有的表不变
    assert!(!table.has_permission("technician", "equipment.update"));
    table.reload(&repo).unwrap();
    assert!(table.has_permission("TECHNICIAN", "equipment.update"));
}
