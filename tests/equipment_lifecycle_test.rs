// ==========================================
// 设备记录生命周期集成测试
// ==========================================
// 测试目标: 创建/更新/删除/批量删除/状态刷新/到期提醒(文件数据库)
// ==========================================


use equipment_maintenance::domain::{CheckpointDraft, EquipmentDraft, PpmDraft, ReminderTiming};
use equipment_maintenance::engine::EquipmentError;
use equipment_maintenance::logging;
use equipment_maintenance::{ErrorKind, MaintenanceStatus, Quarter, RecordType, ReminderWindow};
use test_helpers::{base_draft, build_stack, create_test_db, date, ocm_draft, ppm_draft};

#[test]
fn test_ppm_checkpoints_follow_installation_date() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let stack = build_stack(&db_path, date(2024, 2, 1));

    let record = stack
        .service
        .add_entry(&ppm_draft("PPM-1", "2024-01-01"))
        .expect("创建失败");
    let ppm = record.as_ppm().expect("应为 PPM 记录");

    assert_eq!(ppm.checkpoint(Quarter::I).target_date, date(2024, 4, 1));
    assert_eq!(ppm.checkpoint(Quarter::II).target_date, date(2024, 7, 1));
    assert_eq!(ppm.checkpoint(Quarter::III).target_date, date(2024, 10, 1));
    assert_eq!(ppm.checkpoint(Quarter::IV).target_date, date(2025, 1, 1));
    assert_eq!(record.status(), MaintenanceStatus::Upcoming);
}

#[test]
fn test_explicit_checkpoint_date_overrides_schedule() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let stack = build_stack(&db_path, date(2024, 2, 1));

    let mut checkpoints: [CheckpointDraft; 4] = Default::default();
    checkpoints[2].target_date = Some("15/09/2024".to_string());
    let draft = EquipmentDraft::ppm(PpmDraft {
        base: base_draft("PPM-2", "31/01/2024"),
        checkpoints,
    });

    let record = stack.service.add_entry(&draft).expect("创建失败");
    let ppm = record.as_ppm().expect("应为 PPM 记录");
    // 月末截断: 01-31 + 3 个月 → 04-30
    assert_eq!(ppm.checkpoint(Quarter::I).target_date, date(2024, 4, 30));
    assert_eq!(ppm.checkpoint(Quarter::III).target_date, date(2024, 9, 15));
}

#[test]
fn test_update_preserves_sequence_number() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let stack = build_stack(&db_path, date(2024, 2, 1));

    stack.service.add_entry(&ppm_draft("W", "2024-01-01")).unwrap();
    let created = stack.service.add_entry(&ppm_draft("X", "2024-01-01")).unwrap();
    assert_eq!(created.seq_no(), 2);

    let updated = stack
        .service
        .update_entry(RecordType::Ppm, "X", &ppm_draft("X", "2024-03-01"))
        .expect("更新失败");

    assert_eq!(updated.seq_no(), 2);
    assert_eq!(updated.base().installation_date, Some(date(2024, 3, 1)));

    let stored = stack.service.get_entry(RecordType::Ppm, "X").unwrap().unwrap();
    assert_eq!(stored.seq_no(), 2);
}

#[test]
fn test_duplicate_serial_rejected_per_type() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let stack = build_stack(&db_path, date(2024, 2, 1));

    stack.service.add_entry(&ppm_draft("DUP", "2024-01-01")).unwrap();
    let err = stack
        .service
        .add_entry(&ppm_draft("DUP", "2024-02-01"))
        .unwrap_err();
    assert!(matches!(err, EquipmentError::DuplicateKey { .. }));
    assert_eq!(err.kind(), ErrorKind::DuplicateKey);

    // 同一序列号可以存在于另一记录类型
    stack
        .service
        .add_entry(&ocm_draft("DUP", "01/01/2024", None))
        .expect("OCM 与 PPM 互不冲突");
    assert_eq!(stack.service.get_all_entries(RecordType::Ppm).unwrap().len(), 1);
}

#[test]
fn test_delete_and_bulk_delete() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let stack = build_stack(&db_path, date(2024, 2, 1));

    assert!(!stack.service.delete_entry(RecordType::Ocm, "Y").unwrap());

    stack
        .service
        .add_entry(&ocm_draft("Z", "01/01/2024", None))
        .unwrap();
    let summary = stack
        .service
        .bulk_delete(RecordType::Ocm, &["Y".to_string(), "Z".to_string()])
        .unwrap();

    assert_eq!(summary.deleted_count, 1);
    assert_eq!(summary.not_found, 1);
    assert_eq!(summary.not_found_serials, vec!["Y".to_string()]);
    assert!(stack.service.get_entry(RecordType::Ocm, "Z").unwrap().is_none());
}

#[test]
fn test_ocm_status_and_default_next_maintenance() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let stack = build_stack(&db_path, date(2024, 6, 1));

    let defaulted = stack
        .service
        .add_entry(&ocm_draft("O-1", "10/03/2023", None))
        .unwrap();
    let ocm = defaulted.as_ocm().unwrap();
    assert_eq!(ocm.next_maintenance, date(2024, 3, 10));
    assert_eq!(defaulted.status(), MaintenanceStatus::Overdue);

    let upcoming = stack
        .service
        .add_entry(&ocm_draft("O-2", "10/03/2024", Some("10/03/2025")))
        .unwrap();
    assert_eq!(upcoming.status(), MaintenanceStatus::Upcoming);

    let maintained = stack
        .service
        .add_entry(&ocm_draft("O-3", "20/05/2024", Some("20/05/2024")))
        .unwrap();
    assert_eq!(maintained.status(), MaintenanceStatus::Maintained);
}

#[test]
fn test_missing_required_field_names_column() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let stack = build_stack(&db_path, date(2024, 2, 1));

    let mut draft = ppm_draft("M-1", "2024-01-01");
    if let equipment_maintenance::domain::DraftDetail::Ppm(ppm) = &mut draft.detail {
        ppm.base.model = None;
    }

    let err = stack.service.add_entry(&draft).unwrap_err();
    match err {
        EquipmentError::Validation { field, .. } => assert_eq!(field, "MODEL"),
        other => panic!("期望校验错误, 实际 {:?}", other),
    }
}

#[test]
fn test_due_reminders_pick_tightest_window() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let stack = build_stack(&db_path, date(2024, 3, 20));

    // 下次维护 2024-03-30: 10 天后,落入 14 天窗口
    stack
        .service
        .add_entry(&ocm_draft("R-1", "30/03/2023", Some("30/03/2024")))
        .unwrap();
    // 下次维护 2024-05-01: 42 天后,落入 60 天窗口
    stack
        .service
        .add_entry(&ocm_draft("R-2", "01/05/2023", Some("01/05/2024")))
        .unwrap();

    let timing = ReminderTiming::default();
    let items = stack.service.due_reminders(RecordType::Ocm, &timing).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].serial, "R-1");
    assert_eq!(items[0].days_until_due, 10);
    assert_eq!(items[0].window, Some(ReminderWindow::FourteenDays));
    assert_eq!(items[1].window, Some(ReminderWindow::SixtyDays));

    // 关闭 60 天提醒后只剩 R-1
    let timing = ReminderTiming {
        sixty_days_before: false,
        ..ReminderTiming::default()
    };
    let items = stack.service.due_reminders(RecordType::Ocm, &timing).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].serial, "R-1");
}

#[test]
fn test_records_survive_reopen() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    {
        let stack = build_stack(&db_path, date(2024, 2, 1));
        stack.service.add_entry(&ppm_draft("P-9", "2024-01-01")).unwrap();
    }

    let stack = build_stack(&db_path, date(2024, 2, 1));
    let records = stack.service.get_all_entries(RecordType::Ppm).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].serial(), "P-9");
    assert_eq!(records[0].base().name.as_deref(), Some("Pump P-9"));
}
