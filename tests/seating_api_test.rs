// ==========================================
// SeatingApi 集成测试（SQLite）
// ==========================================
// 测试范围:
// 1. 分配: 座位查询、考场座位图、重跑幂等
// 2. 提交失败回滚（触发器注入写入失败）
// 3. 监考: 固定种子、按日期查询
// 4. 占用统计 / 运行日志 / 配置开关
// 5. 并发同一考试对
// ==========================================


use chrono::NaiveDate;
use exam_seating::api::ApiError;
use exam_seating::app::AppState;
use exam_seating::config::config_keys;
use exam_seating::domain::{ExamSide, RunKind};
use exam_seating::engine::SeatLayoutGenerator;
use exam_seating::logging;
use std::sync::Arc;
use tempfile::NamedTempFile;
use test_helpers::*;

// ==========================================
// 测试辅助函数
// ==========================================

/// 标准场景：考场 1 (3×5×2)、考场 2 (2×2×3)；考试 101 有 16 人，102 有 14 人
fn setup() -> (NamedTempFile, String, AppState) {
    logging::init_test();
    let (temp_file, db_path) = create_test_db().unwrap();
    {
        let shared = open_shared(&db_path);
        let conn = shared.lock().unwrap();
        insert_room(&conn, 1, "A-101", 3, 5, 2);
        insert_room(&conn, 2, "A-102", 2, 2, 3);
        seed_exam_pair(&conn, 16, 14);
        insert_faculty(&conn, &[501, 502, 503]);
    }
    let state = AppState::new(db_path.clone()).unwrap();
    (temp_file, db_path, state)
}

fn exam_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 5, 12).unwrap()
}

// ==========================================
// 座位分配
// ==========================================

#[tokio::test]
async fn test_allocate_then_lookup_student_seat() {
    let (_tmp, _path, state) = setup();
    let api = &state.seating_api;

    let outcome = api.allocate(101, 102).await.unwrap();
    // 第一个考场 A/B 各 15 个座位，1CS016 落到第二个考场
    assert!(outcome.is_complete());
    assert_eq!(outcome.seated.len(), 30);

    let first_a = api.find_student_seat("1CS001").unwrap().unwrap();
    assert_eq!(first_a.room_id, 1);
    assert_eq!(first_a.room_number, "A-101");
    assert_eq!((first_a.column, first_a.row, first_a.seat_position), (1, 1, 1));
    assert_eq!(first_a.subject_code.as_deref(), Some("CS401"));
    assert_eq!(first_a.student_name.as_deref(), Some("学生1CS001"));

    let first_b = api.find_student_seat(" 1EC001 ").unwrap().unwrap();
    assert_eq!((first_b.column, first_b.row, first_b.seat_position), (2, 1, 1));

    let overflow = api.find_student_seat("1CS016").unwrap().unwrap();
    assert_eq!(overflow.room_id, 2);
}

#[tokio::test]
async fn test_seat_lookup_edge_cases() {
    let (_tmp, _path, state) = setup();
    let api = &state.seating_api;

    assert!(api.find_student_seat("1CS001").unwrap().is_none());
    assert!(matches!(
        api.find_student_seat("   "),
        Err(ApiError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn test_room_seat_map_interleaves_exams() {
    let (_tmp, _path, state) = setup();
    let api = &state.seating_api;
    api.allocate(101, 102).await.unwrap();

    let map = api.room_seat_map(1).unwrap();
    assert_eq!(map.room.room_number, "A-101");
    // 15 个 A 座位全满，B 侧 14 人
    assert_eq!(map.seats.len(), 29);

    // 同凳相邻两座：姓名与科目代码随座位返回
    let first = &map.seats[0];
    assert_eq!((first.column, first.row, first.seat_position), (1, 1, 1));
    assert_eq!(first.student_id, "1CS001");
    assert_eq!(first.student_name.as_deref(), Some("学生1CS001"));
    assert_eq!(first.subject_code.as_deref(), Some("CS401"));
    let neighbour = &map.seats[1];
    assert_eq!((neighbour.column, neighbour.row, neighbour.seat_position), (1, 1, 2));
    assert_eq!(neighbour.student_id, "1EC001");
    assert_eq!(neighbour.subject_code.as_deref(), Some("EC402"));

    for seat in &map.seats {
        let expected = match SeatLayoutGenerator::side_of(seat.column, seat.seat_position) {
            ExamSide::A => 101,
            ExamSide::B => 102,
        };
        assert_eq!(seat.exam_id, expected, "seat={:?}", seat);
    }

    let mut sorted = map.seats.clone();
    sorted.sort_by_key(|a| (a.column, a.row, a.seat_position));
    assert_eq!(sorted, map.seats);

    assert!(matches!(api.room_seat_map(999), Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn test_rerun_produces_identical_assignments() {
    let (_tmp, _path, state) = setup();
    let api = &state.seating_api;

    let first = api.allocate(101, 102).await.unwrap();
    let map_first = api.room_seat_map(1).unwrap();
    let second = api.allocate(101, 102).await.unwrap();
    let map_second = api.room_seat_map(1).unwrap();

    assert_eq!(first, second);
    assert_eq!(map_first, map_second);

    let runs = api.list_recent_runs(10).unwrap();
    assert_eq!(runs.len(), 2);
    assert!(runs.iter().all(|r| r.run_kind == RunKind::SeatAllocation));
    assert!(runs.iter().all(|r| r.placed_count == 30 && r.shortfall_count == 0));
}

#[tokio::test]
async fn test_shortfall_is_reported_not_dropped() {
    let (_tmp, db_path, state) = setup();
    {
        let shared = open_shared(&db_path);
        let conn = shared.lock().unwrap();
        register_students(&conn, 101, "2CS", 10);
    }

    let outcome = state.seating_api.allocate(101, 102).await.unwrap();

    // 考场 1: A 15 / B 15；考场 2: A 6 / B 6
    assert_eq!(outcome.seated.len(), 21 + 14);
    assert_eq!(outcome.unseated.len(), 26 - 21);
    assert!(outcome.unseated.iter().all(|u| u.exam_id == 101));

    let runs = state.seating_api.list_recent_runs(1).unwrap();
    assert_eq!(runs[0].shortfall_count, 5);
    assert!(runs[0].payload_json.is_some());
}

#[tokio::test]
async fn test_invalid_pair_maps_to_invalid_input() {
    let (_tmp, db_path, state) = setup();

    let result = state.seating_api.allocate(101, 101).await;

    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
    let shared = open_shared(&db_path);
    let conn = shared.lock().unwrap();
    assert_eq!(count_rows(&conn, "allocation_run_log"), 0);
}

// ==========================================
// 提交失败回滚
// ==========================================

#[tokio::test]
async fn test_failed_commit_keeps_previous_seats() {
    let (_tmp, db_path, state) = setup();
    let api = &state.seating_api;
    api.allocate(101, 102).await.unwrap();
    let before = api.room_seat_map(1).unwrap();

    {
        let shared = open_shared(&db_path);
        let conn = shared.lock().unwrap();
        conn.execute_batch(
            r#"
            CREATE TRIGGER fail_allocation_insert
            BEFORE INSERT ON allocation
            WHEN NEW.usn = '1CS010'
            BEGIN
                SELECT RAISE(ABORT, 'simulated write failure');
            END;
            "#,
        )
        .unwrap();
    }

    let result = api.allocate(101, 102).await;

    assert!(matches!(result, Err(ApiError::DatabaseTransactionError(_))));
    assert_eq!(api.room_seat_map(1).unwrap(), before);
    assert_eq!(api.list_recent_runs(10).unwrap().len(), 1);
}

// ==========================================
// 监考排班
// ==========================================

#[tokio::test]
async fn test_duty_with_more_rooms_than_staff() {
    let (_tmp, db_path, state) = setup();
    {
        let shared = open_shared(&db_path);
        let conn = shared.lock().unwrap();
        insert_room(&conn, 3, "B-201", 2, 2, 2);
        insert_room(&conn, 4, "B-202", 2, 2, 2);
    }
    let api = &state.seating_api;

    let outcome = api.assign_duty(exam_day()).await.unwrap();

    assert_eq!(outcome.assigned.len(), 3);
    assert_eq!(outcome.unassigned_rooms, vec![4]);

    let stored = api.list_duty_assignments(exam_day()).unwrap();
    let stored_pairs: Vec<_> = stored.iter().map(|d| (d.staff_id, d.room_id, d.date)).collect();
    let planned_pairs: Vec<_> = outcome
        .assigned
        .iter()
        .map(|d| (d.staff_id, d.room_id, d.date))
        .collect();
    assert_eq!(stored_pairs, planned_pairs);
    assert_eq!(stored[0].room_number, "A-101");
    for duty in &stored {
        assert_eq!(duty.staff_name, Some(format!("教师{}", duty.staff_id)));
    }
    let other_day = NaiveDate::from_ymd_opt(2026, 5, 13).unwrap();
    assert!(api.list_duty_assignments(other_day).unwrap().is_empty());
}

#[tokio::test]
async fn test_seeded_duty_is_reproducible() {
    let (_tmp, _path, state) = setup();
    state
        .config_manager
        .set_global_value(config_keys::DUTY_SHUFFLE_SEED, "42")
        .unwrap();
    let api = &state.seating_api;

    let first = api.assign_duty(exam_day()).await.unwrap();
    let second = api.assign_duty(exam_day()).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(api.list_duty_assignments(exam_day()).unwrap().len(), 2);
    assert_eq!(first.unassigned_staff.len(), 1);

    let runs = api.list_recent_runs(10).unwrap();
    assert_eq!(runs.len(), 2);
    assert!(runs.iter().all(|r| r.scope_key == "duty:2026-05-12"));
}

// ==========================================
// 占用统计 / 运行日志
// ==========================================

#[tokio::test]
async fn test_occupancy_report_honours_empty_room_switch() {
    let (_tmp, db_path, state) = setup();
    {
        let shared = open_shared(&db_path);
        let conn = shared.lock().unwrap();
        insert_room(&conn, 3, "B-201", 2, 2, 2);
    }
    let api = &state.seating_api;
    api.allocate(101, 102).await.unwrap();

    let report = api.room_occupancy_report().await.unwrap();
    let ids: Vec<_> = report.iter().map(|r| r.room_id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(report[0].capacity, 30);
    assert_eq!(report[0].seated, 29);
    assert!((report[0].utilization - 29.0 / 30.0).abs() < 1e-9);
    assert_eq!(report[1].seated, 1);
    assert_eq!(report[2].seated, 0);
    assert_eq!(report[2].utilization, 0.0);

    state
        .config_manager
        .set_global_value(config_keys::REPORT_INCLUDE_EMPTY_ROOMS, "false")
        .unwrap();
    let report = api.room_occupancy_report().await.unwrap();
    assert_eq!(report.len(), 2);
}

#[tokio::test]
async fn test_run_log_limit_is_validated() {
    let (_tmp, _path, state) = setup();
    let api = &state.seating_api;

    assert!(api.list_recent_runs(5).unwrap().is_empty());
    assert!(matches!(api.list_recent_runs(0), Err(ApiError::InvalidInput(_))));
    assert!(matches!(
        api.list_recent_runs(exam_seating::api::MAX_RUN_LOG_LIMIT + 1),
        Err(ApiError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn test_invalid_geometry_skipped_when_configured() {
    let (_tmp, db_path, state) = setup();
    {
        let shared = open_shared(&db_path);
        let conn = shared.lock().unwrap();
        insert_room(&conn, 0, "BROKEN", 2, 2, 5);
    }
    let api = &state.seating_api;

    assert!(matches!(
        api.allocate(101, 102).await,
        Err(ApiError::ValidationError(_))
    ));

    state
        .config_manager
        .set_global_value(config_keys::SKIP_INVALID_ROOMS, "true")
        .unwrap();
    let outcome = api.allocate(101, 102).await.unwrap();
    assert!(outcome.seated.iter().all(|a| a.room_id != 0));
}

#[tokio::test]
async fn test_oversized_room_is_rejected_without_panicking() {
    let (_tmp, db_path, state) = setup();
    {
        let shared = open_shared(&db_path);
        let conn = shared.lock().unwrap();
        insert_room(&conn, 9, "HALL", 65_536, 65_536, 2);
    }
    let api = &state.seating_api;

    let report = api.room_occupancy_report().await.unwrap();
    let hall = report.iter().find(|r| r.room_id == 9).unwrap();
    assert_eq!(hall.capacity, 65_536 * 65_536 * 2);
    assert_eq!(hall.seated, 0);

    assert!(matches!(
        api.allocate(101, 102).await,
        Err(ApiError::ValidationError(_))
    ));

    state
        .config_manager
        .set_global_value(config_keys::SKIP_INVALID_ROOMS, "true")
        .unwrap();
    let outcome = api.allocate(101, 102).await.unwrap();
    assert!(outcome.is_complete());
    assert!(outcome.seated.iter().all(|a| a.room_id != 9));
}

// ==========================================
// 并发
// ==========================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_allocations_for_same_pair() {
    let (_tmp, _path, state) = setup();
    let api = state.seating_api.clone();

    let handles: Vec<_> = (0..3)
        .map(|_| {
            let api = Arc::clone(&api);
            tokio::spawn(async move { api.allocate(101, 102).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(api.room_seat_map(1).unwrap().seats.len(), 29);
    assert_eq!(api.room_seat_map(2).unwrap().seats.len(), 1);
    assert_eq!(api.list_recent_runs(10).unwrap().len(), 3);
}
