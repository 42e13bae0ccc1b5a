// ==========================================
// 考场座位分配系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为（外键、busy_timeout）
// - 统一建库脚本，缺表时自动创建
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
///
/// 分配/排班提交使用 BEGIN IMMEDIATE，第二个写者在此时间内等待写锁。
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 建库脚本
///
/// 说明：
/// - allocation 的两个 UNIQUE 约束兜底“不重复占座/不重复入座”
/// - faculty_allocation 的主键与 UNIQUE 约束兜底“一场一人/一人一场”
const SCHEMA_SQL: &str = r#"
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

CREATE TABLE IF NOT EXISTS rooms (
    room_id INTEGER PRIMARY KEY,
    room_number TEXT NOT NULL UNIQUE,
    bench_columns INTEGER NOT NULL CHECK (bench_columns >= 0),
    benches_per_column INTEGER NOT NULL CHECK (benches_per_column >= 0),
    seats_per_bench INTEGER NOT NULL DEFAULT 2
);

CREATE TABLE IF NOT EXISTS students (
    usn TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    semester INTEGER
);

CREATE TABLE IF NOT EXISTS exams (
    exam_id INTEGER PRIMARY KEY,
    subject_code TEXT NOT NULL,
    exam_date TEXT
);

CREATE TABLE IF NOT EXISTS student_exam_map (
    usn TEXT NOT NULL REFERENCES students(usn) ON DELETE CASCADE,
    exam_id INTEGER NOT NULL REFERENCES exams(exam_id) ON DELETE CASCADE,
    PRIMARY KEY (usn, exam_id)
);

CREATE TABLE IF NOT EXISTS faculty (
    faculty_id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    department TEXT
);

CREATE TABLE IF NOT EXISTS allocation (
    allocation_id INTEGER PRIMARY KEY AUTOINCREMENT,
    usn TEXT NOT NULL REFERENCES students(usn) ON DELETE CASCADE,
    exam_id INTEGER NOT NULL REFERENCES exams(exam_id) ON DELETE CASCADE,
    room_id INTEGER NOT NULL REFERENCES rooms(room_id),
    bench_column INTEGER NOT NULL,
    bench_row INTEGER NOT NULL,
    seat_position INTEGER NOT NULL,
    UNIQUE (usn, exam_id),
    UNIQUE (exam_id, room_id, bench_column, bench_row, seat_position)
);
CREATE INDEX IF NOT EXISTS idx_allocation_room ON allocation(room_id);
CREATE INDEX IF NOT EXISTS idx_allocation_usn ON allocation(usn);

CREATE TABLE IF NOT EXISTS faculty_allocation (
    faculty_id INTEGER NOT NULL REFERENCES faculty(faculty_id) ON DELETE CASCADE,
    room_id INTEGER NOT NULL REFERENCES rooms(room_id),
    exam_date TEXT NOT NULL,
    PRIMARY KEY (exam_date, room_id),
    UNIQUE (exam_date, faculty_id)
);

CREATE TABLE IF NOT EXISTS allocation_run_log (
    run_id TEXT PRIMARY KEY,
    run_kind TEXT NOT NULL,
    scope_key TEXT NOT NULL,
    created_at TEXT NOT NULL,
    placed_count INTEGER NOT NULL,
    shortfall_count INTEGER NOT NULL,
    payload_json TEXT
);
CREATE INDEX IF NOT EXISTS idx_run_log_created ON allocation_run_log(created_at);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
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

/// 建表（幂等）并登记 schema_version
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
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
