// ==========================================
// 考场座位分配系统 - 座位分配仓储
// ==========================================
// 红线: 写操作只在工作单元内执行（见 sqlite_store）
// ==========================================

use crate::domain::allocation::{Assignment, RoomSeat, StudentSeat};
use crate::domain::types::{ExamId, RoomId};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ==========================================
// AllocationRepository - 座位分配仓储
// ==========================================
pub struct AllocationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AllocationRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_assignment(row: &Row<'_>) -> SqliteResult<Assignment> {
        Ok(Assignment {
            student_id: row.get(0)?,
            exam_id: row.get(1)?,
            room_id: row.get(2)?,
            column: row.get(3)?,
            row: row.get(4)?,
            seat_position: row.get(5)?,
        })
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 按学号查询座位（学生端查询）
    ///
    /// 学生在多个考试对中都有座位时，返回最近一次写入的记录。
    ///
    /// # 返回
    /// - Ok(Some(StudentSeat)): 已分配
    /// - Ok(None): 尚未分配（正常结果，不是错误）
    pub fn find_by_student(&self, usn: &str) -> RepositoryResult<Option<StudentSeat>> {
        let conn = self.get_conn()?;
        let seat = conn
            .query_row(
                r#"
                SELECT a.usn, s.name, a.exam_id, e.subject_code,
                       a.room_id, r.room_number,
                       a.bench_column, a.bench_row, a.seat_position
                FROM allocation a
                JOIN rooms r ON a.room_id = r.room_id
                LEFT JOIN students s ON a.usn = s.usn
                LEFT JOIN exams e ON a.exam_id = e.exam_id
                WHERE a.usn = ?1
                ORDER BY a.allocation_id DESC
                LIMIT 1
                "#,
                params![usn],
                |row| {
                    Ok(StudentSeat {
                        student_id: row.get(0)?,
                        student_name: row.get(1)?,
                        exam_id: row.get(2)?,
                        subject_code: row.get(3)?,
                        room_id: row.get(4)?,
                        room_number: row.get(5)?,
                        column: row.get(6)?,
                        row: row.get(7)?,
                        seat_position: row.get(8)?,
                    })
                },
            )
            .optional()?;

        Ok(seat)
    }

    /// 查询考场内全部座位（按列、行、凳内位置排序，附姓名与科目代码）
    pub fn list_by_room(&self, room_id: RoomId) -> RepositoryResult<Vec<RoomSeat>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT a.usn, s.name, a.exam_id, e.subject_code,
                   a.bench_column, a.bench_row, a.seat_position
            FROM allocation a
            LEFT JOIN students s ON a.usn = s.usn
            LEFT JOIN exams e ON a.exam_id = e.exam_id
            WHERE a.room_id = ?1
            ORDER BY a.bench_column, a.bench_row, a.seat_position, a.exam_id
            "#,
        )?;

        let seats = stmt
            .query_map(params![room_id], |row| {
                Ok(RoomSeat {
                    student_id: row.get(0)?,
                    student_name: row.get(1)?,
                    exam_id: row.get(2)?,
                    subject_code: row.get(3)?,
                    column: row.get(4)?,
                    row: row.get(5)?,
                    seat_position: row.get(6)?,
                })
            })?
            .collect::<SqliteResult<Vec<RoomSeat>>>()?;

        Ok(seats)
    }

    /// 查询两门考试的全部座位（按写入顺序）
    pub fn list_by_exams(&self, exam_a: ExamId, exam_b: ExamId) -> RepositoryResult<Vec<Assignment>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT usn, exam_id, room_id, bench_column, bench_row, seat_position
            FROM allocation
            WHERE exam_id IN (?1, ?2)
            ORDER BY allocation_id
            "#,
        )?;

        let seats = stmt
            .query_map(params![exam_a, exam_b], Self::map_assignment)?
            .collect::<SqliteResult<Vec<Assignment>>>()?;

        Ok(seats)
    }

    /// 按考场统计已入座人数
    pub fn count_by_room(&self) -> RepositoryResult<HashMap<RoomId, u32>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT room_id, COUNT(*) FROM allocation GROUP BY room_id")?;

        let mut counts = HashMap::new();
        let rows = stmt.query_map([], |row| Ok((row.get::<_, RoomId>(0)?, row.get::<_, u32>(1)?)))?;
        for row in rows {
            let (room_id, count) = row?;
            counts.insert(room_id, count);
        }
        Ok(counts)
    }

    // ==========================================
    // 事务内写操作（调用方负责事务边界）
    // ==========================================

    /// 删除两门考试的全部座位
    pub(crate) fn clear_for_exams(
        conn: &Connection,
        exam_a: ExamId,
        exam_b: ExamId,
    ) -> RepositoryResult<usize> {
        let affected = conn.execute(
            "DELETE FROM allocation WHERE exam_id IN (?1, ?2)",
            params![exam_a, exam_b],
        )?;
        Ok(affected)
    }

    /// 批量写入座位
    pub(crate) fn insert_batch(conn: &Connection, items: &[Assignment]) -> RepositoryResult<usize> {
        if items.is_empty() {
            return Ok(0);
        }

        let mut stmt = conn.prepare(
            r#"INSERT INTO allocation (
                    usn, exam_id, room_id, bench_column, bench_row, seat_position
                ) VALUES (?, ?, ?, ?, ?, ?)"#,
        )?;

        for item in items {
            stmt.execute(params![
                &item.student_id,
                &item.exam_id,
                &item.room_id,
                &item.column,
                &item.row,
                &item.seat_position,
            ])?;
        }

        Ok(items.len())
    }
}
