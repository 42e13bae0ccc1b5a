// ==========================================
// 考场座位分配系统 - 监考安排仓储
// ==========================================
// 日期经 rusqlite chrono 特性直接绑定（TEXT, YYYY-MM-DD）
// ==========================================

use crate::domain::duty::{DutyAssignment, DutyRosterEntry};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

pub struct DutyAssignmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DutyAssignmentRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询指定日期的监考安排（按考场排序，附教师姓名与考场编号）
    pub fn list_by_date(&self, date: NaiveDate) -> RepositoryResult<Vec<DutyRosterEntry>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT fa.faculty_id, f.name, fa.room_id, r.room_number, fa.exam_date
            FROM faculty_allocation fa
            JOIN rooms r ON fa.room_id = r.room_id
            LEFT JOIN faculty f ON fa.faculty_id = f.faculty_id
            WHERE fa.exam_date = ?1
            ORDER BY fa.room_id
            "#,
        )?;

        let duties = stmt
            .query_map(params![date], |row| {
                Ok(DutyRosterEntry {
                    staff_id: row.get(0)?,
                    staff_name: row.get(1)?,
                    room_id: row.get(2)?,
                    room_number: row.get(3)?,
                    date: row.get(4)?,
                })
            })?
            .collect::<SqliteResult<Vec<DutyRosterEntry>>>()?;

        Ok(duties)
    }

    // ==========================================
    // 事务内写操作
    // ==========================================

    pub(crate) fn clear_for_date(conn: &Connection, date: NaiveDate) -> RepositoryResult<usize> {
        let affected = conn.execute(
            "DELETE FROM faculty_allocation WHERE exam_date = ?1",
            params![date],
        )?;
        Ok(affected)
    }

    pub(crate) fn insert_batch(conn: &Connection, duties: &[DutyAssignment]) -> RepositoryResult<usize> {
        if duties.is_empty() {
            return Ok(0);
        }

        let mut stmt = conn.prepare(
            "INSERT INTO faculty_allocation (faculty_id, room_id, exam_date) VALUES (?1, ?2, ?3)",
        )?;
        for duty in duties {
            stmt.execute(params![duty.staff_id, duty.room_id, duty.date])?;
        }
        Ok(duties.len())
    }
}
