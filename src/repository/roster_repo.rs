// ==========================================
// 考场座位分配系统 - 报名名册仓储
// ==========================================

use crate::domain::roster::ExamRosterEntry;
use crate::domain::types::ExamId;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// RosterRepository - 名册仓储
// ==========================================
// 红线: 必须按学号升序返回，顺序即入座顺序
pub struct RosterRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RosterRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询考试名册（学号升序）
    pub fn list_ascending(&self, exam_id: ExamId) -> RepositoryResult<Vec<ExamRosterEntry>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT usn, exam_id FROM student_exam_map WHERE exam_id = ?1 ORDER BY usn ASC",
        )?;

        let entries = stmt
            .query_map(params![exam_id], |row| {
                Ok(ExamRosterEntry {
                    student_id: row.get(0)?,
                    exam_id: row.get(1)?,
                })
            })?
            .collect::<SqliteResult<Vec<ExamRosterEntry>>>()?;

        Ok(entries)
    }

    /// 统计考试报名人数
    pub fn count_by_exam(&self, exam_id: ExamId) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM student_exam_map WHERE exam_id = ?1",
            params![exam_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
