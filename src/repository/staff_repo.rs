// ==========================================
// 考场座位分配系统 - 监考教师仓储
// ==========================================

use crate::domain::types::StaffId;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

pub struct StaffRepository {
    conn: Arc<Mutex<Connection>>,
}

impl StaffRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 列出全部可用教师ID（升序，保证种子固定时排班可复现）
    pub fn list_ids(&self) -> RepositoryResult<Vec<StaffId>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT faculty_id FROM faculty ORDER BY faculty_id")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<SqliteResult<Vec<StaffId>>>()?;
        Ok(ids)
    }
}
