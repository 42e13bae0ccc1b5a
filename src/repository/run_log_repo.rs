// ==========================================
// 考场座位分配系统 - 运行日志仓储
// ==========================================
// 红线: 只追加，不修改
// 时间戳经 rusqlite chrono 特性直接绑定
// ==========================================

use crate::domain::run_log::RunLog;
use crate::domain::types::RunKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

pub struct RunLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RunLogRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询最近的运行日志（新的在前）
    pub fn list_recent(&self, limit: usize) -> RepositoryResult<Vec<RunLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT run_id, run_kind, scope_key, created_at,
                   placed_count, shortfall_count, payload_json
            FROM allocation_run_log
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, NaiveDateTime>(3)?,
                    row.get::<_, u32>(4)?,
                    row.get::<_, u32>(5)?,
                    row.get::<_, Option<String>>(6)?,
                ))
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        let mut logs = Vec::with_capacity(rows.len());
        for (run_id, kind, scope_key, created_at, placed_count, shortfall_count, payload) in rows {
            let run_kind = RunKind::from_str(&kind).ok_or_else(|| RepositoryError::FieldValueError {
                field: "run_kind".to_string(),
                message: format!("未知运行类型: {}", kind),
            })?;
            let payload_json = match payload {
                Some(raw) => Some(serde_json::from_str(&raw).map_err(|e| {
                    RepositoryError::FieldValueError {
                        field: "payload_json".to_string(),
                        message: e.to_string(),
                    }
                })?),
                None => None,
            };

            logs.push(RunLog {
                run_id,
                run_kind,
                scope_key,
                created_at,
                placed_count,
                shortfall_count,
                payload_json,
            });
        }

        Ok(logs)
    }

    // ==========================================
    // 事务内写操作
    // ==========================================

    pub(crate) fn append(conn: &Connection, entry: &RunLog) -> RepositoryResult<()> {
        let payload = entry
            .payload_json
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| RepositoryError::InternalError(e.to_string()))?;

        conn.execute(
            r#"
            INSERT INTO allocation_run_log (
                run_id, run_kind, scope_key, created_at,
                placed_count, shortfall_count, payload_json
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                entry.run_id,
                entry.run_kind.to_string(),
                entry.scope_key,
                entry.created_at,
                entry.placed_count,
                entry.shortfall_count,
                payload,
            ],
        )?;
        Ok(())
    }
}
