// ==========================================
// 考场座位分配系统 - 考场数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::room::Room;
use crate::domain::types::RoomId;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const ROOM_COLUMNS: &str =
    "room_id, room_number, bench_columns, benches_per_column, seats_per_bench";

// ==========================================
// RoomRepository - 考场仓储
// ==========================================

/// 考场仓储
/// 职责: 管理 rooms 表的读取与目录维护
pub struct RoomRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RoomRepository {
    /// 从已有连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<Room> {
        Ok(Room {
            room_id: row.get(0)?,
            room_number: row.get(1)?,
            columns: row.get(2)?,
            rows_per_column: row.get(3)?,
            seats_per_bench: row.get(4)?,
        })
    }

    /// 按目录顺序（room_id 升序）列出全部考场
    pub fn list_all(&self) -> RepositoryResult<Vec<Room>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM rooms ORDER BY room_id",
            ROOM_COLUMNS
        ))?;

        let rooms = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<Room>>>()?;

        Ok(rooms)
    }

    /// 按ID查询考场
    ///
    /// # 返回
    /// - Ok(Some(Room)): 找到
    /// - Ok(None): 未找到
    pub fn find_by_id(&self, room_id: RoomId) -> RepositoryResult<Option<Room>> {
        let conn = self.get_conn()?;
        let room = conn
            .query_row(
                &format!("SELECT {} FROM rooms WHERE room_id = ?1", ROOM_COLUMNS),
                params![room_id],
                Self::map_row,
            )
            .optional()?;

        Ok(room)
    }

    /// 插入或更新考场
    pub fn upsert(&self, room: &Room) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO rooms (room_id, room_number, bench_columns, benches_per_column, seats_per_bench)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(room_id) DO UPDATE SET
                room_number = excluded.room_number,
                bench_columns = excluded.bench_columns,
                benches_per_column = excluded.benches_per_column,
                seats_per_bench = excluded.seats_per_bench
            "#,
            params![
                room.room_id,
                room.room_number,
                room.columns,
                room.rows_per_column,
                room.seats_per_bench,
            ],
        )?;
        Ok(())
    }
}
