// ==========================================
// 考场座位分配系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::SeatingApi;
use crate::config::config_manager::ConfigManager;
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::engine::{AllocationEngine, DutyEngine, RunLockRegistry};
use crate::repository::{
    AllocationRepository, AllocationStore, DutyAssignmentRepository, RoomRepository,
    RunLogRepository, SqliteAllocationStore,
};

/// 应用状态
///
/// 包含所有API实例和共享资源
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 座位分配API
    pub seating_api: Arc<SeatingApi>,

    /// 配置管理器（命令行 `config` 子命令直接读写）
    pub config_manager: Arc<ConfigManager>,

    /// 考场仓储（用于初始化考场目录）
    pub room_repo: Arc<RoomRepository>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库并确保表结构存在
    /// 2. 初始化所有Repository
    /// 3. 初始化引擎（两个引擎共享同一运行互斥令牌表）
    /// 4. 创建API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let mut conn =
            open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        ensure_schema(&conn).map_err(|e| format!("数据库表结构初始化失败: {}", e))?;
        crate::perf::install_sqlite_tracing(&mut conn);

        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let room_repo = Arc::new(RoomRepository::new(conn.clone()));
        let allocation_repo = Arc::new(AllocationRepository::new(conn.clone()));
        let duty_repo = Arc::new(DutyAssignmentRepository::new(conn.clone()));
        let run_log_repo = Arc::new(RunLogRepository::new(conn.clone()));
        let store: Arc<dyn AllocationStore> = Arc::new(SqliteAllocationStore::new(conn.clone()));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // ==========================================
        // 初始化Engine层
        // ==========================================
        let locks = Arc::new(RunLockRegistry::new());
        let allocation_engine = Arc::new(AllocationEngine::new(
            store.clone(),
            config_manager.clone(),
            locks.clone(),
        ));
        let duty_engine = Arc::new(DutyEngine::new(store, config_manager.clone(), locks));

        // ==========================================
        // 初始化API层
        // ==========================================
        let seating_api = Arc::new(SeatingApi::new(
            allocation_engine,
            duty_engine,
            room_repo.clone(),
            allocation_repo,
            duty_repo,
            run_log_repo,
            config_manager.clone(),
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            seating_api,
            config_manager,
            room_repo,
        })
    }
}

/// 默认数据库路径
///
/// 优先级：`EXAM_SEATING_DB_PATH` → 用户数据目录 → `./exam_seating.db`
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("EXAM_SEATING_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./exam_seating.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("exam-seating");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("exam_seating.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }

    #[test]
    fn test_app_state_bootstraps_fresh_database() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("seating.db").to_string_lossy().to_string();

        let state = AppState::new(db_path.clone()).unwrap();
        assert_eq!(state.db_path, db_path);
        assert!(state.room_repo.list_all().unwrap().is_empty());
    }
}
