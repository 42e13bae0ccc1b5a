// ==========================================
// 考场座位分配系统 - 应用层
// ==========================================
// 职责: 组装仓储、引擎与 API
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState};
