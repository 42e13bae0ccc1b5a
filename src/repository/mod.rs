// ==========================================
// 考场座位分配系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod allocation_repo;
pub mod duty_repo;
pub mod error;
pub mod room_repo;
pub mod roster_repo;
pub mod run_log_repo;
pub mod sqlite_store;
pub mod staff_repo;
pub mod store;

// 重导出核心仓储
pub use allocation_repo::AllocationRepository;
pub use duty_repo::DutyAssignmentRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use room_repo::RoomRepository;
pub use roster_repo::RosterRepository;
pub use run_log_repo::RunLogRepository;
pub use sqlite_store::SqliteAllocationStore;
pub use staff_repo::StaffRepository;
pub use store::{AllocationStore, TransactionWork, UnitOfWork};
