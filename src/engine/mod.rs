// ==========================================
// 考场座位分配系统 - 引擎层
// ==========================================
// 职责: 座位布局、分配规划、监考排班及其提交编排
// 红线: Engine 不拼 SQL, 持久化一律经由 AllocationStore
// ==========================================

pub mod allocation_engine;
pub mod allocation_planner;
pub mod blocking;
pub mod duty_engine;
pub mod duty_planner;
pub mod error;
pub mod run_lock;
pub mod seat_layout;

// 重导出核心引擎
pub use allocation_engine::AllocationEngine;
pub use allocation_planner::AllocationPlanner;
pub use duty_engine::{DutyEngine, DutyRng};
pub use duty_planner::DutyPlanner;
pub use error::{EngineError, EngineResult};
pub use run_lock::{RunLockGuard, RunLockRegistry};
pub use seat_layout::{RoomSlotPlan, SeatLayoutGenerator};
