// ==========================================
// 考场座位分配系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod allocation;
pub mod duty;
pub mod room;
pub mod roster;
pub mod run_log;
pub mod types;

// 重导出核心类型
pub use allocation::{
    AllocationOutcome, Assignment, RoomOccupancy, RoomSeat, RoomSeatMap, SeatSlot,
    StudentSeat, UnseatedStudent,
};
pub use duty::{DutyAssignment, DutyOutcome, DutyRosterEntry};
pub use room::Room;
pub use roster::{ExamPair, ExamRosterEntry};
pub use run_log::RunLog;
pub use types::{ExamId, ExamSide, RoomId, RunKind, StaffId, StudentId, UnseatedReason};
