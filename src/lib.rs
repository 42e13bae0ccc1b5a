// ==========================================
// 考场座位分配系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 功能: 同场两门考试交错就座 + 监考随机排班
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 座位布局 / 分配规划 / 监考排班
pub mod engine;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 性能统计（SQL 计数 / 慢查询）
pub mod perf;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ExamId, ExamSide, RoomId, RunKind, StaffId, StudentId, UnseatedReason};

// 领域实体
pub use domain::{
    AllocationOutcome, Assignment, DutyAssignment, DutyOutcome, DutyRosterEntry, ExamPair,
    ExamRosterEntry, Room, RoomOccupancy, RoomSeat, RoomSeatMap, RunLog, SeatSlot, StudentSeat,
    UnseatedStudent,
};

// 引擎
pub use engine::{
    AllocationEngine, AllocationPlanner, DutyEngine, DutyPlanner, EngineError, RunLockRegistry,
    SeatLayoutGenerator,
};

// 持久化接口
pub use repository::{AllocationStore, SqliteAllocationStore, UnitOfWork};

// API
pub use api::{ApiError, SeatingApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "考场座位分配系统";
