// ==========================================
// 考场座位分配系统 - 座位分配 API
// ==========================================
// 职责: 座位分配 / 监考排班的触发入口与只读查询
// 说明: 写操作委托给引擎，读操作直接走仓储
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::instrument;

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, EngineConfigReader};
use crate::domain::allocation::{AllocationOutcome, RoomOccupancy, RoomSeatMap, StudentSeat};
use crate::domain::duty::{DutyOutcome, DutyRosterEntry};
use crate::domain::run_log::RunLog;
use crate::domain::types::{ExamId, RoomId};
use crate::engine::{AllocationEngine, DutyEngine};
use crate::perf::PerfGuard;
use crate::repository::{
    AllocationRepository, DutyAssignmentRepository, RoomRepository, RunLogRepository,
};

/// 运行日志单次查询上限
pub const MAX_RUN_LOG_LIMIT: usize = 500;

// ==========================================
// SeatingApi - 座位分配 API
// ==========================================

/// 座位分配API
///
/// 职责：
/// 1. 触发座位分配、监考排班（规划 + 提交）
/// 2. 学生座位查询、考场座位图
/// 3. 监考安排查询、考场占用统计、运行日志
pub struct SeatingApi {
    allocation_engine: Arc<AllocationEngine<ConfigManager>>,
    duty_engine: Arc<DutyEngine<ConfigManager>>,
    room_repo: Arc<RoomRepository>,
    allocation_repo: Arc<AllocationRepository>,
    duty_repo: Arc<DutyAssignmentRepository>,
    run_log_repo: Arc<RunLogRepository>,
    config_manager: Arc<ConfigManager>,
}

impl SeatingApi {
    /// 创建新的SeatingApi实例
    pub fn new(
        allocation_engine: Arc<AllocationEngine<ConfigManager>>,
        duty_engine: Arc<DutyEngine<ConfigManager>>,
        room_repo: Arc<RoomRepository>,
        allocation_repo: Arc<AllocationRepository>,
        duty_repo: Arc<DutyAssignmentRepository>,
        run_log_repo: Arc<RunLogRepository>,
        config_manager: Arc<ConfigManager>,
    ) -> Self {
        Self {
            allocation_engine,
            duty_engine,
            room_repo,
            allocation_repo,
            duty_repo,
            run_log_repo,
            config_manager,
        }
    }

    // ==========================================
    // 写操作
    // ==========================================

    /// 为一对同场考试分配座位
    ///
    /// # 返回
    /// - Ok(AllocationOutcome): 座位不足时 unseated 非空，仍为 Ok
    /// - Err(ApiError::InvalidInput): 考试ID非正或相同
    pub async fn allocate(&self, exam_a: ExamId, exam_b: ExamId) -> ApiResult<AllocationOutcome> {
        Ok(self
            .allocation_engine
            .plan_and_commit_allocation(exam_a, exam_b)
            .await?)
    }

    /// 为指定日期排监考
    pub async fn assign_duty(&self, date: NaiveDate) -> ApiResult<DutyOutcome> {
        Ok(self.duty_engine.plan_and_commit_duty(date).await?)
    }

    // ==========================================
    // 只读查询
    // ==========================================

    /// 按学号查询座位
    ///
    /// # 返回
    /// - Ok(None): 该学生尚未分配座位
    /// - Err(ApiError::InvalidInput): 学号为空
    #[instrument(skip(self))]
    pub fn find_student_seat(&self, usn: &str) -> ApiResult<Option<StudentSeat>> {
        let _perf = PerfGuard::new("api.find_student_seat");
        let usn = usn.trim();
        if usn.is_empty() {
            return Err(ApiError::InvalidInput("学号不能为空".to_string()));
        }
        Ok(self.allocation_repo.find_by_student(usn)?)
    }

    /// 考场座位图
    pub fn room_seat_map(&self, room_id: RoomId) -> ApiResult<RoomSeatMap> {
        let _perf = PerfGuard::new("api.room_seat_map");
        let room = self
            .room_repo
            .find_by_id(room_id)?
            .ok_or_else(|| ApiError::NotFound(format!("考场(id={})不存在", room_id)))?;

        let mut seats = self.allocation_repo.list_by_room(room_id)?;
        seats.sort_by_key(|a| (a.column, a.row, a.seat_position));

        Ok(RoomSeatMap { room, seats })
    }

    /// 指定日期的监考安排（按 room_id 升序）
    pub fn list_duty_assignments(&self, date: NaiveDate) -> ApiResult<Vec<DutyRosterEntry>> {
        let _perf = PerfGuard::new("api.list_duty_assignments");
        Ok(self.duty_repo.list_by_date(date)?)
    }

    /// 考场占用统计（按 room_id 升序）
    ///
    /// `report.include_empty_rooms=false` 时省略无人入座的考场。
    pub async fn room_occupancy_report(&self) -> ApiResult<Vec<RoomOccupancy>> {
        let include_empty = self
            .config_manager
            .get_report_include_empty_rooms()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        let rooms = self.room_repo.list_all()?;
        let counts = self.allocation_repo.count_by_room()?;

        let report = rooms
            .iter()
            .map(|room| {
                let seated = counts.get(&room.room_id).copied().unwrap_or(0);
                RoomOccupancy::new(room, seated)
            })
            .filter(|occupancy| include_empty || occupancy.seated > 0)
            .collect();

        Ok(report)
    }

    /// 最近的运行日志（新→旧）
    pub fn list_recent_runs(&self, limit: usize) -> ApiResult<Vec<RunLog>> {
        if limit == 0 || limit > MAX_RUN_LOG_LIMIT {
            return Err(ApiError::InvalidInput(format!(
                "limit 必须在 1..={} 之间: {}",
                MAX_RUN_LOG_LIMIT, limit
            )));
        }
        Ok(self.run_log_repo.list_recent(limit)?)
    }
}
