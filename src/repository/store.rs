// ==========================================
// 考场座位分配系统 - 持久化接口
// ==========================================
// 职责: 定义引擎所依赖的窄接口，屏蔽存储细节
// 红线: 引擎只经由此接口访问存储，不拼 SQL
// ==========================================

use crate::domain::{
    Assignment, DutyAssignment, ExamId, ExamRosterEntry, Room, RunLog, StaffId,
};
use crate::repository::error::RepositoryResult;
use chrono::NaiveDate;

// ==========================================
// UnitOfWork - 事务内写操作
// ==========================================

/// 一个原子工作单元内可执行的写操作
///
/// 只能在 [`AllocationStore::run_in_transaction`] 的闭包中拿到。
pub trait UnitOfWork {
    /// 删除两门考试的全部座位分配
    fn clear_assignments(&mut self, exam_a: ExamId, exam_b: ExamId) -> RepositoryResult<usize>;

    /// 批量写入座位分配
    fn insert_assignments(&mut self, assignments: &[Assignment]) -> RepositoryResult<usize>;

    /// 删除指定日期的全部监考安排
    fn clear_duty_assignments(&mut self, date: NaiveDate) -> RepositoryResult<usize>;

    /// 批量写入监考安排
    fn insert_duty_assignments(&mut self, duties: &[DutyAssignment]) -> RepositoryResult<usize>;

    /// 追加运行日志
    fn append_run_log(&mut self, entry: &RunLog) -> RepositoryResult<()>;
}

/// 事务闭包类型
pub type TransactionWork<'w> = dyn FnMut(&mut dyn UnitOfWork) -> RepositoryResult<()> + 'w;

// ==========================================
// AllocationStore - 引擎持久化接口
// ==========================================

/// 分配引擎的持久化服务
///
/// # 约定
/// - `list_rooms`: 考场目录顺序（room_id 升序）
/// - `list_roster_ascending`: 学号升序
/// - `list_staff`: staff_id 升序
/// - `run_in_transaction`: 闭包返回 Ok 则提交，返回 Err 或提交失败则整体回滚
pub trait AllocationStore: Send + Sync {
    fn list_rooms(&self) -> RepositoryResult<Vec<Room>>;

    fn list_roster_ascending(&self, exam_id: ExamId) -> RepositoryResult<Vec<ExamRosterEntry>>;

    fn list_staff(&self) -> RepositoryResult<Vec<StaffId>>;

    fn run_in_transaction(&self, work: &mut TransactionWork<'_>) -> RepositoryResult<()>;
}
