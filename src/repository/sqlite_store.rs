// ==========================================
// 考场座位分配系统 - SQLite 持久化实现
// ==========================================
// 职责: 以 SQLite 实现 AllocationStore
// 事务: BEGIN IMMEDIATE，提前获取写锁，两个写者无法交错执行删除/写入
// ==========================================

use crate::domain::{
    Assignment, DutyAssignment, ExamId, ExamRosterEntry, Room, RunLog, StaffId,
};
use crate::repository::allocation_repo::AllocationRepository;
use crate::repository::duty_repo::DutyAssignmentRepository;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::room_repo::RoomRepository;
use crate::repository::roster_repo::RosterRepository;
use crate::repository::run_log_repo::RunLogRepository;
use crate::repository::staff_repo::StaffRepository;
use crate::repository::store::{AllocationStore, TransactionWork, UnitOfWork};
use chrono::NaiveDate;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::sync::{Arc, Mutex};

// ==========================================
// SqliteUnitOfWork - 事务内写操作
// ==========================================
struct SqliteUnitOfWork<'a> {
    tx: &'a Transaction<'a>,
}

impl UnitOfWork for SqliteUnitOfWork<'_> {
    fn clear_assignments(&mut self, exam_a: ExamId, exam_b: ExamId) -> RepositoryResult<usize> {
        AllocationRepository::clear_for_exams(self.tx, exam_a, exam_b)
    }

    fn insert_assignments(&mut self, assignments: &[Assignment]) -> RepositoryResult<usize> {
        AllocationRepository::insert_batch(self.tx, assignments)
    }

    fn clear_duty_assignments(&mut self, date: NaiveDate) -> RepositoryResult<usize> {
        DutyAssignmentRepository::clear_for_date(self.tx, date)
    }

    fn insert_duty_assignments(&mut self, duties: &[DutyAssignment]) -> RepositoryResult<usize> {
        DutyAssignmentRepository::insert_batch(self.tx, duties)
    }

    fn append_run_log(&mut self, entry: &RunLog) -> RepositoryResult<()> {
        RunLogRepository::append(self.tx, entry)
    }
}

// ==========================================
// SqliteAllocationStore
// ==========================================

/// 基于共享 SQLite 连接的持久化服务
pub struct SqliteAllocationStore {
    conn: Arc<Mutex<Connection>>,
    room_repo: RoomRepository,
    roster_repo: RosterRepository,
    staff_repo: StaffRepository,
}

impl SqliteAllocationStore {
    /// 从已有连接创建
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            room_repo: RoomRepository::new(conn.clone()),
            roster_repo: RosterRepository::new(conn.clone()),
            staff_repo: StaffRepository::new(conn.clone()),
            conn,
        }
    }
}

impl AllocationStore for SqliteAllocationStore {
    fn list_rooms(&self) -> RepositoryResult<Vec<Room>> {
        self.room_repo.list_all()
    }

    fn list_roster_ascending(&self, exam_id: ExamId) -> RepositoryResult<Vec<ExamRosterEntry>> {
        self.roster_repo.list_ascending(exam_id)
    }

    fn list_staff(&self) -> RepositoryResult<Vec<StaffId>> {
        self.staff_repo.list_ids()
    }

    fn run_in_transaction(&self, work: &mut TransactionWork<'_>) -> RepositoryResult<()> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let result = {
            let mut uow = SqliteUnitOfWork { tx: &tx };
            work(&mut uow)
        };

        match result {
            Ok(()) => tx
                .commit()
                .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string())),
            Err(err) => {
                tracing::warn!(error = %err, "工作单元失败，事务回滚");
                if let Err(rollback_err) = tx.rollback() {
                    tracing::error!(error = %rollback_err, "事务回滚失败");
                }
                Err(err)
            }
        }
    }
}
