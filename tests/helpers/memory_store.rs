// ==========================================
// 内存版 AllocationStore - 用于引擎测试
// ==========================================
// 工作单元在数据副本上执行，闭包成功才替换，失败则丢弃
// 支持在指定写操作处注入失败
// ==========================================
#![allow(dead_code)]

use chrono::NaiveDate;
use exam_seating::domain::{
    Assignment, DutyAssignment, ExamId, ExamRosterEntry, Room, RunLog, StaffId,
};
use exam_seating::repository::{
    AllocationStore, RepositoryError, RepositoryResult, TransactionWork, UnitOfWork,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// 注入失败的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePoint {
    None,
    InsertAssignments,
    InsertDuties,
    AppendRunLog,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryData {
    pub rooms: Vec<Room>,
    pub rosters: HashMap<ExamId, Vec<ExamRosterEntry>>,
    pub staff: Vec<StaffId>,
    pub assignments: Vec<Assignment>,
    pub duties: Vec<DutyAssignment>,
    pub run_logs: Vec<RunLog>,
}

pub struct MemoryStore {
    data: Mutex<MemoryData>,
    failure: Mutex<FailurePoint>,
    reads: AtomicUsize,
    commits: AtomicUsize,
}

impl MemoryStore {
    pub fn new(data: MemoryData) -> Self {
        Self {
            data: Mutex::new(data),
            failure: Mutex::new(FailurePoint::None),
            reads: AtomicUsize::new(0),
            commits: AtomicUsize::new(0),
        }
    }

    pub fn fail_at(&self, point: FailurePoint) {
        *self.failure.lock().unwrap() = point;
    }

    pub fn snapshot(&self) -> MemoryData {
        self.data.lock().unwrap().clone()
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn commit_count(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }
}

/// 构造学号升序名册
pub fn roster(exam_id: ExamId, prefix: &str, count: usize) -> Vec<ExamRosterEntry> {
    (1..=count)
        .map(|i| ExamRosterEntry::new(format!("{}{:03}", prefix, i), exam_id))
        .collect()
}

pub fn room(room_id: i64, columns: u32, rows_per_column: u32, seats_per_bench: u32) -> Room {
    Room {
        room_id,
        room_number: format!("R{}", room_id),
        columns,
        rows_per_column,
        seats_per_bench,
    }
}

impl AllocationStore for MemoryStore {
    fn list_rooms(&self) -> RepositoryResult<Vec<Room>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.data.lock().unwrap().rooms.clone())
    }

    fn list_roster_ascending(&self, exam_id: ExamId) -> RepositoryResult<Vec<ExamRosterEntry>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let mut entries = self
            .data
            .lock()
            .unwrap()
            .rosters
            .get(&exam_id)
            .cloned()
            .unwrap_or_default();
        entries.sort_by(|a, b| a.student_id.cmp(&b.student_id));
        Ok(entries)
    }

    fn list_staff(&self) -> RepositoryResult<Vec<StaffId>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.data.lock().unwrap().staff.clone())
    }

    fn run_in_transaction(&self, work: &mut TransactionWork<'_>) -> RepositoryResult<()> {
        let failure = *self.failure.lock().unwrap();
        let mut data = self.data.lock().unwrap();
        let mut staged = data.clone();

        work(&mut StagedWork {
            data: &mut staged,
            failure,
        })?;

        *data = staged;
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct StagedWork<'a> {
    data: &'a mut MemoryData,
    failure: FailurePoint,
}

impl StagedWork<'_> {
    fn injected(&self, point: FailurePoint) -> RepositoryResult<()> {
        if self.failure == point {
            return Err(RepositoryError::DatabaseTransactionError(format!(
                "injected failure at {:?}",
                point
            )));
        }
        Ok(())
    }
}

impl UnitOfWork for StagedWork<'_> {
    fn clear_assignments(&mut self, exam_a: ExamId, exam_b: ExamId) -> RepositoryResult<usize> {
        let before = self.data.assignments.len();
        self.data
            .assignments
            .retain(|a| a.exam_id != exam_a && a.exam_id != exam_b);
        Ok(before - self.data.assignments.len())
    }

    fn insert_assignments(&mut self, assignments: &[Assignment]) -> RepositoryResult<usize> {
        self.injected(FailurePoint::InsertAssignments)?;

        let mut seats: HashSet<_> = self
            .data
            .assignments
            .iter()
            .map(|a| (a.exam_id, a.coordinate()))
            .collect();
        let mut students: HashSet<_> = self
            .data
            .assignments
            .iter()
            .map(|a| (a.exam_id, a.student_id.clone()))
            .collect();

        for a in assignments {
            if !seats.insert((a.exam_id, a.coordinate()))
                || !students.insert((a.exam_id, a.student_id.clone()))
            {
                return Err(RepositoryError::UniqueConstraintViolation(format!(
                    "{} @ {:?}",
                    a.student_id,
                    a.coordinate()
                )));
            }
            self.data.assignments.push(a.clone());
        }
        Ok(assignments.len())
    }

    fn clear_duty_assignments(&mut self, date: NaiveDate) -> RepositoryResult<usize> {
        let before = self.data.duties.len();
        self.data.duties.retain(|d| d.date != date);
        Ok(before - self.data.duties.len())
    }

    fn insert_duty_assignments(&mut self, duties: &[DutyAssignment]) -> RepositoryResult<usize> {
        self.injected(FailurePoint::InsertDuties)?;
        self.data.duties.extend_from_slice(duties);
        Ok(duties.len())
    }

    fn append_run_log(&mut self, entry: &RunLog) -> RepositoryResult<()> {
        self.injected(FailurePoint::AppendRunLog)?;
        self.data.run_logs.push(entry.clone());
        Ok(())
    }
}
