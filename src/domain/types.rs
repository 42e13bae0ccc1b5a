// ==========================================
// 考场座位分配系统 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 考试ID (数据库 INTEGER 主键)
pub type ExamId = i64;

/// 考场ID
pub type RoomId = i64;

/// 监考教师ID
pub type StaffId = i64;

/// 学生学号 (USN)，升序即字节序
pub type StudentId = String;

// ==========================================
// 考试侧 (Exam Side)
// ==========================================
// 同场两门考试中的 A / B
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExamSide {
    A,
    B,
}

impl ExamSide {
    /// 另一侧
    pub fn opposite(self) -> Self {
        match self {
            ExamSide::A => ExamSide::B,
            ExamSide::B => ExamSide::A,
        }
    }
}

impl fmt::Display for ExamSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExamSide::A => write!(f, "A"),
            ExamSide::B => write!(f, "B"),
        }
    }
}

// ==========================================
// 未入座原因 (Unseated Reason)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnseatedReason {
    CapacityExhausted,     // 座位耗尽
    DuplicateRegistration, // 同一学号重复报名
}

impl fmt::Display for UnseatedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnseatedReason::CapacityExhausted => write!(f, "CAPACITY_EXHAUSTED"),
            UnseatedReason::DuplicateRegistration => write!(f, "DUPLICATE_REGISTRATION"),
        }
    }
}

// ==========================================
// 运行类型 (Run Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunKind {
    SeatAllocation, // 座位分配
    DutyAssignment, // 监考排班
}

impl RunKind {
    /// 从数据库字符串解析
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "SEAT_ALLOCATION" => Some(RunKind::SeatAllocation),
            "DUTY_ASSIGNMENT" => Some(RunKind::DutyAssignment),
            _ => None,
        }
    }
}

impl fmt::Display for RunKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunKind::SeatAllocation => write!(f, "SEAT_ALLOCATION"),
            RunKind::DutyAssignment => write!(f, "DUTY_ASSIGNMENT"),
        }
    }
}
