// ==========================================
// 考场座位分配系统 - 报名名册领域模型
// ==========================================

use crate::domain::types::{ExamId, StudentId};
use serde::{Deserialize, Serialize};

// ==========================================
// ExamRosterEntry - 报名记录
// ==========================================
// 红线: 引擎按学号升序读取，顺序决定座位
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamRosterEntry {
    pub student_id: StudentId, // 学号 (USN)
    pub exam_id: ExamId,       // 考试ID
}

impl ExamRosterEntry {
    pub fn new(student_id: impl Into<StudentId>, exam_id: ExamId) -> Self {
        Self {
            student_id: student_id.into(),
            exam_id,
        }
    }
}

// ==========================================
// ExamPair - 同场两门考试
// ==========================================
/// 已校验的考试对：两个ID均为正且互不相同
///
/// 只能通过 [`ExamPair::new`] 构造，分配流水线只接受该类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExamPair {
    exam_a: ExamId,
    exam_b: ExamId,
}

impl ExamPair {
    /// 构造考试对
    ///
    /// # 返回
    /// - Ok(ExamPair): 合法
    /// - Err(String): 非正或相等
    pub fn new(exam_a: ExamId, exam_b: ExamId) -> Result<Self, String> {
        if exam_a <= 0 || exam_b <= 0 {
            return Err(format!(
                "考试ID必须为正: exam_a={}, exam_b={}",
                exam_a, exam_b
            ));
        }
        if exam_a == exam_b {
            return Err(format!("两门考试ID不能相同: {}", exam_a));
        }
        Ok(Self { exam_a, exam_b })
    }

    pub fn exam_a(&self) -> ExamId {
        self.exam_a
    }

    pub fn exam_b(&self) -> ExamId {
        self.exam_b
    }

    /// 与顺序无关的互斥键，(1,2) 与 (2,1) 相同
    pub fn lock_key(&self) -> String {
        let (lo, hi) = if self.exam_a < self.exam_b {
            (self.exam_a, self.exam_b)
        } else {
            (self.exam_b, self.exam_a)
        };
        format!("alloc:{}-{}", lo, hi)
    }
}
