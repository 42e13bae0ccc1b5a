// ==========================================
// 考场座位分配系统 - 座位分配领域模型
// ==========================================

use crate::domain::room::Room;
use crate::domain::types::{ExamId, RoomId, StudentId, UnseatedReason};
use serde::{Deserialize, Serialize};

// ==========================================
// SeatSlot - 座位槽
// ==========================================
// 每次分配现场生成，不单独落库
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatSlot {
    pub room_id: RoomId,
    pub column: u32,        // 列号 (1 起)
    pub row: u32,           // 行号 (1 起)
    pub seat_position: u32, // 凳内座位 (1..=seats_per_bench)
    pub exam_id: ExamId,    // 预分配的考试
}

impl SeatSlot {
    /// 物理座位坐标 (room, column, row, position)
    pub fn coordinate(&self) -> (RoomId, u32, u32, u32) {
        (self.room_id, self.column, self.row, self.seat_position)
    }
}

// ==========================================
// Assignment - 座位分配记录
// ==========================================
// 红线: 同一次运行内，一个座位最多一条，一个学号最多一条
// 生命周期: 批量创建，下一次同考试对运行时批量作废，不原地修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub student_id: StudentId,
    pub exam_id: ExamId,
    pub room_id: RoomId,
    pub column: u32,
    pub row: u32,
    pub seat_position: u32,
}

impl Assignment {
    /// 将学生绑定到座位槽
    pub fn bind(student_id: StudentId, slot: &SeatSlot) -> Self {
        Self {
            student_id,
            exam_id: slot.exam_id,
            room_id: slot.room_id,
            column: slot.column,
            row: slot.row,
            seat_position: slot.seat_position,
        }
    }

    /// 物理座位坐标
    pub fn coordinate(&self) -> (RoomId, u32, u32, u32) {
        (self.room_id, self.column, self.row, self.seat_position)
    }
}

/// 未入座学生
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnseatedStudent {
    pub student_id: StudentId,
    pub exam_id: ExamId,
    pub reason: UnseatedReason,
}

// ==========================================
// AllocationOutcome - 分配结果
// ==========================================
// 座位不足不是错误，以未入座列表的形式返回
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationOutcome {
    pub seated: Vec<Assignment>,
    pub unseated: Vec<UnseatedStudent>,
}

impl AllocationOutcome {
    pub fn is_complete(&self) -> bool {
        self.unseated.is_empty()
    }
}

// ==========================================
// 查询侧视图
// ==========================================

/// 学生座位查询结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentSeat {
    pub student_id: StudentId,
    pub student_name: Option<String>,
    pub exam_id: ExamId,
    pub subject_code: Option<String>,
    pub room_id: RoomId,
    pub room_number: String,
    pub column: u32,
    pub row: u32,
    pub seat_position: u32,
}

/// 座位图中的一个已占座位（附学生姓名与科目代码）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSeat {
    pub student_id: StudentId,
    pub student_name: Option<String>,
    pub exam_id: ExamId,
    pub subject_code: Option<String>,
    pub column: u32,
    pub row: u32,
    pub seat_position: u32,
}

/// 单个考场的座位图
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSeatMap {
    pub room: Room,
    pub seats: Vec<RoomSeat>, // 按 (column, row, seat_position) 排序
}

/// 考场占用统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomOccupancy {
    pub room_id: RoomId,
    pub room_number: String,
    pub capacity: u64,
    pub seated: u32,
    pub utilization: f64, // seated / capacity，容量为 0 时为 0.0
}

impl RoomOccupancy {
    pub fn new(room: &Room, seated: u32) -> Self {
        let capacity = room.capacity();
        let utilization = if capacity == 0 {
            0.0
        } else {
            seated as f64 / capacity as f64
        };
        Self {
            room_id: room.room_id,
            room_number: room.room_number.clone(),
            capacity,
            seated,
            utilization,
        }
    }
}
