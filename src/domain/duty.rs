// ==========================================
// 考场座位分配系统 - 监考排班领域模型
// ==========================================

use crate::domain::types::{RoomId, StaffId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// DutyAssignment - 监考安排
// ==========================================
// 红线: 同一次运行内，考场与教师各自至多出现一次
// 生命周期: 每次排班整体替换当日记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyAssignment {
    pub staff_id: StaffId,
    pub room_id: RoomId,
    pub date: NaiveDate,
}

// ==========================================
// DutyOutcome - 排班结果
// ==========================================
// 教师与考场数量不一致时，多出的一方列入未分配，不丢弃
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyOutcome {
    pub date: NaiveDate,
    pub assigned: Vec<DutyAssignment>,
    pub unassigned_rooms: Vec<RoomId>,
    pub unassigned_staff: Vec<StaffId>,
}

/// 监考安排查询结果（附教师姓名与考场编号）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyRosterEntry {
    pub staff_id: StaffId,
    pub staff_name: Option<String>,
    pub room_id: RoomId,
    pub room_number: String,
    pub date: NaiveDate,
}
