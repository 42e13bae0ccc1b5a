// ==========================================
// 考场座位分配系统 - 监考排班规划器
// ==========================================
// 职责: 教师随机排列后按位置与考场一一配对
// 说明: 有意为非确定性（与座位分配的确定性相对），
//       随机源由调用方注入，测试可用固定种子复现
// ==========================================

use crate::domain::duty::{DutyAssignment, DutyOutcome};
use crate::domain::types::{RoomId, StaffId};
use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::RngCore;
use tracing::instrument;

pub struct DutyPlanner {
    // 无状态引擎
}

impl DutyPlanner {
    pub fn new() -> Self {
        Self {}
    }

    /// 规划监考排班
    ///
    /// 规则：
    /// 1) 教师列表做无偏洗牌（Fisher–Yates），每种排列等概率
    /// 2) 考场按目录顺序与洗牌后的教师按位置配对，至 min(#考场, #教师) 为止
    /// 3) 多出的考场或教师列入未分配
    #[instrument(skip(self, rooms, staff, rng), fields(
        date = %date,
        rooms = rooms.len(),
        staff = staff.len()
    ))]
    pub fn plan<R: RngCore + ?Sized>(
        &self,
        rooms: &[RoomId],
        staff: &[StaffId],
        date: NaiveDate,
        rng: &mut R,
    ) -> DutyOutcome {
        let mut shuffled = staff.to_vec();
        shuffled.shuffle(rng);

        let matched = rooms.len().min(shuffled.len());
        let assigned = rooms
            .iter()
            .zip(shuffled.iter())
            .map(|(&room_id, &staff_id)| DutyAssignment {
                staff_id,
                room_id,
                date,
            })
            .collect();

        DutyOutcome {
            date,
            assigned,
            unassigned_rooms: rooms[matched..].to_vec(),
            unassigned_staff: shuffled[matched..].to_vec(),
        }
    }
}

impl Default for DutyPlanner {
    fn default() -> Self {
        Self::new()
    }
}
