// ==========================================
// 考场座位分配系统 - 座位布局生成器
// ==========================================
// 红线: 同一长凳上相邻两个座位的考试必须不同（防作弊）
// ==========================================
// 规则:
// - 奇数列: 座位 {1,3}（两人凳为 {1}）归考试 A，其余归考试 B
// - 偶数列: 反之
// - 列优先填充: 同一 (列, 考试) 组内先按座位号，再按行 1..rows 纵向填充
// ==========================================

use crate::domain::allocation::SeatSlot;
use crate::domain::room::Room;
use crate::domain::roster::ExamPair;
use crate::domain::types::ExamSide;

/// 单个考场的两条座位序列（即填充顺序）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomSlotPlan {
    pub exam_a_slots: Vec<SeatSlot>,
    pub exam_b_slots: Vec<SeatSlot>,
}

// ==========================================
// SeatLayoutGenerator - 座位布局生成器
// ==========================================
pub struct SeatLayoutGenerator {
    // 无状态引擎
}

impl SeatLayoutGenerator {
    pub fn new() -> Self {
        Self {}
    }

    /// 判断某个座位属于哪一侧考试
    ///
    /// 奇数列的奇数座位属于 A；偶数列取反。
    pub fn side_of(column: u32, seat_position: u32) -> ExamSide {
        let odd_seat_side = if column % 2 == 1 {
            ExamSide::A
        } else {
            ExamSide::B
        };
        if seat_position % 2 == 1 {
            odd_seat_side
        } else {
            odd_seat_side.opposite()
        }
    }

    /// 生成考场的座位序列
    ///
    /// 调用方需保证几何已通过 [`Room::validate_geometry`]。
    pub fn generate(&self, room: &Room, exams: &ExamPair) -> RoomSlotPlan {
        let capacity = room.capacity() as usize;
        let mut plan = RoomSlotPlan {
            exam_a_slots: Vec::with_capacity(capacity / 2 + 1),
            exam_b_slots: Vec::with_capacity(capacity / 2 + 1),
        };

        for column in 1..=room.columns {
            for side in [ExamSide::A, ExamSide::B] {
                let (exam_id, target) = match side {
                    ExamSide::A => (exams.exam_a(), &mut plan.exam_a_slots),
                    ExamSide::B => (exams.exam_b(), &mut plan.exam_b_slots),
                };

                for seat_position in 1..=room.seats_per_bench {
                    if Self::side_of(column, seat_position) != side {
                        continue;
                    }
                    for row in 1..=room.rows_per_column {
                        target.push(SeatSlot {
                            room_id: room.room_id,
                            column,
                            row,
                            seat_position,
                            exam_id,
                        });
                    }
                }
            }
        }

        plan
    }
}

impl Default for SeatLayoutGenerator {
    fn default() -> Self {
        Self::new()
    }
}
