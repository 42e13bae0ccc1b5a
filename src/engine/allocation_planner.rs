// ==========================================
// 考场座位分配系统 - 座位分配规划器
// ==========================================
// 职责: 将两份有序名册绑定到全部考场的有序座位序列
// 输入: 名册 A/B (学号升序) + 考场目录 (目录顺序)
// 输出: 入座列表 + 未入座列表（不可静默丢弃）
// 红线: 纯计算，无随机、无 I/O；相同输入必得相同输出
// ==========================================

use crate::domain::allocation::{AllocationOutcome, Assignment, UnseatedStudent};
use crate::domain::room::Room;
use crate::domain::roster::{ExamPair, ExamRosterEntry};
use crate::domain::types::{ExamId, StudentId, UnseatedReason};
use crate::engine::seat_layout::SeatLayoutGenerator;
use std::collections::HashSet;
use tracing::{debug, instrument};

// ==========================================
// AllocationPlanner - 座位分配规划器
// ==========================================
pub struct AllocationPlanner {
    layout: SeatLayoutGenerator,
}

impl AllocationPlanner {
    pub fn new(layout: SeatLayoutGenerator) -> Self {
        Self { layout }
    }

    /// 规划座位分配
    ///
    /// 规则：
    /// 1) 按目录顺序遍历考场，逐场生成 A/B 两条座位序列
    /// 2) 名册 A 消耗 A 序列、名册 B 消耗 B 序列，两个游标独立且跨考场延续
    /// 3) 两份名册都耗尽或座位耗尽即停止
    /// 4) 同一学号只入座一次：A 先于 B、靠前先于靠后，之后的重复记录列为未入座
    ///
    /// # 参数
    /// - `exams`: 考试对
    /// - `roster_a` / `roster_b`: 学号升序名册
    /// - `rooms`: 已校验几何的考场（目录顺序）
    ///
    /// # 返回
    /// 入座 + 未入座，满足 seated + unseated == |A| + |B|
    #[instrument(skip(self, roster_a, roster_b, rooms), fields(
        exam_a = exams.exam_a(),
        exam_b = exams.exam_b(),
        roster_a = roster_a.len(),
        roster_b = roster_b.len(),
        rooms = rooms.len()
    ))]
    pub fn plan(
        &self,
        exams: &ExamPair,
        roster_a: &[ExamRosterEntry],
        roster_b: &[ExamRosterEntry],
        rooms: &[Room],
    ) -> AllocationOutcome {
        let mut unseated = Vec::new();

        // 1. 去重：游标只在本次调用内存在
        let mut seen: HashSet<&str> = HashSet::new();
        let queue_a = Self::dedupe(roster_a, exams.exam_a(), &mut seen, &mut unseated);
        let queue_b = Self::dedupe(roster_b, exams.exam_b(), &mut seen, &mut unseated);

        // 2. 逐场填充
        let mut seated = Vec::with_capacity(queue_a.len() + queue_b.len());
        let mut cursor_a = 0usize;
        let mut cursor_b = 0usize;

        for room in rooms {
            if cursor_a >= queue_a.len() && cursor_b >= queue_b.len() {
                break;
            }

            let slots = self.layout.generate(room, exams);
            let before_a = cursor_a;
            let before_b = cursor_b;

            for slot in &slots.exam_a_slots {
                let Some(student_id) = queue_a.get(cursor_a) else {
                    break;
                };
                seated.push(Assignment::bind((*student_id).clone(), slot));
                cursor_a += 1;
            }

            for slot in &slots.exam_b_slots {
                let Some(student_id) = queue_b.get(cursor_b) else {
                    break;
                };
                seated.push(Assignment::bind((*student_id).clone(), slot));
                cursor_b += 1;
            }

            debug!(
                room_id = room.room_id,
                room_number = %room.room_number,
                seated_a = cursor_a - before_a,
                seated_b = cursor_b - before_b,
                "考场填充完成"
            );
        }

        // 3. 剩余名册尾部列为未入座
        Self::push_tail(&queue_a[cursor_a..], exams.exam_a(), &mut unseated);
        Self::push_tail(&queue_b[cursor_b..], exams.exam_b(), &mut unseated);

        AllocationOutcome { seated, unseated }
    }

    fn dedupe<'r>(
        roster: &'r [ExamRosterEntry],
        exam_id: ExamId,
        seen: &mut HashSet<&'r str>,
        unseated: &mut Vec<UnseatedStudent>,
    ) -> Vec<&'r StudentId> {
        let mut queue = Vec::with_capacity(roster.len());
        for entry in roster {
            if seen.insert(entry.student_id.as_str()) {
                queue.push(&entry.student_id);
            } else {
                unseated.push(UnseatedStudent {
                    student_id: entry.student_id.clone(),
                    exam_id,
                    reason: UnseatedReason::DuplicateRegistration,
                });
            }
        }
        queue
    }

    fn push_tail(tail: &[&StudentId], exam_id: ExamId, unseated: &mut Vec<UnseatedStudent>) {
        unseated.extend(tail.iter().map(|student_id| UnseatedStudent {
            student_id: (*student_id).clone(),
            exam_id,
            reason: UnseatedReason::CapacityExhausted,
        }));
    }
}

impl Default for AllocationPlanner {
    fn default() -> Self {
        Self::new(SeatLayoutGenerator::new())
    }
}
