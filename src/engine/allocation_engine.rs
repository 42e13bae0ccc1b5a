// ==========================================
// 考场座位分配系统 - 座位分配引擎（规划 + 提交）
// ==========================================
// 流程:
// 1) 校验考试对（输入错误在任何计算之前拒绝）
// 2) 读取考场目录与两份名册
// 3) 校验考场几何
// 4) 规划（纯计算）
// 5) 单一工作单元内：删除两门考试旧座位 → 写入新座位 → 追加运行日志
// 红线: 提交失败必须整体回滚，旧座位保持不变
// ==========================================

use crate::config::EngineConfigReader;
use crate::domain::allocation::AllocationOutcome;
use crate::domain::room::Room;
use crate::domain::roster::ExamPair;
use crate::domain::run_log::RunLog;
use crate::domain::types::{ExamId, RunKind};
use crate::engine::allocation_planner::AllocationPlanner;
use crate::engine::blocking::run_blocking;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::run_lock::RunLockRegistry;
use crate::repository::store::{AllocationStore, UnitOfWork};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument, warn};

// ==========================================
// AllocationEngine
// ==========================================
pub struct AllocationEngine<C>
where
    C: EngineConfigReader,
{
    store: Arc<dyn AllocationStore>,
    config: Arc<C>,
    planner: AllocationPlanner,
    locks: Arc<RunLockRegistry>,
}

impl<C> AllocationEngine<C>
where
    C: EngineConfigReader,
{
    /// 创建引擎
    ///
    /// # 参数
    /// - store: 持久化服务
    /// - config: 配置读取器
    /// - locks: 运行互斥令牌（与其他引擎实例共享时，同键运行串行）
    pub fn new(
        store: Arc<dyn AllocationStore>,
        config: Arc<C>,
        locks: Arc<RunLockRegistry>,
    ) -> Self {
        Self {
            store,
            config,
            planner: AllocationPlanner::default(),
            locks,
        }
    }

    /// 规划并提交座位分配
    ///
    /// # 返回
    /// - Ok(AllocationOutcome): 入座 + 未入座（座位不足不是错误）
    /// - Err(EngineError::InvalidExamPair): 考试ID非正或相同
    /// - Err(EngineError::CommitFailed): 提交失败，已回滚
    #[instrument(skip(self))]
    pub async fn plan_and_commit_allocation(
        &self,
        exam_a: ExamId,
        exam_b: ExamId,
    ) -> EngineResult<AllocationOutcome> {
        let exams = ExamPair::new(exam_a, exam_b).map_err(EngineError::InvalidExamPair)?;

        let _guard = self.locks.acquire(&exams.lock_key()).await;

        let skip_invalid_rooms = self
            .config
            .get_skip_invalid_rooms()
            .await
            .map_err(|e| EngineError::Config(e.to_string()))?;

        let store = Arc::clone(&self.store);
        let (rooms, roster_a, roster_b) = run_blocking("allocation.read", move || {
            Ok((
                store.list_rooms()?,
                store.list_roster_ascending(exams.exam_a())?,
                store.list_roster_ascending(exams.exam_b())?,
            ))
        })
        .await?;
        let rooms = self.usable_rooms(rooms, skip_invalid_rooms)?;

        info!(
            exam_a,
            exam_b,
            rooms = rooms.len(),
            roster_a = roster_a.len(),
            roster_b = roster_b.len(),
            "开始座位分配"
        );

        let outcome = self.planner.plan(&exams, &roster_a, &roster_b, &rooms);

        let run_log = RunLog::new(
            RunKind::SeatAllocation,
            exams.lock_key(),
            outcome.seated.len() as u32,
            outcome.unseated.len() as u32,
            if outcome.unseated.is_empty() {
                None
            } else {
                Some(json!({ "unseated": outcome.unseated }))
            },
        );

        let store = Arc::clone(&self.store);
        let (outcome, run_log) = run_blocking("allocation.commit", move || {
            store
                .run_in_transaction(&mut |uow: &mut dyn UnitOfWork| {
                    let cleared = uow.clear_assignments(exams.exam_a(), exams.exam_b())?;
                    let inserted = uow.insert_assignments(&outcome.seated)?;
                    uow.append_run_log(&run_log)?;
                    tracing::debug!(cleared, inserted, "座位分配写入完成");
                    Ok(())
                })
                .map_err(EngineError::CommitFailed)?;
            Ok((outcome, run_log))
        })
        .await?;

        if !outcome.unseated.is_empty() {
            warn!(
                exam_a,
                exam_b,
                unseated = outcome.unseated.len(),
                "座位不足，部分学生未入座"
            );
        }
        info!(
            exam_a,
            exam_b,
            seated = outcome.seated.len(),
            unseated = outcome.unseated.len(),
            run_id = %run_log.run_id,
            "座位分配已提交"
        );

        Ok(outcome)
    }

    /// 过滤几何无效的考场
    fn usable_rooms(&self, rooms: Vec<Room>, skip_invalid: bool) -> EngineResult<Vec<Room>> {
        let mut usable = Vec::with_capacity(rooms.len());
        for room in rooms {
            match room.validate_geometry() {
                Ok(()) => usable.push(room),
                Err(reason) if skip_invalid => {
                    warn!(room_id = room.room_id, reason = %reason, "跳过几何无效的考场");
                }
                Err(reason) => {
                    return Err(EngineError::InvalidRoomGeometry {
                        room_id: room.room_id,
                        reason,
                    });
                }
            }
        }
        Ok(usable)
    }
}
