// ==========================================
// 考场座位分配系统 - 监考排班引擎（规划 + 提交）
// ==========================================
// 流程:
// 1) 读取考场目录与教师列表
// 2) 洗牌配对（随机源可注入 / 可由配置固定种子）
// 3) 单一工作单元内：删除当日旧安排 → 写入新安排 → 追加运行日志
// ==========================================

use crate::config::EngineConfigReader;
use crate::domain::duty::DutyOutcome;
use crate::domain::run_log::RunLog;
use crate::domain::types::{RoomId, RunKind};
use crate::engine::blocking::run_blocking;
use crate::engine::duty_planner::DutyPlanner;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::run_lock::RunLockRegistry;
use crate::repository::store::{AllocationStore, UnitOfWork};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde_json::json;
use std::sync::{Arc, Mutex};
use tracing::{info, instrument, warn};

/// 可注入的随机源
pub type DutyRng = Box<dyn RngCore + Send>;

// ==========================================
// DutyEngine
// ==========================================
pub struct DutyEngine<C>
where
    C: EngineConfigReader,
{
    store: Arc<dyn AllocationStore>,
    config: Arc<C>,
    planner: DutyPlanner,
    locks: Arc<RunLockRegistry>,
    rng: Mutex<DutyRng>,
}

impl<C> DutyEngine<C>
where
    C: EngineConfigReader,
{
    /// 创建引擎（随机源取自操作系统熵）
    pub fn new(
        store: Arc<dyn AllocationStore>,
        config: Arc<C>,
        locks: Arc<RunLockRegistry>,
    ) -> Self {
        Self::with_rng(store, config, locks, Box::new(StdRng::from_os_rng()))
    }

    /// 创建引擎并注入随机源
    pub fn with_rng(
        store: Arc<dyn AllocationStore>,
        config: Arc<C>,
        locks: Arc<RunLockRegistry>,
        rng: DutyRng,
    ) -> Self {
        Self {
            store,
            config,
            planner: DutyPlanner::new(),
            locks,
            rng: Mutex::new(rng),
        }
    }

    /// 规划并提交监考排班
    ///
    /// 相同输入的多次运行结果预期不同（随机排班）；
    /// 配置了 `duty.shuffle_seed` 时结果固定。
    ///
    /// # 返回
    /// - Ok(DutyOutcome): 已排 + 未排考场 + 未排教师
    /// - Err(EngineError::CommitFailed): 提交失败，已回滚
    #[instrument(skip(self), fields(date = %date))]
    pub async fn plan_and_commit_duty(&self, date: NaiveDate) -> EngineResult<DutyOutcome> {
        let lock_key = format!("duty:{}", date.format("%Y-%m-%d"));
        let _guard = self.locks.acquire(&lock_key).await;

        let seed = self
            .config
            .get_duty_shuffle_seed()
            .await
            .map_err(|e| EngineError::Config(e.to_string()))?;

        let store = Arc::clone(&self.store);
        let (rooms, staff) = run_blocking("duty.read", move || {
            let rooms: Vec<RoomId> = store
                .list_rooms()?
                .into_iter()
                .map(|room| room.room_id)
                .collect();
            Ok((rooms, store.list_staff()?))
        })
        .await?;

        info!(rooms = rooms.len(), staff = staff.len(), seeded = seed.is_some(), "开始监考排班");

        let outcome = match seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed);
                self.planner.plan(&rooms, &staff, date, &mut rng)
            }
            None => {
                let mut rng = self
                    .rng
                    .lock()
                    .map_err(|e| EngineError::Config(format!("随机源锁获取失败: {}", e)))?;
                self.planner.plan(&rooms, &staff, date, &mut **rng)
            }
        };

        let shortfall = outcome.unassigned_rooms.len() + outcome.unassigned_staff.len();
        let run_log = RunLog::new(
            RunKind::DutyAssignment,
            lock_key.clone(),
            outcome.assigned.len() as u32,
            shortfall as u32,
            if shortfall == 0 {
                None
            } else {
                Some(json!({
                    "unassigned_rooms": outcome.unassigned_rooms,
                    "unassigned_staff": outcome.unassigned_staff,
                }))
            },
        );

        let store = Arc::clone(&self.store);
        let (outcome, run_log) = run_blocking("duty.commit", move || {
            store
                .run_in_transaction(&mut |uow: &mut dyn UnitOfWork| {
                    uow.clear_duty_assignments(date)?;
                    uow.insert_duty_assignments(&outcome.assigned)?;
                    uow.append_run_log(&run_log)?;
                    Ok(())
                })
                .map_err(EngineError::CommitFailed)?;
            Ok((outcome, run_log))
        })
        .await?;

        if !outcome.unassigned_rooms.is_empty() {
            warn!(
                unassigned_rooms = ?outcome.unassigned_rooms,
                "监考教师不足，部分考场无人监考"
            );
        }
        info!(
            assigned = outcome.assigned.len(),
            unassigned_rooms = outcome.unassigned_rooms.len(),
            unassigned_staff = outcome.unassigned_staff.len(),
            run_id = %run_log.run_id,
            "监考排班已提交"
        );

        Ok(outcome)
    }
}
