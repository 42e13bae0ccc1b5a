// ==========================================
// 考场座位分配系统 - 运行互斥令牌
// ==========================================
// 职责: 同一考试对 / 同一日期的“规划+提交”串行执行
// 说明: 不同键互不阻塞；跨进程的串行由 BEGIN IMMEDIATE 保证
// ==========================================

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// 持有期间，同键的其他运行等待
pub type RunLockGuard = OwnedMutexGuard<()>;

/// 按键分发互斥令牌
///
/// 表中只保留正在持有或等待的键：每次 acquire 前清掉只剩表自身引用的条目。
#[derive(Default)]
pub struct RunLockRegistry {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl RunLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取键对应的令牌（等待直到前一个持有者释放）
    pub async fn acquire(&self, key: &str) -> RunLockGuard {
        let lock = {
            // 只在取 Arc 时持有表锁；中毒时数据仍可用
            let mut table = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            // 引用计数为 1：无持有者、无等待者（克隆只在表锁内发生）
            table.retain(|_, lock| Arc::strong_count(lock) > 1);
            table
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// 当前登记的键数量（含尚未清理的空闲键）
    pub fn key_count(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
