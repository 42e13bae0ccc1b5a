// ==========================================
// 考场座位分配系统 - 阻塞存储调用
// ==========================================
// rusqlite 调用是同步的，放到 tokio 阻塞线程池执行，
// 避免占住异步工作线程
// ==========================================

use crate::engine::error::{EngineError, EngineResult};

/// 在阻塞线程池上执行存储操作（沿用调用方的 tracing span）
pub async fn run_blocking<T, F>(op: &'static str, work: F) -> EngineResult<T>
where
    F: FnOnce() -> EngineResult<T> + Send + 'static,
    T: Send + 'static,
{
    let span = tracing::Span::current();
    tokio::task::spawn_blocking(move || span.in_scope(work))
        .await
        .map_err(|e| {
            tracing::error!(op, error = %e, "阻塞存储任务中断");
            EngineError::TaskAborted(format!("{}: {}", op, e))
        })?
}
