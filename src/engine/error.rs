// ==========================================
// 考场座位分配系统 - 引擎层错误类型
// ==========================================
// 座位不足/教师不足不是错误，以结果数据返回
// ==========================================

use crate::domain::types::RoomId;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 输入错误：在任何计算之前拒绝
    #[error("无效的考试对: {0}")]
    InvalidExamPair(String),

    #[error("考场几何无效: room_id={room_id}, {reason}")]
    InvalidRoomGeometry { room_id: RoomId, reason: String },

    /// 工作单元未能提交，已整体回滚
    #[error("提交失败（已回滚）: {0}")]
    CommitFailed(#[source] RepositoryError),

    /// 读取阶段的存储错误
    #[error(transparent)]
    Storage(#[from] RepositoryError),

    #[error("配置读取失败: {0}")]
    Config(String),

    /// 阻塞存储任务未能完成（panic 或运行时关闭）
    #[error("存储任务中断: {0}")]
    TaskAborted(String),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
