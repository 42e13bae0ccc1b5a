// ==========================================
// 考场座位分配系统 - 运行日志领域模型
// ==========================================
// 用途: 审计追踪，记录每次已提交的分配/排班
// ==========================================

use crate::domain::types::RunKind;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ==========================================
// RunLog - 运行日志
// ==========================================
// 红线: 与被记录的提交处于同一事务
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunLog {
    pub run_id: String,                // 运行ID (UUID v4)
    pub run_kind: RunKind,             // 运行类型
    pub scope_key: String,             // 作用域 (考试对或日期)
    pub created_at: NaiveDateTime,     // 提交时间 (UTC)
    pub placed_count: u32,             // 入座人数 / 已排考场数
    pub shortfall_count: u32,          // 未入座人数 / 未排考场+教师数
    pub payload_json: Option<JsonValue>, // 缺口明细
}

impl RunLog {
    /// 创建新的运行日志（生成 run_id 与时间戳）
    pub fn new(
        run_kind: RunKind,
        scope_key: String,
        placed_count: u32,
        shortfall_count: u32,
        payload_json: Option<JsonValue>,
    ) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            run_kind,
            scope_key,
            created_at: chrono::Utc::now().naive_utc(),
            placed_count,
            shortfall_count,
            payload_json,
        }
    }
}
