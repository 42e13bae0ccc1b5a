// ==========================================
// 考场座位分配系统 - 考场领域模型
// ==========================================
// 考场为只读参考数据，由外部管理维护
// ==========================================

use crate::domain::types::RoomId;
use serde::{Deserialize, Serialize};

/// 每张长凳允许的座位数
pub const ALLOWED_SEATS_PER_BENCH: [u32; 2] = [2, 3];

/// 单个考场容量上限（座位数）；列数、每列凳数也不得超过此值
pub const MAX_ROOM_CAPACITY: u64 = 10_000;

// ==========================================
// Room - 考场
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub room_id: RoomId,          // 考场ID
    pub room_number: String,      // 考场编号 (展示用)
    pub columns: u32,             // 长凳列数
    pub rows_per_column: u32,     // 每列长凳数
    pub seats_per_bench: u32,     // 每凳座位数 (2 或 3)
}

impl Room {
    /// 考场容量 = 列数 × 每列凳数 × 每凳座位数
    ///
    /// 以 u64 计算，溢出时饱和到 `u64::MAX`（此类几何不会通过校验）。
    pub fn capacity(&self) -> u64 {
        u64::from(self.columns)
            .saturating_mul(u64::from(self.rows_per_column))
            .saturating_mul(u64::from(self.seats_per_bench))
    }

    /// 校验座位几何
    ///
    /// # 返回
    /// - Ok(()): 几何合法（0 列或 0 行视为合法，容量为 0）
    /// - Err(String): 不合法原因
    pub fn validate_geometry(&self) -> Result<(), String> {
        if !ALLOWED_SEATS_PER_BENCH.contains(&self.seats_per_bench) {
            return Err(format!(
                "seats_per_bench={} 不在允许范围 {:?}",
                self.seats_per_bench, ALLOWED_SEATS_PER_BENCH
            ));
        }
        let longest_side = u64::from(self.columns.max(self.rows_per_column));
        if longest_side > MAX_ROOM_CAPACITY || self.capacity() > MAX_ROOM_CAPACITY {
            return Err(format!(
                "columns={} rows_per_column={} 超出考场容量上限 {}",
                self.columns, self.rows_per_column, MAX_ROOM_CAPACITY
            ));
        }
        Ok(())
    }
}
