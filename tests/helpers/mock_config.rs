// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use exam_seating::config::{ConfigError, EngineConfigReader};

/// Mock 配置结构
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    pub skip_invalid_rooms: bool,
    pub duty_shuffle_seed: Option<u64>,
    pub report_include_empty_rooms: bool,
}

impl MockConfig {
    /// 跳过几何无效考场
    pub fn skipping_invalid_rooms() -> Self {
        Self {
            skip_invalid_rooms: true,
            ..Self::default()
        }
    }

    /// 固定洗牌种子
    pub fn seeded(seed: u64) -> Self {
        Self {
            duty_shuffle_seed: Some(seed),
            ..Self::default()
        }
    }
}

#[async_trait]
impl EngineConfigReader for MockConfig {
    async fn get_skip_invalid_rooms(&self) -> Result<bool, ConfigError> {
        Ok(self.skip_invalid_rooms)
    }

    async fn get_duty_shuffle_seed(&self) -> Result<Option<u64>, ConfigError> {
        Ok(self.duty_shuffle_seed)
    }

    async fn get_report_include_empty_rooms(&self) -> Result<bool, ConfigError> {
        Ok(self.report_include_empty_rooms)
    }
}
