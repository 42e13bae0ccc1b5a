// ==========================================
// 考场座位分配系统 - 引擎配置读取 Trait
// ==========================================
// 职责: 定义引擎所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

/// 配置读取错误
pub type ConfigError = Box<dyn Error + Send + Sync>;

// ==========================================
// EngineConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait EngineConfigReader: Send + Sync {
    /// 是否跳过几何无效的考场
    ///
    /// # 返回
    /// - true: 跳过并告警
    /// - false: 拒绝整次分配
    ///
    /// # 默认值
    /// - false
    async fn get_skip_invalid_rooms(&self) -> Result<bool, ConfigError>;

    /// 监考洗牌固定种子
    ///
    /// # 返回
    /// - Some(seed): 每次排班使用该种子（结果可复现）
    /// - None: 使用引擎自带随机源
    ///
    /// # 默认值
    /// - None
    async fn get_duty_shuffle_seed(&self) -> Result<Option<u64>, ConfigError>;

    /// 占用统计是否包含无人入座的考场
    ///
    /// # 默认值
    /// - true
    async fn get_report_include_empty_rooms(&self) -> Result<bool, ConfigError>;
}
