//! 调度配置（BufferConfig）
//!
//! 进程启动时一次性给定，生命周期内不可变；
//! 零值属于启动期致命错误，由 `validate` 在调度器启动前拒绝。
//!
use crate::error::{RelayError, RelayResult};
use std::time::Duration;

/// 缓冲与调度配置
#[derive(Clone, Copy, Debug)]
pub struct BufferConfig {
    /// 正常模式下两次调度之间的间隔
    pub interval: Duration,
    /// 缓冲区可容纳的最大事件数
    pub max_buffer_size: usize,
    /// 单次调度最多尝试投递的事件数
    pub max_batch_size: usize,
    /// 连续失败多少次后进入降级模式
    pub failures_before_downgrade: usize,
    /// 降级模式下的调度间隔（比 `interval` 更长、更缓和的节奏）
    pub downgrade_interval: Duration,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_buffer_size: 10_000,
            max_batch_size: 1_000,
            failures_before_downgrade: 3,
            downgrade_interval: Duration::from_secs(30),
        }
    }
}

impl BufferConfig {
    /// 校验配置；零值一律拒绝
    pub fn validate(&self) -> RelayResult<()> {
        if self.interval.is_zero() {
            return Err(RelayError::invalid_config("interval must be positive"));
        }
        if self.downgrade_interval.is_zero() {
            return Err(RelayError::invalid_config(
                "downgrade_interval must be positive",
            ));
        }
        if self.max_buffer_size == 0 {
            return Err(RelayError::invalid_config(
                "max_buffer_size must be positive",
            ));
        }
        if self.max_batch_size == 0 {
            return Err(RelayError::invalid_config(
                "max_batch_size must be positive",
            ));
        }
        if self.failures_before_downgrade == 0 {
            return Err(RelayError::invalid_config(
                "failures_before_downgrade must be positive",
            ));
        }
        Ok(())
    }
}
