//! 事件中继统一错误定义
//!
//! 聚焦缓冲区背压、传输失败与配置校验等最小必要集合，
//! 便于在生产方、门面与调度循环之间统一传播。
//!
use thiserror::Error;

/// 统一错误类型（基础库最小必要集）
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RelayError {
    // --- 缓冲区 ---
    /// 缓冲区已满；同步返回给生产方的背压信号
    #[error("event buffer overflow: capacity={capacity}")]
    BufferOverflow { capacity: usize },

    // --- 传输 ---
    /// 传输层发布失败；仅在调度循环内部消化，不会传播给生产方
    #[error("transport error: {reason}")]
    Transport { reason: String },

    // --- 配置 ---
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // --- 序列化 ---
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },
}

impl RelayError {
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
        }
    }

    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

/// 统一 Result 类型别名
pub type RelayResult<T> = Result<T, RelayError>;
