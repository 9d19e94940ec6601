//! 传输提供方（TransportProvider）协议
//!
//! 面向消息代理的出站发布抽象：一次调用发布一条命名事件，允许瞬时失败；
//! 批量节奏由调度循环把控，不要求传输方支持批量。
//!
use crate::{error::RelayResult as Result, integration_event::BufferedEvent};
use async_trait::async_trait;

/// 传输提供方：将事件发布至外部消息代理
#[async_trait]
pub trait TransportProvider: Send + Sync {
    async fn publish(&self, event_name: &str, event: &BufferedEvent) -> Result<()>;
}
