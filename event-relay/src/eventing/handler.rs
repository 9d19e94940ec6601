//! 事件处理器（EventHandler）
//!
//! 定义消费某个/多个/全部名称入站事件的处理逻辑与元信息（名称、订阅范围）。
//!
use crate::integration_event::BufferedEvent;
use async_trait::async_trait;

#[derive(Clone, Debug)]
pub enum HandledEventType {
    One(String),
    Many(Vec<String>),
    All,
}

/// 事件处理器：处理某一名称的入站事件
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// 处理器名称（用于失败日志与审计）
    fn handler_name(&self) -> &str;
    /// 返回该处理器订阅的事件名称
    fn handled_event_type(&self) -> HandledEventType;
    /// 处理事件
    async fn handle(&self, event: &BufferedEvent) -> anyhow::Result<()>;
}
