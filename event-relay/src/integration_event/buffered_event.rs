//! 缓冲事件信封（BufferedEvent）
//!
//! 定义事件在缓冲区与传输层之间的标准形态：
//! 发布时由门面封装，入队后不可变；确认投递成功前不会从缓冲区移除。
//!
use crate::error::RelayResult;
use crate::integration_event::IntegrationEvent;
use bon::Builder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
pub struct BufferedEvent {
    /// 事件名称，调度投递与入站订阅均按名称匹配
    event_name: String,
    /// 事件唯一标识符
    event_id: String,
    /// 追踪标识，用于串联一次因果链上的出入站事件
    trace_id: Option<String>,
    /// 事件发生时间
    occurred_at: DateTime<Utc>,
    /// 事件负载，存储事件的具体数据
    payload: Value,
}

impl BufferedEvent {
    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// 以给定名称与已解析的追踪标识封装事件载荷
    pub fn encode<E>(event_name: &str, event: &E, trace_id: Option<String>) -> RelayResult<Self>
    where
        E: IntegrationEvent,
    {
        Ok(Self {
            event_name: event_name.to_string(),
            event_id: event.event_id().to_string(),
            trace_id,
            occurred_at: event.occurred_at(),
            payload: serde_json::to_value(event)?,
        })
    }

    /// 还原为具体类型的事件载荷（入站处理器侧使用）
    pub fn decode<E>(&self) -> RelayResult<E>
    where
        E: IntegrationEvent,
    {
        Ok(serde_json::from_value(self.payload.clone())?)
    }
}
