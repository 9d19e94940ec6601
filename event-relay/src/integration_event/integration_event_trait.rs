use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;

/// 集成事件载荷需要满足的通用能力边界
pub trait IntegrationEvent:
    Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync
{
    /// 事件唯一标识
    fn event_id(&self) -> &str;

    /// 事件创建时间
    fn occurred_at(&self) -> DateTime<Utc>;

    /// 追踪标识（可选；缺省时由门面在发布时注入环境中的标识）
    fn trace_id(&self) -> Option<&str> {
        None
    }
}
