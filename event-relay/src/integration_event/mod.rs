//! 集成事件模型（integration_event）
//!
//! - `IntegrationEvent`：事件载荷的通用契约（标识、时间、追踪）；
//! - `BufferedEvent`：进入缓冲区与传输层的事件信封。
//!
pub mod buffered_event;
pub mod integration_event_trait;

pub use buffered_event::BufferedEvent;
pub use integration_event_trait::IntegrationEvent;
