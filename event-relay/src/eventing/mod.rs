//! 事件缓冲与调度子系统（eventing）
//!
//! 提供出站事件的缓冲、调度投递与入站事件的本地分发：
//! - `EventBuffer`：有界内存 FIFO，发布方与调度循环共享的唯一可变资源；
//! - `BufferConfig`：容量、批量上限、调度节奏与降级阈值；
//! - `DegradeTracker`：连续失败驱动的两态降级状态机；
//! - `EventDispatcher`：长驻后台调度循环，缓冲区的唯一消费者；
//! - `TransportProvider`：面向消息代理的出站发布协议；
//! - `EventHandler` / `IntegrationEventBus`：入站本地分发与发布门面。
//!
//! 该模块仅定义协议与调度运行时，不绑定具体传输实现，可对接任意消息系统或内存实现。
//!
pub mod buffer;
pub mod bus;
pub mod config;
pub mod degrade;
pub mod dispatcher;
pub mod handler;
pub mod transport;
pub mod transport_inmemory;

pub use buffer::EventBuffer;
pub use bus::IntegrationEventBus;
pub use config::BufferConfig;
pub use degrade::{DegradeTracker, DispatchMode};
pub use dispatcher::{DispatcherHandle, EventDispatcher};
pub use handler::{EventHandler, HandledEventType};
pub use transport::TransportProvider;
pub use transport_inmemory::InMemoryTransport;
