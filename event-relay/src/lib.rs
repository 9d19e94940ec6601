//! 集成事件缓冲与调度基础库（event-relay）
//!
//! 提供“请求内发布 → 内存缓冲 → 后台批量投递”的集成事件管道，用于在应用中实现：
//! - 出站事件的有界缓冲（`eventing::EventBuffer`）与入队即拒绝的背压
//! - 定节奏、批量上限的后台调度投递（`eventing::EventDispatcher`）
//! - 连续失败后的降级与首次成功的快速恢复（`eventing::DegradeTracker`）
//! - 发布/入站分发门面与追踪标识透传（`eventing::IntegrationEventBus`、`trace`）
//!
//! 本 crate 不绑定具体消息代理，仅定义 `TransportProvider` 协议与最小必要的错误类型，
//! 以便在不同传输实现（例如 NATS、Kafka 或内存实现）上进行适配。
//!
//! 典型用法：
//! 1. 启动期构建 `EventBuffer` 与 `BufferConfig`，显式传入门面与调度器；
//! 2. 实现 `TransportProvider` 对接实际消息代理；
//! 3. `EventDispatcher::start` 启动后台调度，持有句柄用于优雅关闭；
//! 4. 请求处理中通过 `IntegrationEventBus::publish/try_publish` 发布事件，
//!    入站方向经 `receive` 分发给注册的 `EventHandler`。
//!
pub mod error;
pub mod eventing;
pub mod integration_event;
pub mod trace;
