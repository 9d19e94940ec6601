//! 追踪标识（trace id）
//!
//! 以 tokio 的 task_local 承载“当前调用链”的追踪标识：
//! - `with_trace_id`：在一段异步调用内设定追踪标识（结构化作用域，替代全局可变状态）；
//! - `current_trace_id`：读取当前作用域内的追踪标识（无则为 None）；
//! - `new_trace_id`：生成新的标识（UUID v4）。
//!
//! 入站事件经 `IntegrationEventBus::receive` 分发时，会以事件自带的追踪标识建立作用域，
//! 使处理过程中再次出站发布的事件继承同一条因果链。
//!
use std::future::Future;
use uuid::Uuid;

tokio::task_local! {
    static TRACE_ID: String;
}

/// 读取当前调用链的追踪标识；不在任何作用域内时返回 None
pub fn current_trace_id() -> Option<String> {
    TRACE_ID.try_with(|id| id.clone()).ok()
}

/// 在给定追踪标识的作用域内运行 future
pub async fn with_trace_id<F>(trace_id: String, f: F) -> F::Output
where
    F: Future,
{
    TRACE_ID.scope(trace_id, f).await
}

/// 生成一个新的追踪标识
pub fn new_trace_id() -> String {
    Uuid::new_v4().to_string()
}
