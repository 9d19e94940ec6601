//! 内存版传输（InMemoryTransport）
//!
//! 基于 `tokio::sync::broadcast` 实现的轻量传输，满足 `TransportProvider` 协议：
//! - `publish`：克隆并广播事件信封；
//! - `subscribe`：返回 `'static` 生命周期事件流，便于在 `tokio::spawn` 中消费；
//! - 典型用途：测试环境、示例与本地开发。
//!
//! 注意：无订阅者时发送将被忽略，不视为投递失败。

use crate::error::{RelayError, RelayResult as Result};
use crate::eventing::TransportProvider;
use crate::integration_event::BufferedEvent;
use async_trait::async_trait;
use futures_core::stream::BoxStream;
use futures_util::StreamExt;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

/// 简单的内存传输实现
#[derive(Clone)]
pub struct InMemoryTransport {
    tx: broadcast::Sender<BufferedEvent>,
}

impl InMemoryTransport {
    /// 创建一个内存传输，`capacity` 为广播缓冲区容量
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// 订阅经由本传输发布的事件流
    pub fn subscribe(&self) -> BoxStream<'static, Result<BufferedEvent>> {
        let rx = self.tx.subscribe();
        let stream =
            BroadcastStream::new(rx).map(|r| r.map_err(|e| RelayError::transport(e.to_string())));
        Box::pin(stream)
    }
}

#[async_trait]
impl TransportProvider for InMemoryTransport {
    async fn publish(&self, _event_name: &str, event: &BufferedEvent) -> Result<()> {
        // 若当前无订阅者，broadcast 的 send 会返回错误，这里视为非致命并忽略
        let _ = self.tx.send(event.clone());
        Ok(())
    }
}
