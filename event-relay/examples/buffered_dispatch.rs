//! 缓冲调度管道（内存版）示例
//! 展示 发布 -> 缓冲 -> 调度投递 的闭环，以及传输故障下的降级与恢复
use anyhow::Result as AnyResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use event_relay::error::{RelayError, RelayResult};
use event_relay::eventing::{
    BufferConfig, EventBuffer, EventDispatcher, IntegrationEventBus, TransportProvider,
};
use event_relay::integration_event::{BufferedEvent, IntegrationEvent};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use uuid::Uuid;

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
struct UserCreated {
    event_id: String,
    occurred_at: DateTime<Utc>,
    trace_id: Option<String>,
    user_id: String,
}

impl UserCreated {
    fn new(user_id: &str) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            occurred_at: Utc::now(),
            trace_id: None,
            user_id: user_id.to_string(),
        }
    }
}

impl IntegrationEvent for UserCreated {
    fn event_id(&self) -> &str {
        &self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }
}

/// 前几次发布失败的传输，模拟暂时不可用的消息代理
struct FlakyTransport {
    fail_first: usize,
    attempts: AtomicUsize,
}

#[async_trait]
impl TransportProvider for FlakyTransport {
    async fn publish(&self, event_name: &str, event: &BufferedEvent) -> RelayResult<()> {
        let n = self.attempts.fetch_add(1, Ordering::SeqCst);
        if n < self.fail_first {
            return Err(RelayError::transport("broker unavailable"));
        }
        println!(
            "transport: published name={} id={} trace={}",
            event_name,
            event.event_id(),
            event.trace_id().unwrap_or("-")
        );
        Ok(())
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> AnyResult<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let config = BufferConfig {
        interval: Duration::from_millis(200),
        downgrade_interval: Duration::from_millis(800),
        failures_before_downgrade: 2,
        ..Default::default()
    };
    let buffer = Arc::new(EventBuffer::new(config.max_buffer_size));
    let transport = Arc::new(FlakyTransport {
        fail_first: 3,
        attempts: AtomicUsize::new(0),
    });

    let bus = IntegrationEventBus::builder().buffer(buffer.clone()).build();
    let dispatcher = Arc::new(
        EventDispatcher::builder()
            .buffer(buffer.clone())
            .transport(transport)
            .config(config)
            .build(),
    );
    let handle = dispatcher.start()?;

    for i in 0..3 {
        bus.publish("user.created", &UserCreated::new(&format!("u-{i}")))?;
    }
    println!("published 3 events, pending={}", buffer.len());

    // 前 3 次投递失败：第 2 次失败后降级，故障结束后首个成功即恢复
    tokio::time::sleep(Duration::from_secs(3)).await;
    handle.shutdown();
    handle.join().await;
    println!("done, pending={}", buffer.len());
    Ok(())
}
