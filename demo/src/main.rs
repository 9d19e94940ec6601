use async_trait::async_trait;
use chrono::{DateTime, Utc};
use event_relay::eventing::{
    BufferConfig, EventBuffer, EventDispatcher, EventHandler, HandledEventType, InMemoryTransport,
    IntegrationEventBus,
};
use event_relay::integration_event::{BufferedEvent, IntegrationEvent};
use event_relay::trace;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
struct OrderPlaced {
    event_id: String,
    occurred_at: DateTime<Utc>,
    trace_id: Option<String>,
    order_id: String,
    amount_cents: i64,
}

impl OrderPlaced {
    fn new(order_id: &str, amount_cents: i64) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            occurred_at: Utc::now(),
            trace_id: None,
            order_id: order_id.to_string(),
            amount_cents,
        }
    }
}

impl IntegrationEvent for OrderPlaced {
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

struct AuditHandler;

#[async_trait]
impl EventHandler for AuditHandler {
    fn handler_name(&self) -> &str {
        "audit"
    }

    fn handled_event_type(&self) -> HandledEventType {
        HandledEventType::One("order.placed".to_string())
    }

    async fn handle(&self, event: &BufferedEvent) -> anyhow::Result<()> {
        let order: OrderPlaced = event.decode()?;
        println!(
            "handler=audit order={} amount_cents={} trace={}",
            order.order_id,
            order.amount_cents,
            event.trace_id().unwrap_or("-")
        );
        Ok(())
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // 小容量 + 小批量，便于观察背压与分批投递
    let config = BufferConfig {
        interval: Duration::from_millis(200),
        max_buffer_size: 4,
        max_batch_size: 2,
        ..Default::default()
    };
    let buffer = Arc::new(EventBuffer::new(config.max_buffer_size));
    let transport = Arc::new(InMemoryTransport::new(64));

    let bus = Arc::new(
        IntegrationEventBus::builder()
            .buffer(buffer.clone())
            .event_handlers(vec![Arc::new(AuditHandler) as Arc<dyn EventHandler>])
            .build(),
    );

    // 订阅传输流，把事件送回门面的入站入口
    let mut stream = transport.subscribe();
    let inbound = bus.clone();
    tokio::spawn(async move {
        while let Some(Ok(ev)) = stream.next().await {
            inbound.receive(ev).await;
        }
    });

    let dispatcher = Arc::new(
        EventDispatcher::builder()
            .buffer(buffer.clone())
            .transport(transport)
            .config(config)
            .build(),
    );
    let handle = dispatcher.start()?;
    println!("pipeline started");

    // 同一追踪作用域内发布一批订单事件；超出容量的部分被背压拒绝
    trace::with_trace_id(trace::new_trace_id(), async {
        for i in 0..6i64 {
            let event = OrderPlaced::new(&format!("o-{i}"), 100 * (i + 1));
            if !bus.try_publish("order.placed", &event) {
                println!("order o-{i} rejected by backpressure");
            }
        }
    })
    .await;

    tokio::time::sleep(Duration::from_secs(2)).await;
    handle.shutdown();
    handle.join().await;
    println!("shutdown complete, pending={}", buffer.len());
    Ok(())
}
