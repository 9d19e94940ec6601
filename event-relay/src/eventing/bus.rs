//! 集成事件总线门面（IntegrationEventBus）
//!
//! 请求处理代码的发布入口与入站事件的本地分发入口：
//! - `publish`：补齐追踪标识后封装入队，入队成功即返回，不等待传输投递；
//!   缓冲区满时把 `BufferOverflow` 同步返回给调用方；
//! - `try_publish`：尽力而为版本，吞掉发布错误只记日志，返回是否成功；
//! - `receive`：入站事件以其追踪标识建立作用域，立即分发给注册的处理器
//!   （同步本地分发，不经过缓冲区）。
//!
use super::{EventBuffer, EventHandler, HandledEventType};
use crate::error::RelayResult;
use crate::integration_event::{BufferedEvent, IntegrationEvent};
use crate::trace;
use bon::Builder;
use futures_util::{StreamExt, stream};
use std::collections::HashMap;
use std::sync::Arc;

// 导入由 bon::Builder 生成的 typestate 模块与状态转换别名
use self::integration_event_bus_builder::{IsUnset, SetRegistry, State as BuilderState};

#[derive(Builder)]
pub struct IntegrationEventBus {
    buffer: Arc<EventBuffer>,
    #[builder(default, setters(vis = "pub(crate)"))]
    registry: HandlerRegistry,
    /// 单个入站事件广播给多个 handler 的处理并发
    #[builder(default = 8)]
    handler_concurrency: usize,
}

impl<S: BuilderState> IntegrationEventBusBuilder<S> {
    pub fn event_handlers(
        self,
        handlers: Vec<Arc<dyn EventHandler>>,
    ) -> IntegrationEventBusBuilder<SetRegistry<S>>
    where
        <S as BuilderState>::Registry: IsUnset,
    {
        self.registry(HandlerRegistry::new(handlers))
    }
}

impl IntegrationEventBus {
    /// 发布出站事件：补齐追踪标识并入队，入队成功即返回
    ///
    /// 追踪标识的取用顺序：事件自带 > 环境作用域 > 新生成。
    pub fn publish<E: IntegrationEvent>(&self, event_name: &str, event: &E) -> RelayResult<()> {
        let trace_id = event
            .trace_id()
            .map(str::to_owned)
            .or_else(trace::current_trace_id)
            .unwrap_or_else(trace::new_trace_id);

        let buffered = BufferedEvent::encode(event_name, event, Some(trace_id))?;
        self.buffer.enqueue(buffered)
    }

    /// 尽力而为的发布：失败只记日志并返回 false
    pub fn try_publish<E: IntegrationEvent>(&self, event_name: &str, event: &E) -> bool {
        match self.publish(event_name, event) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(event_name, error = %err, "best-effort publish dropped");
                false
            }
        }
    }

    /// 入站事件入口：以事件的追踪标识建立作用域并分发给匹配的处理器
    pub async fn receive(&self, event: BufferedEvent) {
        let trace_id = event
            .trace_id()
            .map(str::to_owned)
            .unwrap_or_else(trace::new_trace_id);

        trace::with_trace_id(trace_id, self.dispatch_local(event)).await
    }

    async fn dispatch_local(&self, event: BufferedEvent) {
        let matched = self.registry.matching(event.event_name());
        if matched.is_empty() {
            tracing::debug!(
                event_name = event.event_name(),
                "no local handler subscribed"
            );
            return;
        }

        stream::iter(matched)
            .for_each_concurrent(Some(self.handler_concurrency), |h| {
                let ev = event.clone();
                async move {
                    if let Err(err) = h.handle(&ev).await {
                        tracing::warn!(
                            handler = h.handler_name(),
                            event_name = ev.event_name(),
                            event_id = ev.event_id(),
                            error = %err,
                            "local event handler failed"
                        );
                    }
                }
            })
            .await;
    }
}

#[derive(Clone, Default)]
struct HandlerRegistry {
    by_name: HashMap<String, Vec<Arc<dyn EventHandler>>>,
    all: Vec<Arc<dyn EventHandler>>,
}

impl HandlerRegistry {
    fn new(handlers: Vec<Arc<dyn EventHandler>>) -> Self {
        let mut by_name: HashMap<String, Vec<Arc<dyn EventHandler>>> = HashMap::new();
        let mut all: Vec<Arc<dyn EventHandler>> = Vec::new();

        for h in handlers {
            match h.handled_event_type() {
                HandledEventType::All => all.push(h),
                HandledEventType::One(name) => {
                    by_name.entry(name).or_default().push(h);
                }
                HandledEventType::Many(names) => {
                    for name in names {
                        by_name.entry(name).or_default().push(h.clone());
                    }
                }
            }
        }

        Self { by_name, all }
    }

    fn matching(&self, event_name: &str) -> Vec<Arc<dyn EventHandler>> {
        let mut merged: Vec<Arc<dyn EventHandler>> = Vec::new();
        if let Some(list) = self.by_name.get(event_name) {
            merged.extend(list.iter().cloned());
        }
        merged.extend(self.all.iter().cloned());
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RelayError;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};
    use std::sync::Mutex;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    struct DemoEvent {
        event_id: String,
        occurred_at: DateTime<Utc>,
        trace_id: Option<String>,
        value: i64,
    }

    impl DemoEvent {
        fn new(id: &str) -> Self {
            Self {
                event_id: id.to_string(),
                occurred_at: Utc::now(),
                trace_id: None,
                value: 42,
            }
        }
    }

    impl IntegrationEvent for DemoEvent {
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

    #[derive(Default)]
    struct RecordingHandler {
        // (事件标识, 处理时环境作用域里的追踪标识)
        seen: Mutex<Vec<(String, Option<String>)>>,
    }

    #[async_trait]
    impl EventHandler for RecordingHandler {
        fn handler_name(&self) -> &str {
            "recording"
        }
        fn handled_event_type(&self) -> HandledEventType {
            HandledEventType::One("demo.created".to_string())
        }
        async fn handle(&self, event: &BufferedEvent) -> anyhow::Result<()> {
            self.seen
                .lock()
                .unwrap()
                .push((event.event_id().to_string(), trace::current_trace_id()));
            Ok(())
        }
    }

    fn mk_bus(capacity: usize) -> (Arc<EventBuffer>, IntegrationEventBus) {
        let buffer = Arc::new(EventBuffer::new(capacity));
        let bus = IntegrationEventBus::builder().buffer(buffer.clone()).build();
        (buffer, bus)
    }

    #[test]
    fn publish_generates_trace_id_when_absent() {
        let (buffer, bus) = mk_bus(8);

        bus.publish("demo.created", &DemoEvent::new("e1")).unwrap();

        let buffered = buffer.peek().unwrap();
        assert_eq!(buffered.event_name(), "demo.created");
        assert_eq!(buffered.event_id(), "e1");
        assert!(buffered.trace_id().is_some_and(|id| !id.is_empty()));
        assert_eq!(buffered.payload()["value"], 42);
    }

    #[tokio::test]
    async fn publish_reuses_ambient_trace_id() {
        let (buffer, bus) = mk_bus(8);

        trace::with_trace_id("tr-ambient".to_string(), async {
            bus.publish("demo.created", &DemoEvent::new("e1")).unwrap();
        })
        .await;

        assert_eq!(buffer.pop().unwrap().trace_id(), Some("tr-ambient"));
    }

    #[tokio::test]
    async fn event_own_trace_id_wins_over_ambient() {
        let (buffer, bus) = mk_bus(8);
        let mut event = DemoEvent::new("e1");
        event.trace_id = Some("tr-own".to_string());

        trace::with_trace_id("tr-ambient".to_string(), async {
            bus.publish("demo.created", &event).unwrap();
        })
        .await;

        assert_eq!(buffer.pop().unwrap().trace_id(), Some("tr-own"));
    }

    #[test]
    fn publish_propagates_overflow() {
        let (_buffer, bus) = mk_bus(1);

        bus.publish("demo.created", &DemoEvent::new("e1")).unwrap();
        let err = bus
            .publish("demo.created", &DemoEvent::new("e2"))
            .unwrap_err();
        assert!(matches!(err, RelayError::BufferOverflow { capacity: 1 }));
    }

    #[test]
    fn try_publish_swallows_overflow() {
        let (buffer, bus) = mk_bus(1);

        assert!(bus.try_publish("demo.created", &DemoEvent::new("e1")));
        assert!(!bus.try_publish("demo.created", &DemoEvent::new("e2")));
        assert_eq!(buffer.len(), 1);
    }

    #[tokio::test]
    async fn receive_dispatches_to_matching_handlers_with_trace_scope() {
        let buffer = Arc::new(EventBuffer::new(8));
        let handler = Arc::new(RecordingHandler::default());
        let bus = IntegrationEventBus::builder()
            .buffer(buffer)
            .event_handlers(vec![handler.clone()])
            .build();

        let inbound = BufferedEvent::builder()
            .event_name("demo.created".to_string())
            .event_id("in-1".to_string())
            .maybe_trace_id(Some("tr-inbound".to_string()))
            .occurred_at(Utc::now())
            .payload(serde_json::json!({ "value": 1 }))
            .build();
        bus.receive(inbound).await;

        let seen = handler.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "in-1");
        // 处理器在入站事件的追踪作用域内运行
        assert_eq!(seen[0].1.as_deref(), Some("tr-inbound"));
    }

    #[tokio::test]
    async fn receive_ignores_events_without_subscribers() {
        let buffer = Arc::new(EventBuffer::new(8));
        let handler = Arc::new(RecordingHandler::default());
        let bus = IntegrationEventBus::builder()
            .buffer(buffer)
            .event_handlers(vec![handler.clone()])
            .build();

        let inbound = BufferedEvent::builder()
            .event_name("other.name".to_string())
            .event_id("in-2".to_string())
            .occurred_at(Utc::now())
            .payload(serde_json::json!({}))
            .build();
        bus.receive(inbound).await;

        assert!(handler.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn outbound_publish_inside_receive_inherits_inbound_trace() {
        // 入站 bus 的处理器向另一条出站 bus 发布因果事件
        struct CascadeHandler {
            outbound: IntegrationEventBus,
        }

        #[async_trait]
        impl EventHandler for CascadeHandler {
            fn handler_name(&self) -> &str {
                "cascade"
            }
            fn handled_event_type(&self) -> HandledEventType {
                HandledEventType::All
            }
            async fn handle(&self, event: &BufferedEvent) -> anyhow::Result<()> {
                let caused = DemoEvent::new(&format!("caused-by-{}", event.event_id()));
                self.outbound.publish("demo.caused", &caused)?;
                Ok(())
            }
        }

        let outbound_buffer = Arc::new(EventBuffer::new(8));
        let outbound = IntegrationEventBus::builder()
            .buffer(outbound_buffer.clone())
            .build();
        let inbound_bus = IntegrationEventBus::builder()
            .buffer(Arc::new(EventBuffer::new(8)))
            .event_handlers(vec![Arc::new(CascadeHandler { outbound })
                as Arc<dyn EventHandler>])
            .build();

        let inbound = BufferedEvent::builder()
            .event_name("demo.created".to_string())
            .event_id("in-3".to_string())
            .maybe_trace_id(Some("tr-chain".to_string()))
            .occurred_at(Utc::now())
            .payload(serde_json::json!({}))
            .build();
        inbound_bus.receive(inbound).await;

        let caused = outbound_buffer.pop().unwrap();
        assert_eq!(caused.event_id(), "caused-by-in-3");
        assert_eq!(caused.trace_id(), Some("tr-chain"));
    }
}
