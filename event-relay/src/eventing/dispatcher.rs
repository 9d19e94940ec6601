//! 调度循环（EventDispatcher）
//!
//! 缓冲区的唯一消费者，进程生命周期内长驻的后台任务：
//! - 按固定节奏醒来，单次最多投递 `max_batch_size` 条事件；
//! - 队首事件投递成功后才出队；失败则原位保留并提前结束本批次；
//! - 投递结果驱动降级跟踪，降级期间以 `downgrade_interval` 放缓节奏；
//! - 传输层错误绝不冲出循环，仅转化为重试、降级信号与日志；
//! - 提供关闭与等待的 `DispatcherHandle`，关闭时不做最终冲刷。
//!
use super::{BufferConfig, DegradeTracker, DispatchMode, EventBuffer, TransportProvider};
use crate::error::RelayResult;
use bon::Builder;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;

/// EventDispatcher：
/// - 周期性从缓冲区批量取事件并发布到传输层
/// - 按投递结果在 Normal/Degraded 两种节奏之间切换
#[derive(Builder)]
pub struct EventDispatcher {
    buffer: Arc<EventBuffer>,
    transport: Arc<dyn TransportProvider>,
    #[builder(default)]
    config: BufferConfig,
}

impl EventDispatcher {
    /// 启动调度循环，返回可用于关闭/等待的句柄；配置非法时启动失败
    pub fn start(self: Arc<Self>) -> RelayResult<DispatcherHandle> {
        self.config.validate()?;

        let token = CancellationToken::new();
        let task = tokio::spawn(self.clone().run(token.clone()));
        tracing::info!(
            interval_ms = self.config.interval.as_millis() as u64,
            max_batch_size = self.config.max_batch_size,
            "event dispatcher started"
        );

        Ok(DispatcherHandle {
            token,
            task: Some(task),
        })
    }

    async fn run(self: Arc<Self>, token: CancellationToken) {
        let mut tracker = DegradeTracker::new(self.config.failures_before_downgrade);

        loop {
            // 每轮重估等待间隔，模式切换在下一次等待即生效
            let wait = match tracker.mode() {
                DispatchMode::Normal => self.config.interval,
                DispatchMode::Degraded => self.config.downgrade_interval,
            };

            tokio::select! {
                _ = token.cancelled() => break,
                _ = time::sleep(wait) => self.tick(&mut tracker, &token).await,
            }
        }

        tracing::info!(pending = self.buffer.len(), "event dispatcher stopped");
    }

    async fn tick(&self, tracker: &mut DegradeTracker, token: &CancellationToken) {
        if self.buffer.is_empty() {
            return;
        }

        let mut published = 0usize;
        for _ in 0..self.config.max_batch_size {
            if token.is_cancelled() {
                break;
            }
            let Some(event) = self.buffer.peek() else {
                break;
            };

            match self.transport.publish(event.event_name(), &event).await {
                Ok(()) => {
                    // 确认成功后才移除队首
                    self.buffer.pop();
                    published += 1;
                    if tracker.record_success() == Some(DispatchMode::Normal) {
                        tracing::info!("transport recovered, dispatch back to normal cadence");
                    }
                }
                Err(err) => {
                    // 队首原位保留待下一轮重试；同批后续事件大概率同样失败，提前结束
                    tracing::warn!(
                        event_name = event.event_name(),
                        event_id = event.event_id(),
                        error = %err,
                        "transport publish failed, event kept for retry"
                    );
                    if tracker.record_failure() == Some(DispatchMode::Degraded) {
                        tracing::warn!(
                            downgrade_interval_ms = self.config.downgrade_interval.as_millis() as u64,
                            "consecutive transport failures, dispatch downgraded"
                        );
                    }
                    break;
                }
            }
        }

        tracing::debug!(
            published,
            pending = self.buffer.len(),
            "dispatch tick finished"
        );
    }
}

/// 调度循环运行句柄：用于优雅关闭与等待任务结束
#[derive(Debug)]
pub struct DispatcherHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl DispatcherHandle {
    pub fn shutdown(&self) {
        self.token.cancel();
    }

    pub async fn join(mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for DispatcherHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
