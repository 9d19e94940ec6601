//! 事件缓冲区（EventBuffer）
//!
//! 有界的内存 FIFO 队列，保存等待投递至传输层的集成事件：
//! - `enqueue`：入队到队尾，容量已满时立即返回 `BufferOverflow`（系统的背压阀门）；
//! - `peek`/`pop`：仅由调度循环消费；确认投递成功后才 `pop` 移除，
//!   失败的事件保留在队首等待下一轮重试；
//! - 内部互斥锁保护，多生产者 + 单消费者并发下调用方无需额外加锁。
//!
use crate::error::{RelayError, RelayResult};
use crate::integration_event::BufferedEvent;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

pub struct EventBuffer {
    inner: Mutex<VecDeque<BufferedEvent>>,
    capacity: usize,
}

impl EventBuffer {
    /// 创建缓冲区，`capacity` 为可容纳的最大事件数
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
            capacity,
        }
    }

    /// 入队到队尾；已满时拒绝并返回 `BufferOverflow`
    pub fn enqueue(&self, event: BufferedEvent) -> RelayResult<()> {
        let mut queue = self.lock();
        if queue.len() >= self.capacity {
            return Err(RelayError::BufferOverflow {
                capacity: self.capacity,
            });
        }
        queue.push_back(event);
        Ok(())
    }

    /// 查看队首而不移除（投递失败时事件原位保留）
    pub fn peek(&self) -> Option<BufferedEvent> {
        self.lock().front().cloned()
    }

    /// 移除并返回队首；仅应在传输层确认成功后调用
    pub fn pop(&self) -> Option<BufferedEvent> {
        self.lock().pop_front()
    }

    /// 当前深度
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // 队列在任一锁区间结束时都处于一致状态，锁中毒时直接取回内层数据
    fn lock(&self) -> MutexGuard<'_, VecDeque<BufferedEvent>> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
