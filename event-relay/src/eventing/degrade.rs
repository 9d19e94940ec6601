//! 降级跟踪（DegradeTracker）
//!
//! 两态状态机，仅由调度循环观察到的投递结果驱动：
//! - Normal：连续失败计数达到阈值后进入 Degraded，并记录降级时刻；
//! - Degraded：任何一次成功投递立即恢复 Normal；缓冲区为空、没有投递尝试时状态保持不变。
//!
//! 状态只被调度循环单线程读写，不需要同步原语。
//!
use chrono::{DateTime, Utc};

/// 调度模式：决定调度循环两次 tick 之间的等待间隔
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchMode {
    Normal,
    Degraded,
}

pub struct DegradeTracker {
    mode: DispatchMode,
    consecutive_failures: usize,
    degraded_since: Option<DateTime<Utc>>,
    threshold: usize,
}

impl DegradeTracker {
    /// `threshold` 为进入降级所需的连续失败次数
    pub fn new(threshold: usize) -> Self {
        Self {
            mode: DispatchMode::Normal,
            consecutive_failures: 0,
            degraded_since: None,
            threshold,
        }
    }

    /// 记录一次成功投递；处于降级时立即恢复。返回发生的模式切换
    pub fn record_success(&mut self) -> Option<DispatchMode> {
        self.consecutive_failures = 0;
        match self.mode {
            DispatchMode::Degraded => {
                self.mode = DispatchMode::Normal;
                self.degraded_since = None;
                Some(DispatchMode::Normal)
            }
            DispatchMode::Normal => None,
        }
    }

    /// 记录一次失败投递；Normal 下计数达到阈值则降级并清零计数。返回发生的模式切换
    pub fn record_failure(&mut self) -> Option<DispatchMode> {
        match self.mode {
            DispatchMode::Normal => {
                self.consecutive_failures += 1;
                if self.consecutive_failures >= self.threshold {
                    self.mode = DispatchMode::Degraded;
                    self.degraded_since = Some(Utc::now());
                    self.consecutive_failures = 0;
                    return Some(DispatchMode::Degraded);
                }
                None
            }
            // 已处于降级，继续保持
            DispatchMode::Degraded => None,
        }
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    pub fn consecutive_failures(&self) -> usize {
        self.consecutive_failures
    }

    pub fn degraded_since(&self) -> Option<DateTime<Utc>> {
        self.degraded_since
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downgrade_after_reaching_threshold() {
        let mut tracker = DegradeTracker::new(3);

        assert_eq!(tracker.record_failure(), None);
        assert_eq!(tracker.record_failure(), None);
        assert_eq!(tracker.mode(), DispatchMode::Normal);

        assert_eq!(tracker.record_failure(), Some(DispatchMode::Degraded));
        assert_eq!(tracker.mode(), DispatchMode::Degraded);
        assert!(tracker.degraded_since().is_some());
        // 降级时计数清零，为恢复后的下一轮累计做准备
        assert_eq!(tracker.consecutive_failures(), 0);
    }

    #[test]
    fn success_resets_failure_count() {
        let mut tracker = DegradeTracker::new(3);

        tracker.record_failure();
        tracker.record_failure();
        assert_eq!(tracker.record_success(), None);
        assert_eq!(tracker.consecutive_failures(), 0);

        // 失败不跨越成功累计
        tracker.record_failure();
        tracker.record_failure();
        assert_eq!(tracker.mode(), DispatchMode::Normal);
        assert_eq!(tracker.record_failure(), Some(DispatchMode::Degraded));
    }

    #[test]
    fn first_success_while_degraded_recovers_immediately() {
        let mut tracker = DegradeTracker::new(1);

        assert_eq!(tracker.record_failure(), Some(DispatchMode::Degraded));
        assert_eq!(tracker.record_success(), Some(DispatchMode::Normal));
        assert_eq!(tracker.mode(), DispatchMode::Normal);
        assert_eq!(tracker.degraded_since(), None);
    }

    #[test]
    fn failure_while_degraded_keeps_mode() {
        let mut tracker = DegradeTracker::new(1);

        tracker.record_failure();
        assert_eq!(tracker.record_failure(), None);
        assert_eq!(tracker.mode(), DispatchMode::Degraded);
    }
}
