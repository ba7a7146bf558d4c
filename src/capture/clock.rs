//! 打点使用的单调时间源。

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

/// 单调时间源。
///
/// 只关心两次读数之间的差值，读数本身的起点没有意义。
pub trait Clock {
    /// 返回从某个固定起点开始经过的时长。
    fn now(&self) -> Duration;
}

/// 基于 [`Instant`] 的系统时钟，用于实时打点。
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// 创建一个以当前时刻为起点的时钟。
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// 手动推进的时钟，用于回放和测试。
///
/// 克隆出的实例共享同一个读数，因此可以在会话持有时钟的同时从外部推进它。
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    micros: Arc<AtomicU64>,
}

impl ManualClock {
    /// 创建一个读数为 0 的时钟。
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 把时钟向前推进 `seconds` 秒。负数会被忽略。
    pub fn advance(&self, seconds: f64) {
        if seconds.is_finite() && seconds > 0.0 {
            let delta = (seconds * 1_000_000.0).round() as u64;
            self.micros.fetch_add(delta, Ordering::SeqCst);
        }
    }

    /// 把时钟设置到一个绝对读数（秒）。
    pub fn set(&self, seconds: f64) {
        let micros = if seconds.is_finite() && seconds > 0.0 {
            (seconds * 1_000_000.0).round() as u64
        } else {
            0
        };
        self.micros.store(micros, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_micros(self.micros.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_is_shared_between_clones() {
        let clock = ManualClock::new();
        let handle = clock.clone();

        handle.advance(1.5);
        handle.advance(-3.0);
        assert_eq!(clock.now(), Duration::from_millis(1500));

        handle.set(0.25);
        assert_eq!(clock.now(), Duration::from_millis(250));
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
