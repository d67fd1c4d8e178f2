use crate::domain::ports::Clock;
use chrono::Utc;
use std::time::Duration;

/// 牆上時鐘（epoch 毫秒），系統時間被調整時可能倒退
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        let millis = Utc::now().timestamp_millis().max(0) as u64;
        Duration::from_millis(millis)
    }
}

/// 單調時鐘，跟著 tokio 的時間走（paused 測試時也能推進）
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: tokio::time::Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_epoch_based() {
        // 2020-01-01 之後
        assert!(SystemClock.now() > Duration::from_millis(1_577_836_800_000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_clock_follows_paused_time() {
        let clock = TokioClock::new();
        assert_eq!(clock.now(), Duration::ZERO);

        tokio::time::advance(Duration::from_millis(400)).await;
        assert_eq!(clock.now(), Duration::from_millis(400));
    }
}
