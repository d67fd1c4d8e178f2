use crate::config::toml_config::{HelpersConfig, DEFAULT_TIME_SLICE_MS};
use crate::domain::ports::{Clock, Scheduler, TimerHandle};
use crate::utils::error::{HelperError, Result};
use crate::utils::validation::Validate;
use std::time::Duration;

pub const DEFAULT_TIME_SLICE: Duration = Duration::from_millis(DEFAULT_TIME_SLICE_MS);

/// 防抖：在 `time_slice` 內重複呼叫只會執行最後一次
pub struct Debounce<S: Scheduler> {
    scheduler: S,
    time_slice: Option<Duration>,
    timer: Option<TimerHandle>,
}

impl<S: Scheduler> Debounce<S> {
    pub fn new(scheduler: S, time_slice: Duration) -> Self {
        Self {
            scheduler,
            time_slice: Some(time_slice),
            timer: None,
        }
    }

    pub fn with_default_time_slice(scheduler: S) -> Self {
        Self::new(scheduler, DEFAULT_TIME_SLICE)
    }

    pub fn from_config(scheduler: S, config: &HelpersConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(scheduler, config.time_slice()))
    }

    /// destroy 之後為 None
    pub fn time_slice(&self) -> Option<Duration> {
        self.time_slice
    }

    /// 取消尚未觸發的計時器，並在 `time_slice` 後執行 `func`
    pub fn run<F>(&mut self, func: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let time_slice = self.time_slice.ok_or(HelperError::Destroyed {
            component: "Debounce",
        })?;

        if let Some(handle) = self.timer.take() {
            if self.scheduler.is_scheduled(handle) {
                tracing::debug!("Debounce: replacing pending timer {}", handle.id());
            }
            self.scheduler.cancel(handle);
        }

        let handle = self.scheduler.schedule(time_slice, Box::new(func));
        tracing::debug!(
            "Debounce: armed timer {} for {}ms",
            handle.id(),
            time_slice.as_millis()
        );
        self.timer = Some(handle);
        Ok(())
    }

    pub fn is_pending(&self) -> bool {
        self.timer
            .is_some_and(|handle| self.scheduler.is_scheduled(handle))
    }

    /// 取消計時器並清掉時間間隔。可重複呼叫。
    pub fn destroy(&mut self) {
        if let Some(handle) = self.timer.take() {
            self.scheduler.cancel(handle);
            tracing::debug!("Debounce: cancelled timer {} on destroy", handle.id());
        }
        self.time_slice = None;
    }
}

/// 節流：距離上次被接受的呼叫超過 `time_slice` 才會執行
pub struct Throttle<C: Clock> {
    clock: C,
    time_slice: Duration,
    last_time: Option<Duration>,
}

impl<C: Clock> Throttle<C> {
    pub fn new(clock: C, time_slice: Duration) -> Self {
        Self {
            clock,
            time_slice,
            last_time: None,
        }
    }

    pub fn with_default_time_slice(clock: C) -> Self {
        Self::new(clock, DEFAULT_TIME_SLICE)
    }

    pub fn from_config(clock: C, config: &HelpersConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(clock, config.time_slice()))
    }

    pub fn time_slice(&self) -> Duration {
        self.time_slice
    }

    pub fn last_time(&self) -> Option<Duration> {
        self.last_time
    }

    /// 通過時記錄時間並回傳 true
    fn accept(&mut self) -> bool {
        let now = self.clock.now();

        let open = match self.last_time {
            None => true,
            Some(last) => now.saturating_sub(last) > self.time_slice,
        };

        if open {
            self.last_time = Some(now);
        } else {
            tracing::debug!(
                "Throttle: call rejected, {}ms since last accepted call",
                self.last_time
                    .map(|last| now.saturating_sub(last).as_millis())
                    .unwrap_or_default()
            );
        }
        open
    }

    /// 通過節流時執行 `func`，回傳是否有執行
    pub fn run<F: FnOnce()>(&mut self, func: F) -> bool {
        let accepted = self.accept();
        if accepted {
            func();
        }
        accepted
    }

    /// 同 `run`，但被節流擋下時改執行 `overload`
    pub fn run_or_else<F: FnOnce(), G: FnOnce()>(&mut self, func: F, overload: G) -> bool {
        let accepted = self.accept();
        if accepted {
            func();
        } else {
            overload();
        }
        accepted
    }

    /// 忘記上一次的呼叫時間，下一次呼叫一定會通過
    pub fn reset(&mut self) {
        self.last_time = None;
    }

    /// 回到剛建立時的狀態；之後仍可照常使用。可重複呼叫。
    pub fn destroy(&mut self) {
        if self.last_time.take().is_some() {
            tracing::debug!("Throttle: cleared last accepted call on destroy");
        }
    }
}
