use std::time::Duration;

/// 已排程計時器的識別碼
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// 單次計時器：延遲後執行一次，可在觸發前取消
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle;
    /// 已觸發或不存在的 handle 直接忽略
    fn cancel(&self, handle: TimerHandle);
    fn is_scheduled(&self, handle: TimerHandle) -> bool;
}

pub trait Clock: Send + Sync {
    /// 從任意固定起點算起的時間
    fn now(&self) -> Duration;
}

impl<S: Scheduler + ?Sized> Scheduler for std::sync::Arc<S> {
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle {
        (**self).schedule(delay, task)
    }

    fn cancel(&self, handle: TimerHandle) {
        (**self).cancel(handle)
    }

    fn is_scheduled(&self, handle: TimerHandle) -> bool {
        (**self).is_scheduled(handle)
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> Duration {
        (**self).now()
    }
}
