use crate::domain::ports::{Clock, Scheduler, Task, TimerHandle};
use crate::utils::error::{HelperError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

struct PendingTimer {
    handle: TimerHandle,
    deadline: Duration,
    task: Task,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_id: u64,
    timers: Vec<PendingTimer>,
}

/// 手動推進的假時鐘，測試用。`advance` 依到期順序同步執行計時器。
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, ManualState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 推進時間並執行所有到期的計時器，回傳執行的數量
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.state().now + by;
        let mut fired = 0;

        loop {
            // 任務在鎖外執行，才能在回呼裡重新排程
            let next = {
                let mut state = self.state();
                let due = state
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, timer)| timer.deadline <= target)
                    .min_by_key(|(_, timer)| (timer.deadline, timer.handle))
                    .map(|(index, _)| index);
                due.map(|index| {
                    let timer = state.timers.remove(index);
                    state.now = timer.deadline;
                    timer
                })
            };

            match next {
                Some(timer) => {
                    tracing::trace!("ManualScheduler: firing timer {}", timer.handle.id());
                    (timer.task)();
                    fired += 1;
                }
                None => break,
            }
        }

        self.state().now = target;
        fired
    }

    pub fn pending_count(&self) -> usize {
        self.state().timers.len()
    }

    pub fn elapsed(&self) -> Duration {
        self.state().now
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle {
        let mut state = self.state();
        state.next_id += 1;
        let handle = TimerHandle::new(state.next_id);
        let deadline = state.now + delay;
        state.timers.push(PendingTimer {
            handle,
            deadline,
            task,
        });
        handle
    }

    fn cancel(&self, handle: TimerHandle) {
        self.state().timers.retain(|timer| timer.handle != handle);
    }

    fn is_scheduled(&self, handle: TimerHandle) -> bool {
        self.state().timers.iter().any(|timer| timer.handle == handle)
    }
}

impl Clock for ManualScheduler {
    fn now(&self) -> Duration {
        self.elapsed()
    }
}

#[derive(Default)]
struct TokioTimers {
    next_id: AtomicU64,
    tasks: Mutex<HashMap<u64, JoinHandle<()>>>,
}

impl TokioTimers {
    fn tasks(&self) -> MutexGuard<'_, HashMap<u64, JoinHandle<()>>> {
        self.tasks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// 以 tokio task + `tokio::time::sleep` 實作的計時器
#[derive(Clone)]
pub struct TokioScheduler {
    runtime: Handle,
    timers: Arc<TokioTimers>,
}

impl TokioScheduler {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            timers: Arc::new(TokioTimers::default()),
        }
    }

    /// 使用目前所在的 tokio runtime
    pub fn current() -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| {
            HelperError::invalid_argument(format!("no tokio runtime available: {}", e))
        })?;
        Ok(Self::new(runtime))
    }

    pub fn pending_count(&self) -> usize {
        self.timers.tasks().len()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle {
        let id = self.timers.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let timers = Arc::clone(&self.timers);

        // 持有鎖直到 JoinHandle 登記完成，避免 task 搶先查表
        let mut tasks = self.timers.tasks();
        let join = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let still_scheduled = timers.tasks().remove(&id).is_some();
            if still_scheduled {
                task();
            }
        });
        tasks.insert(id, join);

        TimerHandle::new(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        if let Some(join) = self.timers.tasks().remove(&handle.id()) {
            join.abort();
            tracing::trace!("TokioScheduler: aborted timer {}", handle.id());
        }
    }

    fn is_scheduled(&self, handle: TimerHandle) -> bool {
        self.timers.tasks().contains_key(&handle.id())
    }
}
