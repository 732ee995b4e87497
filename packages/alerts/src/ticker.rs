//! Cancellable fixed-interval task.
//!
//! [`PeriodicTask`] is the lifecycle shared by every timer in the
//! dashboard: at most one timer per task, `start` is a no-op while
//! running, and `stop` cancels the pending tick so nothing fires after
//! teardown. `stop` may be called from inside a tick.
//!
//! Ticks run sequentially. The next interval starts counting only after
//! the previous tick has finished, so slow ticks never pile up.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// A named, restartable periodic timer.
#[derive(Clone)]
pub struct PeriodicTask {
    name: &'static str,
    handle: Arc<Mutex<Option<JoinHandle<()>>>>,
    ticks: Arc<AtomicU64>,
}

impl PeriodicTask {
    /// Creates a stopped task. `name` only appears in log lines.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            handle: Arc::new(Mutex::new(None)),
            ticks: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Starts calling `tick` every `interval`, first after one full
    /// interval has elapsed.
    ///
    /// Returns `false` without doing anything if the task is already
    /// running. Must be called from within a tokio runtime.
    pub fn start<F, Fut>(&self, interval: Duration, mut tick: F) -> bool
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut handle = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
        if handle.as_ref().is_some_and(|h| !h.is_finished()) {
            log::debug!("{} already running, ignoring start", self.name);
            return false;
        }

        let interval = interval.max(Duration::from_millis(1));
        let first = Instant::now() + interval;
        let ticks = Arc::clone(&self.ticks);
        let name = self.name;

        log::info!("Starting {name} every {interval:?}");
        *handle = Some(tokio::spawn(async move {
            let mut timer = tokio::time::interval_at(first, interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                timer.tick().await;
                ticks.fetch_add(1, Ordering::Relaxed);
                log::trace!("{name} tick");
                tick().await;
            }
        }));
        drop(handle);

        true
    }

    /// Cancels the timer. Safe to call when stopped and from inside a
    /// tick; returns `true` if a running timer was cancelled.
    pub fn stop(&self) -> bool {
        let handle = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match handle {
            Some(handle) => {
                handle.abort();
                log::info!("Stopped {}", self.name);
                true
            }
            None => false,
        }
    }

    /// Returns `true` while a timer is scheduled.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    /// Number of ticks fired since creation.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_millis(100);

    #[tokio::test(start_paused = true)]
    async fn fires_once_per_interval() {
        let task = PeriodicTask::new("test");
        assert!(task.start(PERIOD, || async {}));

        tokio::time::sleep(Duration::from_millis(1050)).await;

        assert_eq!(task.tick_count(), 10);
        task.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn double_start_keeps_a_single_timer() {
        let task = PeriodicTask::new("test");
        assert!(task.start(PERIOD, || async {}));
        assert!(!task.start(PERIOD, || async {}));

        tokio::time::sleep(Duration::from_millis(1050)).await;

        assert_eq!(task.tick_count(), 10);
        task.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_pending_ticks() {
        let task = PeriodicTask::new("test");
        task.start(PERIOD, || async {});
        tokio::time::sleep(Duration::from_millis(350)).await;

        assert!(task.stop());
        assert!(!task.is_running());
        let fired = task.tick_count();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(task.tick_count(), fired);
        assert!(!task.stop());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_from_inside_a_tick() {
        let task = PeriodicTask::new("test");
        let inner = task.clone();
        task.start(PERIOD, move || {
            let inner = inner.clone();
            async move {
                inner.stop();
            }
        });

        tokio::time::sleep(Duration::from_secs(2)).await;

        assert_eq!(task.tick_count(), 1);
        assert!(!task.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_after_stop() {
        let task = PeriodicTask::new("test");
        task.start(PERIOD, || async {});
        tokio::time::sleep(Duration::from_millis(250)).await;
        task.stop();
        assert_eq!(task.tick_count(), 2);

        assert!(task.start(PERIOD, || async {}));
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(task.tick_count(), 4);
        task.stop();
    }
}
