//! Periodic stats refresh.

use std::sync::{Arc, PoisonError};
use std::time::Duration;

use incident_watch_alerts::ticker::PeriodicTask;

use crate::loader::{DataLoader, load_with_timeout};
use crate::session::SharedDashboard;

/// Reloads dashboard data on a fixed interval and re-renders the stats.
pub struct RefreshScheduler {
    dashboard: SharedDashboard,
    loader: Arc<dyn DataLoader>,
    load_timeout: Duration,
    task: PeriodicTask,
}

impl RefreshScheduler {
    /// Creates a stopped scheduler.
    #[must_use]
    pub fn new(
        dashboard: SharedDashboard,
        loader: Arc<dyn DataLoader>,
        load_timeout: Duration,
    ) -> Self {
        Self {
            dashboard,
            loader,
            load_timeout,
            task: PeriodicTask::new("stats refresh"),
        }
    }

    /// Starts refreshing every `interval`.
    ///
    /// Returns `false` if auto refresh is disabled in the config or the
    /// scheduler is already running. At most one timer exists at a time.
    pub fn start(&self, interval: Duration) -> bool {
        let enabled = self
            .dashboard
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .config()
            .auto_refresh;
        if !enabled {
            log::debug!("Auto refresh disabled");
            return false;
        }

        let dashboard = Arc::clone(&self.dashboard);
        let loader = Arc::clone(&self.loader);
        let load_timeout = self.load_timeout;
        self.task.start(interval, move || {
            let dashboard = Arc::clone(&dashboard);
            let loader = Arc::clone(&loader);
            async move { refresh(&dashboard, loader.as_ref(), load_timeout).await }
        })
    }

    /// Cancels the timer. Returns `false` if it wasn't running.
    pub fn stop(&self) -> bool {
        self.task.stop()
    }

    /// Runs one refresh immediately.
    pub async fn tick(&self) {
        refresh(&self.dashboard, self.loader.as_ref(), self.load_timeout).await;
    }

    /// Returns `true` while the timer is scheduled.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.is_running()
    }

    /// Number of timer-driven refreshes so far.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.task.tick_count()
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.task.stop();
    }
}

async fn refresh(dashboard: &SharedDashboard, loader: &dyn DataLoader, load_timeout: Duration) {
    match load_with_timeout(loader, load_timeout).await {
        Ok(snapshot) => {
            let stats = dashboard
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .resync(snapshot);
            log::debug!(
                "Refreshed stats: {} incidents, {} scheduled visits",
                stats.total_incidents,
                stats.scheduled_visits
            );
        }
        Err(e) => {
            log::error!("Stats refresh failed: {e}");
        }
    }
}
