//! Timer-driven alert feed.
//!
//! Stands in for a real push transport: every interval it pulls one
//! incident from an [`IncidentSource`] and hands it to a sink, normally
//! the dashboard's ingest path.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use incident_watch_incident_models::Incident;

use crate::source::IncidentSource;
use crate::ticker::PeriodicTask;

/// Default interval between simulated alerts.
pub const DEFAULT_ALERT_INTERVAL: Duration = Duration::from_secs(30);

/// Receives incidents produced by the simulator.
pub type IncidentSink = Arc<dyn Fn(Incident) + Send + Sync>;

/// Periodically feeds incidents from a source into a sink.
pub struct AlertSimulator {
    source: Arc<Mutex<Box<dyn IncidentSource>>>,
    sink: IncidentSink,
    task: PeriodicTask,
}

impl AlertSimulator {
    /// Creates a stopped simulator.
    #[must_use]
    pub fn new(source: Box<dyn IncidentSource>, sink: IncidentSink) -> Self {
        Self {
            source: Arc::new(Mutex::new(source)),
            sink,
            task: PeriodicTask::new("alert simulator"),
        }
    }

    /// Starts producing one incident per `interval`. No-op if running.
    pub fn start(&self, interval: Duration) -> bool {
        let source = Arc::clone(&self.source);
        let sink = Arc::clone(&self.sink);
        self.task.start(interval, move || {
            let incident = source
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .next_incident();
            sink(incident);
            async {}
        })
    }

    /// Stops producing incidents.
    pub fn stop(&self) -> bool {
        self.task.stop()
    }

    /// Returns `true` while the simulator is scheduled.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.is_running()
    }

    /// Number of incidents produced so far.
    #[must_use]
    pub fn produced(&self) -> u64 {
        self.task.tick_count()
    }
}

impl Drop for AlertSimulator {
    fn drop(&mut self) {
        self.task.stop();
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use crate::clock::ManualClock;
    use crate::ids::SequentialIds;
    use crate::source::RandomIncidentSource;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn produces_one_incident_per_interval() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink_received = Arc::clone(&received);
        let simulator = AlertSimulator::new(
            Box::new(RandomIncidentSource::new(
                Arc::new(SequentialIds::default()),
                Arc::new(ManualClock::new(DateTime::<Utc>::UNIX_EPOCH)),
            )),
            Arc::new(move |incident: Incident| sink_received.lock().unwrap().push(incident.id)),
        );

        simulator.start(DEFAULT_ALERT_INTERVAL);
        simulator.start(DEFAULT_ALERT_INTERVAL);
        tokio::time::sleep(Duration::from_secs(95)).await;

        assert_eq!(*received.lock().unwrap(), [1, 2, 3]);
        assert_eq!(simulator.produced(), 3);

        assert!(simulator.stop());
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(received.lock().unwrap().len(), 3);
    }
}
