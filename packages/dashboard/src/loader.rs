//! Data loading boundary.
//!
//! Both the initial load and every periodic resync go through a
//! [`DataLoader`]. Calls are wrapped in [`load_with_timeout`] so a stuck
//! loader resolves as [`LoadError::Timeout`] instead of hanging the
//! session.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use incident_watch_alerts::clock::Clock;
use incident_watch_catalog::{embedded_catalog, seed_incidents};
use incident_watch_catalog_models::Catalog;
use incident_watch_incident_models::Incident;

/// Upper bound on a single load.
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Latency of the embedded loader, mimicking a network round trip.
pub const EMBEDDED_LOAD_LATENCY: Duration = Duration::from_millis(500);

/// Errors that can occur while loading dashboard data.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The loader didn't answer in time.
    #[error("Data load timed out after {0:?}")]
    Timeout(Duration),

    /// The data source is unavailable.
    #[error("Data unavailable: {message}")]
    Unavailable {
        /// Description of what went wrong.
        message: String,
    },
}

/// Everything a load produces.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Reference data.
    pub catalog: Catalog,
    /// Currently known incidents.
    pub incidents: Vec<Incident>,
}

/// Source of dashboard data.
#[async_trait]
pub trait DataLoader: Send + Sync {
    /// Loads a fresh snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the data cannot be loaded.
    async fn load(&self) -> Result<Snapshot, LoadError>;
}

/// Loads the catalog and seed alerts embedded in the binary.
pub struct EmbeddedLoader {
    clock: Arc<dyn Clock>,
    latency: Duration,
}

impl EmbeddedLoader {
    /// Creates a loader answering after [`EMBEDDED_LOAD_LATENCY`].
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_latency(clock, EMBEDDED_LOAD_LATENCY)
    }

    /// Creates a loader answering after `latency`.
    #[must_use]
    pub fn with_latency(clock: Arc<dyn Clock>, latency: Duration) -> Self {
        Self { clock, latency }
    }
}

#[async_trait]
impl DataLoader for EmbeddedLoader {
    async fn load(&self) -> Result<Snapshot, LoadError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(Snapshot {
            catalog: embedded_catalog(),
            incidents: seed_incidents(self.clock.now()),
        })
    }
}

/// Runs `loader` with an upper bound of `timeout`.
///
/// Resolves exactly once: with the snapshot, the loader's error, or
/// [`LoadError::Timeout`].
///
/// # Errors
///
/// Returns [`LoadError`] if the loader fails or exceeds `timeout`.
pub async fn load_with_timeout(
    loader: &dyn DataLoader,
    timeout: Duration,
) -> Result<Snapshot, LoadError> {
    tokio::time::timeout(timeout, loader.load())
        .await
        .map_err(|_| LoadError::Timeout(timeout))?
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use incident_watch_alerts::clock::ManualClock;

    use super::*;

    struct StuckLoader;

    #[async_trait]
    impl DataLoader for StuckLoader {
        async fn load(&self) -> Result<Snapshot, LoadError> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn embedded_loader_returns_catalog_and_seed_alerts() {
        let loader = EmbeddedLoader::new(Arc::new(ManualClock::new(DateTime::<Utc>::UNIX_EPOCH)));
        let snapshot = load_with_timeout(&loader, DEFAULT_LOAD_TIMEOUT).await.unwrap();
        assert_eq!(snapshot.catalog.municipalities.len(), 7);
        assert_eq!(snapshot.incidents.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn stuck_loader_times_out() {
        let result = load_with_timeout(&StuckLoader, Duration::from_secs(3)).await;
        assert!(matches!(result, Err(LoadError::Timeout(d)) if d == Duration::from_secs(3)));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_loader_times_out() {
        let loader = EmbeddedLoader::with_latency(
            Arc::new(ManualClock::new(DateTime::<Utc>::UNIX_EPOCH)),
            Duration::from_secs(30),
        );
        assert!(matches!(
            load_with_timeout(&loader, DEFAULT_LOAD_TIMEOUT).await,
            Err(LoadError::Timeout(_))
        ));
    }
}
