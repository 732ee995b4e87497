//! Process-wide dashboard configuration.
//!
//! Read once at startup from an optional TOML file; never mutated
//! afterwards. Missing keys fall back to the defaults below.
//!
//! ```toml
//! sound_enabled = true
//! auto_refresh = true
//! refresh_interval_ms = 300000
//! simulate_alerts = true
//! alert_interval_ms = 30000
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default stats refresh period (5 minutes).
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 300_000;

/// Default period between simulated alerts (30 seconds).
pub const DEFAULT_ALERT_INTERVAL_MS: u64 = 30_000;

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("I/O error reading config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML or has wrong value types.
    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Dashboard configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Play a sound for every new alert.
    pub sound_enabled: bool,
    /// Run the periodic stats refresh.
    pub auto_refresh: bool,
    /// Stats refresh period in milliseconds.
    pub refresh_interval_ms: u64,
    /// Run the alert simulator.
    pub simulate_alerts: bool,
    /// Period between simulated alerts in milliseconds.
    pub alert_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            auto_refresh: true,
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            simulate_alerts: true,
            alert_interval_ms: DEFAULT_ALERT_INTERVAL_MS,
        }
    }
}

impl Config {
    /// Parses a config from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the document is malformed.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::de::from_str(toml_str)?)
    }

    /// Loads the config at `path`, or the defaults when `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file can't be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            log::debug!("No config file given, using defaults");
            return Ok(Self::default());
        };

        log::info!("Loading config from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Stats refresh period.
    #[must_use]
    pub const fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    /// Period between simulated alerts.
    #[must_use]
    pub const fn alert_interval(&self) -> Duration {
        Duration::from_millis(self.alert_interval_ms)
    }
}
