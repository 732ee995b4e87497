#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Offline cache gateway.
//!
//! Runs beside the dashboard and shares nothing with it except two
//! contracts: fetch interception (answer shell assets from a precomputed
//! cache, fall back to the network) and push delivery (turn a JSON payload
//! into an OS-level notification).

pub mod gateway;
pub mod host;
pub mod network;
pub mod push;

pub use gateway::{CacheGateway, GatewayConfig, GatewayState};

/// Errors that can occur in the offline gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// HTTP request to the origin failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A network backend failed without an HTTP error.
    #[error("Network error for {path}: {message}")]
    Network {
        /// Requested path.
        path: String,
        /// Description of what went wrong.
        message: String,
    },

    /// One manifest entry could not be cached, so nothing was.
    #[error("Install failed at {path}: {reason}")]
    InstallFailed {
        /// The manifest entry that failed.
        path: String,
        /// Description of what went wrong.
        reason: String,
    },

    /// The push payload is not a valid `{title, body, url?}` document.
    #[error("Invalid push payload: {0}")]
    InvalidPushPayload(#[from] serde_json::Error),

    /// No displayed notification has this id.
    #[error("Unknown notification {id}")]
    UnknownNotification {
        /// The notification id.
        id: String,
    },

    /// The notification host rejected an operation.
    #[error("Notification host error: {message}")]
    Host {
        /// Description of what went wrong.
        message: String,
    },
}
