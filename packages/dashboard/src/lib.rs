#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard session for the incident watch system.
//!
//! A [`Dashboard`] is an explicit session object: it owns the
//! [`DataStore`](store::DataStore) (catalog, incidents, visits, notes)
//! and the alert engine, and every component receives it by reference
//! instead of reaching for global state. Timers share one session through
//! [`SharedDashboard`].

pub mod config;
pub mod loader;
pub mod records;
pub mod scheduler;
pub mod session;
pub mod store;

pub use config::Config;
pub use session::{Collaborators, Dashboard, DashboardError, SharedDashboard};
