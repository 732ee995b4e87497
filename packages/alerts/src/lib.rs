#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Alert pipeline for the incident dashboard.
//!
//! Incidents arrive from an [`IncidentSource`](source::IncidentSource)
//! (a simulated generator or a real push transport), pass through the
//! [`AlertEngine`](engine::AlertEngine), and land in the bounded
//! [`NotificationFeed`](feed::NotificationFeed). Everything the engine
//! does outside its own state goes through two injected seams:
//! [`Effects`](effects::Effects) for sound and toasts, and
//! [`RenderHooks`](hooks::RenderHooks) for the UI layer.

pub mod clock;
pub mod effects;
pub mod engine;
pub mod feed;
pub mod hooks;
pub mod ids;
pub mod simulator;
pub mod source;
pub mod ticker;

pub use engine::AlertEngine;
pub use feed::{FEED_CAPACITY, NotificationFeed};
