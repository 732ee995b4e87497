//! Render hooks consumed by the presentation layer.
//!
//! The core calls these after each mutating operation. A failing hook is
//! logged by the caller and never propagated; rendering problems must not
//! interrupt the pipeline.

use incident_watch_catalog_models::SearchResults;
use incident_watch_dashboard_models::{DashboardStats, Note, ScheduledVisit};

use crate::feed::NotificationFeed;

/// Failure inside a render hook.
#[derive(Debug, thiserror::Error)]
#[error("Render hook {hook} failed: {message}")]
pub struct HookError {
    /// Name of the hook that failed.
    pub hook: &'static str,
    /// Description of what went wrong.
    pub message: String,
}

/// Result type returned by every hook.
pub type HookResult = Result<(), HookError>;

/// Callbacks into the presentation layer.
///
/// All methods default to no-ops so implementors only override what they
/// render.
pub trait RenderHooks: Send + Sync {
    /// The notification feed changed (insert, eviction, read, clear).
    ///
    /// # Errors
    ///
    /// Returns [`HookError`] if rendering fails.
    fn on_notifications_changed(&self, _feed: &NotificationFeed) -> HookResult {
        Ok(())
    }

    /// Aggregate statistics were recomputed.
    ///
    /// # Errors
    ///
    /// Returns [`HookError`] if rendering fails.
    fn on_stats_changed(&self, _stats: &DashboardStats) -> HookResult {
        Ok(())
    }

    /// A search completed.
    ///
    /// # Errors
    ///
    /// Returns [`HookError`] if rendering fails.
    fn on_search_results(&self, _results: &SearchResults) -> HookResult {
        Ok(())
    }

    /// A visit was booked or changed status.
    ///
    /// # Errors
    ///
    /// Returns [`HookError`] if rendering fails.
    fn on_visit_saved(&self, _visit: &ScheduledVisit) -> HookResult {
        Ok(())
    }

    /// A note was created or updated.
    ///
    /// # Errors
    ///
    /// Returns [`HookError`] if rendering fails.
    fn on_note_saved(&self, _note: &Note) -> HookResult {
        Ok(())
    }
}

/// [`RenderHooks`] that renders nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRender;

impl RenderHooks for NoRender {}

/// Logs a hook failure instead of propagating it.
pub fn isolate(result: HookResult) {
    if let Err(e) = result {
        log::warn!("{e}");
    }
}
