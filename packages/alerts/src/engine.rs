//! Turns incoming incidents into feed notifications.

use std::sync::Arc;

use incident_watch_incident_models::{Incident, Notification};

use crate::clock::Clock;
use crate::effects::Effects;
use crate::feed::NotificationFeed;
use crate::hooks::{RenderHooks, isolate};

/// Alert ingestion engine.
///
/// Owns the [`NotificationFeed`]. Nothing that goes wrong while playing
/// the alert sound or rendering reaches the caller.
pub struct AlertEngine {
    feed: NotificationFeed,
    sound_enabled: bool,
    clock: Arc<dyn Clock>,
    effects: Arc<dyn Effects>,
    hooks: Arc<dyn RenderHooks>,
}

impl AlertEngine {
    /// Creates an engine with an empty feed.
    #[must_use]
    pub fn new(
        sound_enabled: bool,
        clock: Arc<dyn Clock>,
        effects: Arc<dyn Effects>,
        hooks: Arc<dyn RenderHooks>,
    ) -> Self {
        Self::with_feed(NotificationFeed::new(), sound_enabled, clock, effects, hooks)
    }

    /// Creates an engine around an existing feed.
    #[must_use]
    pub fn with_feed(
        feed: NotificationFeed,
        sound_enabled: bool,
        clock: Arc<dyn Clock>,
        effects: Arc<dyn Effects>,
        hooks: Arc<dyn RenderHooks>,
    ) -> Self {
        Self {
            feed,
            sound_enabled,
            clock,
            effects,
            hooks,
        }
    }

    /// Ingests one incident: builds its notification, plays the alert
    /// sound when enabled, inserts it at the head of the feed, and renders.
    pub fn ingest(&mut self, incident: Incident) -> Notification {
        let notification = Notification::new(incident, self.clock.now());
        log::info!(
            "New alert #{}: {} ({})",
            notification.id(),
            notification.title(),
            notification.subtitle()
        );

        if self.sound_enabled {
            if let Err(e) = self.effects.play_alert_sound() {
                log::warn!("Error playing alert sound: {e}");
            }
        }

        if let Some(evicted) = self.feed.add(notification.clone()) {
            log::debug!("Feed full, evicted notification #{}", evicted.id());
        }
        isolate(self.hooks.on_notifications_changed(&self.feed));

        notification
    }

    /// Marks every notification in the feed as read.
    pub fn mark_all_read(&mut self) {
        let changed = self.feed.mark_all_read();
        log::debug!("Marked {changed} notification(s) as read");
        isolate(self.hooks.on_notifications_changed(&self.feed));
    }

    /// Empties the feed.
    pub fn clear(&mut self) {
        self.feed.clear();
        isolate(self.hooks.on_notifications_changed(&self.feed));
    }

    /// Number of unread notifications.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.feed.count()
    }

    /// The notification feed.
    #[must_use]
    pub const fn feed(&self) -> &NotificationFeed {
        &self.feed
    }
}
