//! Bounded, newest-first list of notifications with an unread counter.

use std::collections::VecDeque;

use incident_watch_incident_models::Notification;

/// Maximum number of notifications kept in the feed.
pub const FEED_CAPACITY: usize = 50;

/// Most-recent-first notification list.
///
/// Invariants:
/// - `len() <= capacity`
/// - `count()` equals the number of entries with `read == false`
#[derive(Debug, Clone)]
pub struct NotificationFeed {
    entries: VecDeque<Notification>,
    unread: usize,
    capacity: usize,
}

impl Default for NotificationFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationFeed {
    /// Creates an empty feed holding at most [`FEED_CAPACITY`] entries.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(FEED_CAPACITY)
    }

    /// Creates an empty feed with a custom bound.
    ///
    /// A `capacity` of zero is raised to one; the newest notification is
    /// always kept.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            unread: 0,
            capacity,
        }
    }

    /// Inserts `notification` at the front, evicting the oldest entry if
    /// the feed is full. Returns the evicted entry.
    pub fn add(&mut self, notification: Notification) -> Option<Notification> {
        if !notification.read {
            self.unread += 1;
        }
        self.entries.push_front(notification);

        if self.entries.len() <= self.capacity {
            return None;
        }

        let evicted = self.entries.pop_back()?;
        if !evicted.read {
            self.unread -= 1;
        }
        Some(evicted)
    }

    /// Marks every current entry as read. Later insertions are unaffected.
    ///
    /// Returns how many entries changed state.
    pub fn mark_all_read(&mut self) -> usize {
        let changed = self.unread;
        for entry in &mut self.entries {
            entry.read = true;
        }
        self.unread = 0;
        changed
    }

    /// Removes every entry and resets the unread counter.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.unread = 0;
    }

    /// Number of unread entries.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.unread
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the feed has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    /// Unread entries, newest first.
    pub fn unread(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter().filter(|n| !n.read)
    }

    /// Copies the entries out, newest first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Notification> {
        self.entries.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use incident_watch_incident_models::{Incident, IncidentKind, Location};

    use super::*;

    fn notification(id: i64) -> Notification {
        let kind = IncidentKind::Theft;
        Notification::new(
            Incident {
                id,
                kind,
                location: Location {
                    municipality: "Montilla".to_string(),
                    zone: "Centro".to_string(),
                },
                address: "Calle Ejemplo, 123".to_string(),
                description: "Theft reported".to_string(),
                occurred_at: DateTime::<Utc>::UNIX_EPOCH,
                severity: kind.default_severity(),
                confirmed: true,
            },
            DateTime::<Utc>::UNIX_EPOCH,
        )
    }

    fn assert_counter_consistent(feed: &NotificationFeed) {
        assert_eq!(feed.count(), feed.unread().count());
    }

    #[test]
    fn newest_entry_is_first() {
        let mut feed = NotificationFeed::new();
        feed.add(notification(1));
        feed.add(notification(2));
        let ids: Vec<i64> = feed.iter().map(Notification::id).collect();
        assert_eq!(ids, [2, 1]);
    }

    #[test]
    fn never_exceeds_capacity_and_evicts_oldest() {
        let mut feed = NotificationFeed::new();
        for id in 1..=120 {
            let evicted = feed.add(notification(id));
            assert!(feed.len() <= FEED_CAPACITY);
            assert_counter_consistent(&feed);
            if id > 50 {
                assert_eq!(evicted.map(|n| n.id()), Some(id - 50));
            } else {
                assert!(evicted.is_none());
            }
        }
        assert_eq!(feed.len(), FEED_CAPACITY);
        assert_eq!(feed.iter().next().map(Notification::id), Some(120));
        assert_eq!(feed.iter().last().map(Notification::id), Some(71));
    }

    #[test]
    fn evicting_read_entries_keeps_counter_in_sync() {
        let mut feed = NotificationFeed::with_capacity(3);
        for id in 1..=3 {
            feed.add(notification(id));
        }
        feed.mark_all_read();
        for id in 4..=5 {
            feed.add(notification(id));
            assert_counter_consistent(&feed);
        }
        assert_eq!(feed.count(), 2);
        assert_eq!(feed.len(), 3);
    }

    #[test]
    fn mark_all_read_then_add_leaves_one_unread() {
        let mut feed = NotificationFeed::new();
        for id in 1..=10 {
            feed.add(notification(id));
        }
        assert_eq!(feed.mark_all_read(), 10);
        feed.add(notification(11));

        assert_eq!(feed.count(), 1);
        let unread: Vec<i64> = feed.unread().map(Notification::id).collect();
        assert_eq!(unread, [11]);
    }

    #[test]
    fn clear_resets_everything() {
        let mut feed = NotificationFeed::new();
        feed.clear();
        assert!(feed.is_empty());
        assert_eq!(feed.count(), 0);

        for id in 1..=60 {
            feed.add(notification(id));
        }
        feed.mark_all_read();
        feed.add(notification(61));
        feed.clear();

        assert!(feed.is_empty());
        assert_eq!(feed.count(), 0);
    }

    #[test]
    fn zero_capacity_still_keeps_newest() {
        let mut feed = NotificationFeed::with_capacity(0);
        feed.add(notification(1));
        feed.add(notification(2));
        assert_eq!(feed.len(), 1);
        assert_eq!(feed.to_vec()[0].id(), 2);
        assert_counter_consistent(&feed);
    }
}
