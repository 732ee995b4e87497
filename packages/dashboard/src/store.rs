//! Session-wide canonical collections.

use chrono::{DateTime, Utc};
use incident_watch_catalog_models::Catalog;
use incident_watch_dashboard_models::DashboardStats;
use incident_watch_incident_models::Incident;

use crate::config::Config;
use crate::loader::Snapshot;
use crate::records::RecordStore;

/// Holds catalog, incidents, records, and configuration for one session.
pub struct DataStore {
    config: Config,
    catalog: Catalog,
    incidents: Vec<Incident>,
    records: RecordStore,
}

impl DataStore {
    /// Builds a store from the initial snapshot.
    #[must_use]
    pub fn new(config: Config, snapshot: Snapshot, records: RecordStore) -> Self {
        Self {
            config,
            catalog: snapshot.catalog,
            incidents: snapshot.incidents,
            records,
        }
    }

    /// Applies a fresh snapshot: incidents not already known are appended.
    /// The catalog loaded at startup stays in place, so visits keep
    /// pointing at municipalities that exist. Records are untouched.
    ///
    /// Returns the number of new incidents.
    pub fn resync(&mut self, snapshot: Snapshot) -> usize {
        let before = self.incidents.len();
        for incident in snapshot.incidents {
            if !self.incidents.iter().any(|i| i.id == incident.id) {
                self.incidents.push(incident);
            }
        }
        self.incidents.len() - before
    }

    /// Records an incident that arrived through the alert pipeline. An
    /// incident with a known id replaces the earlier one.
    pub fn record_incident(&mut self, incident: Incident) {
        if let Some(existing) = self.incidents.iter_mut().find(|i| i.id == incident.id) {
            *existing = incident;
        } else {
            self.incidents.push(incident);
        }
    }

    /// Derives the aggregate counters.
    #[must_use]
    pub fn stats(&self, updated_at: DateTime<Utc>) -> DashboardStats {
        DashboardStats {
            total_municipalities: self.catalog.municipalities.len(),
            total_incidents: self.incidents.len(),
            scheduled_visits: self.records.scheduled_visit_count(),
            new_businesses: self.catalog.new_businesses.len(),
            updated_at,
        }
    }

    /// Session configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Reference data.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Known incidents, oldest first.
    #[must_use]
    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    /// Visits and notes.
    #[must_use]
    pub const fn records(&self) -> &RecordStore {
        &self.records
    }

    /// Splits the store into the record store and the catalog it
    /// validates against.
    pub fn records_mut(&mut self) -> (&mut RecordStore, &Catalog) {
        (&mut self.records, &self.catalog)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use incident_watch_alerts::clock::ManualClock;
    use incident_watch_alerts::ids::SequentialIds;
    use incident_watch_catalog::{embedded_catalog, seed_incidents};

    use super::*;

    fn snapshot(now: DateTime<Utc>) -> Snapshot {
        Snapshot {
            catalog: embedded_catalog(),
            incidents: seed_incidents(now),
        }
    }

    fn store(now: DateTime<Utc>) -> DataStore {
        DataStore::new(
            Config::default(),
            snapshot(now),
            RecordStore::new(
                Arc::new(SequentialIds::default()),
                Arc::new(SequentialIds::default()),
                Arc::new(ManualClock::new(now)),
            ),
        )
    }

    #[test]
    fn stats_reflect_collections() {
        let now = Utc::now();
        let stats = store(now).stats(now);
        assert_eq!(stats.total_municipalities, 7);
        assert_eq!(stats.total_incidents, 2);
        assert_eq!(stats.scheduled_visits, 0);
        assert_eq!(stats.new_businesses, 2);
        assert_eq!(stats.updated_at, now);
    }

    #[test]
    fn resync_does_not_duplicate_known_incidents() {
        let now = Utc::now();
        let mut store = store(now);
        let mut live = seed_incidents(now).remove(0);
        live.id = 500;
        store.record_incident(live);

        assert_eq!(store.resync(snapshot(now)), 0);
        assert_eq!(store.incidents().len(), 3);
    }

    #[test]
    fn resync_keeps_the_startup_catalog() {
        let now = Utc::now();
        let mut store = store(now);
        let mut shrunk = snapshot(now);
        shrunk.catalog.municipalities.truncate(1);
        shrunk.catalog.new_businesses.clear();

        store.resync(shrunk);

        assert_eq!(store.catalog().municipalities.len(), 7);
        assert_eq!(store.stats(now).new_businesses, 2);
    }

    #[test]
    fn record_incident_replaces_same_id() {
        let now = Utc::now();
        let mut store = store(now);
        let mut changed = store.incidents()[0].clone();
        changed.confirmed = false;
        store.record_incident(changed);

        assert_eq!(store.incidents().len(), 2);
        assert!(!store.incidents()[0].confirmed);
    }
}
