//! The dashboard session object.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use incident_watch_alerts::AlertEngine;
use incident_watch_alerts::clock::Clock;
use incident_watch_alerts::effects::{Effects, ToastKind};
use incident_watch_alerts::feed::NotificationFeed;
use incident_watch_alerts::hooks::{RenderHooks, isolate};
use incident_watch_alerts::ids::IdGenerator;
use incident_watch_catalog::search;
use incident_watch_catalog_models::{Catalog, SearchResults};
use incident_watch_dashboard_models::{
    DashboardStats, NewVisit, Note, NoteFields, ScheduledVisit, VisitDraft,
};
use incident_watch_incident_models::{Incident, Notification};

use crate::config::Config;
use crate::loader::{DataLoader, LoadError, Snapshot, load_with_timeout};
use crate::records::{RecordError, RecordStore, visit_draft_from_business};
use crate::store::DataStore;

/// A dashboard shared between request handlers and timers.
pub type SharedDashboard = Arc<Mutex<Dashboard>>;

/// Errors that stop a dashboard from coming up.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// The initial data load failed; no partial dashboard is built.
    #[error("Initial data load failed: {0}")]
    Load(#[from] LoadError),
}

/// Injected collaborators of a dashboard session.
#[derive(Clone)]
pub struct Collaborators {
    /// Time source.
    pub clock: Arc<dyn Clock>,
    /// Sound and toast side effects.
    pub effects: Arc<dyn Effects>,
    /// Presentation callbacks.
    pub hooks: Arc<dyn RenderHooks>,
    /// Identifier source for scheduled visits.
    pub visit_ids: Arc<dyn IdGenerator>,
    /// Identifier source for notes.
    pub note_ids: Arc<dyn IdGenerator>,
}

/// One dashboard session: data store, alert engine, and the latest stats.
pub struct Dashboard {
    store: DataStore,
    engine: AlertEngine,
    stats: DashboardStats,
    clock: Arc<dyn Clock>,
    effects: Arc<dyn Effects>,
    hooks: Arc<dyn RenderHooks>,
}

impl Dashboard {
    /// Loads the initial data and brings the session up.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Load`] if the load fails or times out. An
    /// error toast is shown and nothing else is initialized.
    pub async fn initialize(
        config: Config,
        loader: &dyn DataLoader,
        load_timeout: Duration,
        deps: Collaborators,
    ) -> Result<Self, DashboardError> {
        log::info!("Loading dashboard data...");
        let snapshot = match load_with_timeout(loader, load_timeout).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::error!("Error initializing dashboard: {e}");
                deps.effects
                    .show_toast(ToastKind::Error, "Failed to load the system");
                return Err(e.into());
            }
        };

        let dashboard = Self::from_snapshot(config, snapshot, deps);
        dashboard.effects.show_toast(
            ToastKind::Success,
            "Incident intelligence loaded. Monitoring the whole province",
        );
        Ok(dashboard)
    }

    /// Builds a session from an already loaded snapshot.
    #[must_use]
    pub fn from_snapshot(config: Config, snapshot: Snapshot, deps: Collaborators) -> Self {
        let records = RecordStore::new(
            deps.visit_ids,
            deps.note_ids,
            Arc::clone(&deps.clock),
        );
        let engine = AlertEngine::new(
            config.sound_enabled,
            Arc::clone(&deps.clock),
            Arc::clone(&deps.effects),
            Arc::clone(&deps.hooks),
        );
        let store = DataStore::new(config, snapshot, records);
        let stats = store.stats(deps.clock.now());

        log::info!(
            "Dashboard ready: {} municipalities, {} incidents",
            stats.total_municipalities,
            stats.total_incidents
        );
        isolate(deps.hooks.on_stats_changed(&stats));

        Self {
            store,
            engine,
            stats,
            clock: deps.clock,
            effects: deps.effects,
            hooks: deps.hooks,
        }
    }

    /// Wraps the session for sharing with timers and handlers.
    #[must_use]
    pub fn into_shared(self) -> SharedDashboard {
        Arc::new(Mutex::new(self))
    }

    // ── Alerts ──────────────────────────────────────────────────────

    /// Ingests an incident from any source. The incident joins the known
    /// incidents and the stats are recomputed.
    pub fn ingest(&mut self, incident: Incident) -> Notification {
        self.store.record_incident(incident.clone());
        let notification = self.engine.ingest(incident);
        self.refresh_stats();
        notification
    }

    /// Marks every notification as read.
    pub fn mark_all_read(&mut self) {
        self.engine.mark_all_read();
    }

    /// Clears the notification feed.
    pub fn clear_notifications(&mut self) {
        self.engine.clear();
    }

    /// Number of unread notifications.
    #[must_use]
    pub const fn notification_count(&self) -> usize {
        self.engine.count()
    }

    /// The notification feed.
    #[must_use]
    pub const fn feed(&self) -> &NotificationFeed {
        self.engine.feed()
    }

    // ── Stats ───────────────────────────────────────────────────────

    /// Applies a freshly loaded snapshot and recomputes stats.
    pub fn resync(&mut self, snapshot: Snapshot) -> DashboardStats {
        let added = self.store.resync(snapshot);
        if added > 0 {
            log::info!("Resync added {added} incident(s)");
        }
        self.refresh_stats()
    }

    /// Recomputes the aggregate stats and renders them.
    pub fn refresh_stats(&mut self) -> DashboardStats {
        self.stats = self.store.stats(self.clock.now());
        isolate(self.hooks.on_stats_changed(&self.stats));
        self.stats
    }

    /// Stats as of the last recompute.
    #[must_use]
    pub const fn stats(&self) -> DashboardStats {
        self.stats
    }

    // ── Search ──────────────────────────────────────────────────────

    /// Searches the catalog. Blank queries return empty results and do
    /// nothing else.
    pub fn search(&self, query: &str) -> SearchResults {
        if query.trim().is_empty() {
            return SearchResults::default();
        }

        let results = search(self.store.catalog(), query);
        isolate(self.hooks.on_search_results(&results));

        if results.is_empty() {
            self.effects
                .show_toast(ToastKind::Info, "No results found for your search");
        } else {
            self.effects.show_toast(
                ToastKind::Success,
                &format!("Found {} results", results.total()),
            );
        }

        results
    }

    // ── Visits ──────────────────────────────────────────────────────

    /// Books a visit.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] if validation fails; an error toast is shown
    /// and nothing is stored.
    pub fn create_visit(&mut self, fields: NewVisit) -> Result<ScheduledVisit, RecordError> {
        let (records, catalog) = self.store.records_mut();
        let visit = records
            .create_visit(fields, catalog)
            .inspect_err(|e| self.effects.show_toast(ToastKind::Error, &e.to_string()))?;

        self.effects
            .show_toast(ToastKind::Success, "Visit scheduled successfully");
        isolate(self.hooks.on_visit_saved(&visit));
        self.refresh_stats();

        Ok(visit)
    }

    /// Marks a visit as completed.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] if the visit is unknown or already closed.
    pub fn complete_visit(&mut self, id: i64) -> Result<ScheduledVisit, RecordError> {
        let (records, _) = self.store.records_mut();
        let visit = records.complete_visit(id)?;
        self.visit_changed(&visit);
        Ok(visit)
    }

    /// Cancels a visit.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] if the visit is unknown or already closed.
    pub fn cancel_visit(&mut self, id: i64) -> Result<ScheduledVisit, RecordError> {
        let (records, _) = self.store.records_mut();
        let visit = records.cancel_visit(id)?;
        self.visit_changed(&visit);
        Ok(visit)
    }

    fn visit_changed(&mut self, visit: &ScheduledVisit) {
        isolate(self.hooks.on_visit_saved(visit));
        self.refresh_stats();
    }

    /// Visits in booking order.
    #[must_use]
    pub fn visits(&self) -> &[ScheduledVisit] {
        self.store.records().visits()
    }

    /// Pre-fills a visit form from a new-business lead.
    #[must_use]
    pub fn visit_draft_from_business(&self, business_id: u32) -> Option<VisitDraft> {
        visit_draft_from_business(self.store.catalog(), business_id)
    }

    // ── Notes ───────────────────────────────────────────────────────

    /// Saves a new note.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::EmptyTitle`] for a blank title; an error
    /// toast is shown and nothing is stored.
    pub fn create_note(&mut self, fields: NoteFields) -> Result<Note, RecordError> {
        let (records, _) = self.store.records_mut();
        let note = records
            .create_note(fields)
            .inspect_err(|e| self.effects.show_toast(ToastKind::Error, &e.to_string()))?;

        isolate(self.hooks.on_note_saved(&note));
        self.effects
            .show_toast(ToastKind::Success, "Note saved successfully");
        Ok(note)
    }

    /// Updates an existing note.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] for a blank title or unknown id.
    pub fn update_note(&mut self, id: i64, fields: NoteFields) -> Result<Note, RecordError> {
        let (records, _) = self.store.records_mut();
        let note = records
            .update_note(id, fields)
            .inspect_err(|e| self.effects.show_toast(ToastKind::Error, &e.to_string()))?;

        isolate(self.hooks.on_note_saved(&note));
        self.effects
            .show_toast(ToastKind::Success, "Note updated successfully");
        Ok(note)
    }

    /// Looks up a note for editing.
    #[must_use]
    pub fn note(&self, id: i64) -> Option<&Note> {
        self.store.records().note(id)
    }

    /// Notes in creation order.
    #[must_use]
    pub fn notes(&self) -> &[Note] {
        self.store.records().notes()
    }

    // ── Accessors ───────────────────────────────────────────────────

    /// Session configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        self.store.config()
    }

    /// Reference data.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        self.store.catalog()
    }

    /// Known incidents, oldest first.
    #[must_use]
    pub fn incidents(&self) -> &[Incident] {
        self.store.incidents()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{DateTime, Duration as ChronoDuration, NaiveTime, TimeZone as _, Utc};
    use incident_watch_alerts::clock::ManualClock;
    use incident_watch_alerts::effects::EffectError;
    use incident_watch_alerts::hooks::HookResult;
    use incident_watch_alerts::ids::SequentialIds;
    use incident_watch_alerts::source::{IncidentSource, RandomIncidentSource};
    use incident_watch_dashboard_models::NoteCategory;

    use crate::loader::EmbeddedLoader;

    use super::*;

    #[derive(Default)]
    struct RecordingEffects {
        toasts: Mutex<Vec<(ToastKind, String)>>,
    }

    impl RecordingEffects {
        fn last(&self) -> Option<(ToastKind, String)> {
            self.toasts.lock().unwrap().last().cloned()
        }
    }

    impl Effects for RecordingEffects {
        fn play_alert_sound(&self) -> Result<(), EffectError> {
            Ok(())
        }

        fn show_toast(&self, kind: ToastKind, message: &str) {
            self.toasts.lock().unwrap().push((kind, message.to_string()));
        }
    }

    #[derive(Default)]
    struct RecordingHooks {
        stats: Mutex<Vec<DashboardStats>>,
        searches: Mutex<usize>,
        notes: Mutex<Vec<i64>>,
        visits: Mutex<Vec<i64>>,
    }

    impl RenderHooks for RecordingHooks {
        fn on_stats_changed(&self, stats: &DashboardStats) -> HookResult {
            self.stats.lock().unwrap().push(*stats);
            Ok(())
        }

        fn on_search_results(&self, _results: &SearchResults) -> HookResult {
            *self.searches.lock().unwrap() += 1;
            Ok(())
        }

        fn on_visit_saved(&self, visit: &ScheduledVisit) -> HookResult {
            self.visits.lock().unwrap().push(visit.id);
            Ok(())
        }

        fn on_note_saved(&self, note: &Note) -> HookResult {
            self.notes.lock().unwrap().push(note.id);
            Ok(())
        }
    }

    struct FailingLoader;

    #[async_trait]
    impl DataLoader for FailingLoader {
        async fn load(&self) -> Result<Snapshot, LoadError> {
            Err(LoadError::Unavailable {
                message: "offline".to_string(),
            })
        }
    }

    struct Fixture {
        clock: Arc<ManualClock>,
        effects: Arc<RecordingEffects>,
        hooks: Arc<RecordingHooks>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                clock: Arc::new(ManualClock::new(
                    Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap(),
                )),
                effects: Arc::new(RecordingEffects::default()),
                hooks: Arc::new(RecordingHooks::default()),
            }
        }

        fn deps(&self) -> Collaborators {
            Collaborators {
                clock: self.clock.clone(),
                effects: self.effects.clone(),
                hooks: self.hooks.clone(),
                visit_ids: Arc::new(SequentialIds::default()),
                note_ids: Arc::new(SequentialIds::default()),
            }
        }

        async fn dashboard(&self) -> Dashboard {
            let loader = EmbeddedLoader::with_latency(self.clock.clone(), Duration::ZERO);
            Dashboard::initialize(
                Config::default(),
                &loader,
                Duration::from_secs(1),
                self.deps(),
            )
            .await
            .unwrap()
        }

        fn now(&self) -> DateTime<Utc> {
            self.clock.now()
        }
    }

    fn visit(date: chrono::NaiveDate) -> NewVisit {
        NewVisit {
            client: "Restaurante La Alhambra".to_string(),
            municipality_id: 1,
            date,
            time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            address: "C/ Reyes Católicos, 24".to_string(),
            reason: "Survey".to_string(),
            notes: String::new(),
        }
    }

    #[tokio::test]
    async fn initialize_computes_stats_and_welcomes() {
        let fx = Fixture::new();
        let dashboard = fx.dashboard().await;

        assert_eq!(dashboard.stats().total_municipalities, 7);
        assert_eq!(dashboard.stats().total_incidents, 2);
        assert_eq!(fx.hooks.stats.lock().unwrap().len(), 1);
        assert_eq!(fx.effects.last().unwrap().0, ToastKind::Success);
    }

    #[tokio::test]
    async fn failed_load_halts_initialization() {
        let fx = Fixture::new();
        let result = Dashboard::initialize(
            Config::default(),
            &FailingLoader,
            Duration::from_secs(1),
            fx.deps(),
        )
        .await;

        assert!(matches!(result, Err(DashboardError::Load(_))));
        assert_eq!(
            fx.effects.last(),
            Some((ToastKind::Error, "Failed to load the system".to_string()))
        );
        assert!(fx.hooks.stats.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn ingest_feeds_notifications_and_incident_list() {
        let fx = Fixture::new();
        let mut dashboard = fx.dashboard().await;
        let mut source = RandomIncidentSource::new(
            Arc::new(SequentialIds::starting_at(1_000)),
            fx.clock.clone(),
        );

        for _ in 0..3 {
            dashboard.ingest(source.next_incident());
        }

        assert_eq!(dashboard.notification_count(), 3);
        assert_eq!(dashboard.incidents().len(), 5);

        dashboard.mark_all_read();
        dashboard.ingest(source.next_incident());
        assert_eq!(dashboard.notification_count(), 1);

        dashboard.clear_notifications();
        assert_eq!(dashboard.notification_count(), 0);
        assert!(dashboard.feed().is_empty());
        assert_eq!(dashboard.refresh_stats().total_incidents, 6);
    }

    #[tokio::test]
    async fn search_reports_through_hook_and_toast() {
        let fx = Fixture::new();
        let dashboard = fx.dashboard().await;

        let results = dashboard.search("lucena");
        assert_eq!(results.municipalities[0].name, "Lucena");
        assert_eq!(
            fx.effects.last(),
            Some((ToastKind::Success, "Found 1 results".to_string()))
        );

        dashboard.search("atlantis");
        assert_eq!(fx.effects.last().unwrap().0, ToastKind::Info);
        assert_eq!(*fx.hooks.searches.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn blank_search_does_nothing() {
        let fx = Fixture::new();
        let dashboard = fx.dashboard().await;
        let toasts_before = fx.effects.toasts.lock().unwrap().len();

        assert!(dashboard.search("  ").is_empty());
        assert_eq!(*fx.hooks.searches.lock().unwrap(), 0);
        assert_eq!(fx.effects.toasts.lock().unwrap().len(), toasts_before);
    }

    #[tokio::test]
    async fn empty_note_title_surfaces_error_and_persists_nothing() {
        let fx = Fixture::new();
        let mut dashboard = fx.dashboard().await;

        let result = dashboard.create_note(NoteFields::default());

        assert_eq!(result, Err(RecordError::EmptyTitle));
        assert!(dashboard.notes().is_empty());
        assert!(fx.hooks.notes.lock().unwrap().is_empty());
        assert_eq!(
            fx.effects.last(),
            Some((ToastKind::Error, "Title is required".to_string()))
        );
    }

    #[tokio::test]
    async fn note_create_and_update_render() {
        let fx = Fixture::new();
        let mut dashboard = fx.dashboard().await;

        let note = dashboard
            .create_note(NoteFields {
                title: "x".to_string(),
                content: String::new(),
                category: NoteCategory::General,
            })
            .unwrap();
        assert_eq!(dashboard.notes().len(), 1);
        assert_eq!(dashboard.note(note.id).unwrap().created_at, fx.now());

        dashboard
            .update_note(
                note.id,
                NoteFields {
                    title: "y".to_string(),
                    ..NoteFields::default()
                },
            )
            .unwrap();
        assert_eq!(*fx.hooks.notes.lock().unwrap(), [note.id, note.id]);
        assert_eq!(dashboard.note(note.id).unwrap().title, "y");
    }

    #[tokio::test]
    async fn visits_update_stats() {
        let fx = Fixture::new();
        let mut dashboard = fx.dashboard().await;
        let tomorrow = (fx.now() + ChronoDuration::days(1)).date_naive();

        let booked = dashboard.create_visit(visit(tomorrow)).unwrap();
        assert_eq!(dashboard.stats().scheduled_visits, 1);
        assert_eq!(*fx.hooks.visits.lock().unwrap(), [booked.id]);

        dashboard.cancel_visit(booked.id).unwrap();
        assert_eq!(dashboard.stats().scheduled_visits, 0);
        assert_eq!(dashboard.visits().len(), 1);
    }

    #[tokio::test]
    async fn past_visit_is_rejected_with_toast() {
        let fx = Fixture::new();
        let mut dashboard = fx.dashboard().await;
        let yesterday = (fx.now() - ChronoDuration::days(1)).date_naive();

        assert!(matches!(
            dashboard.create_visit(visit(yesterday)),
            Err(RecordError::VisitInPast { .. })
        ));
        assert!(dashboard.visits().is_empty());
        assert_eq!(fx.effects.last().unwrap().0, ToastKind::Error);
    }

    #[tokio::test]
    async fn draft_prefills_from_business() {
        let fx = Fixture::new();
        let dashboard = fx.dashboard().await;
        let draft = dashboard.visit_draft_from_business(1).unwrap();
        assert_eq!(draft.client, "Restaurante La Alhambra");
        assert_eq!(draft.municipality_id, Some(1));
    }
}
