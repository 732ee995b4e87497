//! User-created records: scheduled visits and notes.
//!
//! Records live for the session only. Identifiers come from injected
//! generators, one per record kind. If a generator ever repeats an id the
//! newer record replaces the older one in place.

use std::sync::Arc;

use chrono::NaiveDate;
use incident_watch_alerts::clock::Clock;
use incident_watch_alerts::ids::IdGenerator;
use incident_watch_catalog_models::Catalog;
use incident_watch_dashboard_models::{
    NewVisit, Note, NoteFields, ScheduledVisit, VisitDraft, VisitStatus,
};

/// Validation and lookup failures for record operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// A note was submitted with a blank title.
    #[error("Title is required")]
    EmptyTitle,

    /// A visit was booked for a day that has already passed.
    #[error("Visit date {date} is before today ({today})")]
    VisitInPast {
        /// Requested visit date.
        date: NaiveDate,
        /// Session date at booking time.
        today: NaiveDate,
    },

    /// A visit referenced a municipality that is not in the catalog.
    #[error("Unknown municipality id {id}")]
    UnknownMunicipality {
        /// The unknown id.
        id: u32,
    },

    /// No note exists with the given id.
    #[error("Note {id} not found")]
    NoteNotFound {
        /// The requested id.
        id: i64,
    },

    /// No visit exists with the given id.
    #[error("Visit {id} not found")]
    VisitNotFound {
        /// The requested id.
        id: i64,
    },

    /// The visit is no longer scheduled and can't change status.
    #[error("Visit {id} is already {status}")]
    VisitClosed {
        /// The visit id.
        id: i64,
        /// Its current status.
        status: VisitStatus,
    },
}

/// CRUD store for visits and notes.
pub struct RecordStore {
    visits: Vec<ScheduledVisit>,
    notes: Vec<Note>,
    visit_ids: Arc<dyn IdGenerator>,
    note_ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl RecordStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(
        visit_ids: Arc<dyn IdGenerator>,
        note_ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            visits: Vec::new(),
            notes: Vec::new(),
            visit_ids,
            note_ids,
            clock,
        }
    }

    // ── Visits ──────────────────────────────────────────────────────

    /// Books a visit. The date must not be before today and the
    /// municipality must exist in `catalog`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::VisitInPast`] or
    /// [`RecordError::UnknownMunicipality`]; nothing is stored on error.
    pub fn create_visit(
        &mut self,
        fields: NewVisit,
        catalog: &Catalog,
    ) -> Result<ScheduledVisit, RecordError> {
        let today = self.clock.today();
        if fields.date < today {
            return Err(RecordError::VisitInPast {
                date: fields.date,
                today,
            });
        }
        if catalog.municipality(fields.municipality_id).is_none() {
            return Err(RecordError::UnknownMunicipality {
                id: fields.municipality_id,
            });
        }

        let visit = ScheduledVisit {
            id: self.visit_ids.next_id(),
            client: fields.client,
            municipality_id: fields.municipality_id,
            date: fields.date,
            time: fields.time,
            address: fields.address,
            reason: fields.reason,
            notes: fields.notes,
            status: VisitStatus::Scheduled,
        };
        upsert(&mut self.visits, visit.clone(), |v| v.id);
        log::info!("Scheduled visit #{} with {}", visit.id, visit.client);

        Ok(visit)
    }

    /// Marks a scheduled visit as completed.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::VisitNotFound`] or [`RecordError::VisitClosed`].
    pub fn complete_visit(&mut self, id: i64) -> Result<ScheduledVisit, RecordError> {
        self.close_visit(id, VisitStatus::Completed)
    }

    /// Cancels a scheduled visit.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::VisitNotFound`] or [`RecordError::VisitClosed`].
    pub fn cancel_visit(&mut self, id: i64) -> Result<ScheduledVisit, RecordError> {
        self.close_visit(id, VisitStatus::Cancelled)
    }

    fn close_visit(&mut self, id: i64, to: VisitStatus) -> Result<ScheduledVisit, RecordError> {
        let visit = self
            .visits
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or(RecordError::VisitNotFound { id })?;

        if visit.status != VisitStatus::Scheduled {
            return Err(RecordError::VisitClosed {
                id,
                status: visit.status,
            });
        }

        visit.status = to;
        log::info!("Visit #{id} {to}");
        Ok(visit.clone())
    }

    /// Visits in booking order.
    #[must_use]
    pub fn visits(&self) -> &[ScheduledVisit] {
        &self.visits
    }

    /// Number of visits still in the [`VisitStatus::Scheduled`] state.
    #[must_use]
    pub fn scheduled_visit_count(&self) -> usize {
        self.visits
            .iter()
            .filter(|v| v.status == VisitStatus::Scheduled)
            .count()
    }

    // ── Notes ───────────────────────────────────────────────────────

    /// Saves a new note.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::EmptyTitle`] if the title is blank; nothing
    /// is stored in that case.
    pub fn create_note(&mut self, fields: NoteFields) -> Result<Note, RecordError> {
        validate_title(&fields.title)?;

        let note = Note {
            id: self.note_ids.next_id(),
            title: fields.title,
            content: fields.content,
            category: fields.category,
            created_at: self.clock.now(),
        };
        upsert(&mut self.notes, note.clone(), |n| n.id);
        log::debug!("Saved note #{}", note.id);

        Ok(note)
    }

    /// Replaces the editable fields of an existing note. The id and
    /// creation time are kept.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::EmptyTitle`] or [`RecordError::NoteNotFound`];
    /// the stored note is unchanged on error.
    pub fn update_note(&mut self, id: i64, fields: NoteFields) -> Result<Note, RecordError> {
        validate_title(&fields.title)?;

        let note = self
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(RecordError::NoteNotFound { id })?;

        note.title = fields.title;
        note.content = fields.content;
        note.category = fields.category;
        log::debug!("Updated note #{id}");

        Ok(note.clone())
    }

    /// Looks up a note by id.
    #[must_use]
    pub fn note(&self, id: i64) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// Notes in creation order.
    #[must_use]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }
}

/// Pre-fills a visit form from a new-business lead.
#[must_use]
pub fn visit_draft_from_business(catalog: &Catalog, business_id: u32) -> Option<VisitDraft> {
    let business = catalog.business(business_id)?;
    Some(VisitDraft {
        client: business.name.clone(),
        municipality_id: catalog
            .municipality_by_name(&business.municipality)
            .map(|m| m.id),
        address: business.address.clone(),
    })
}

fn validate_title(title: &str) -> Result<(), RecordError> {
    if title.trim().is_empty() {
        return Err(RecordError::EmptyTitle);
    }
    Ok(())
}

/// Appends `item`, or replaces the existing entry with the same key.
fn upsert<T>(items: &mut Vec<T>, item: T, key: impl Fn(&T) -> i64) {
    let id = key(&item);
    if let Some(existing) = items.iter_mut().find(|existing| key(existing) == id) {
        log::warn!("Record id {id} reused, replacing previous record");
        *existing = item;
    } else {
        items.push(item);
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, NaiveTime, TimeZone as _, Utc};
    use incident_watch_alerts::clock::ManualClock;
    use incident_watch_alerts::ids::SequentialIds;
    use incident_watch_catalog::embedded_catalog;
    use incident_watch_dashboard_models::NoteCategory;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap()
    }

    fn store() -> RecordStore {
        RecordStore::new(
            Arc::new(SequentialIds::default()),
            Arc::new(SequentialIds::default()),
            Arc::new(ManualClock::new(now())),
        )
    }

    fn visit_on(date: NaiveDate) -> NewVisit {
        NewVisit {
            client: "Restaurante La Alhambra".to_string(),
            municipality_id: 1,
            date,
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            address: "C/ Reyes Católicos, 24".to_string(),
            reason: "Alarm survey".to_string(),
            notes: String::new(),
        }
    }

    fn note(title: &str) -> NoteFields {
        NoteFields {
            title: title.to_string(),
            content: "Follow up next week".to_string(),
            category: NoteCategory::Client,
        }
    }

    #[test]
    fn empty_title_is_rejected_and_not_stored() {
        let mut store = store();
        assert_eq!(store.create_note(note("")), Err(RecordError::EmptyTitle));
        assert_eq!(store.create_note(note("   ")), Err(RecordError::EmptyTitle));
        assert!(store.notes().is_empty());
    }

    #[test]
    fn valid_note_is_stored_once_with_unique_id() {
        let mut store = store();
        let first = store.create_note(note("x")).unwrap();
        assert_eq!(store.notes().len(), 1);
        assert_eq!(first.created_at, now());

        let second = store.create_note(note("y")).unwrap();
        assert_ne!(first.id, second.id);

        let titles: Vec<&str> = store.notes().iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["x", "y"]);
    }

    #[test]
    fn update_note_keeps_identity() {
        let mut store = store();
        let created = store.create_note(note("Draft")).unwrap();

        let updated = store
            .update_note(
                created.id,
                NoteFields {
                    title: "Final".to_string(),
                    content: String::new(),
                    category: NoteCategory::FollowUp,
                },
            )
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(store.note(created.id).unwrap().title, "Final");
        assert_eq!(store.notes().len(), 1);
    }

    #[test]
    fn update_note_validates_and_finds() {
        let mut store = store();
        let created = store.create_note(note("Keep")).unwrap();

        assert_eq!(
            store.update_note(created.id, note(" ")),
            Err(RecordError::EmptyTitle)
        );
        assert_eq!(store.note(created.id).unwrap().title, "Keep");
        assert_eq!(
            store.update_note(999, note("x")),
            Err(RecordError::NoteNotFound { id: 999 })
        );
    }

    #[test]
    fn colliding_ids_replace_previous_record() {
        struct ConstantIds;
        impl IdGenerator for ConstantIds {
            fn next_id(&self) -> i64 {
                42
            }
        }

        let mut store = RecordStore::new(
            Arc::new(ConstantIds),
            Arc::new(ConstantIds),
            Arc::new(ManualClock::new(now())),
        );
        store.create_note(note("first")).unwrap();
        store.create_note(note("second")).unwrap();

        assert_eq!(store.notes().len(), 1);
        assert_eq!(store.notes()[0].title, "second");
    }

    #[test]
    fn visit_today_or_later_is_scheduled() {
        let catalog = embedded_catalog();
        let mut store = store();

        let today = store.create_visit(visit_on(now().date_naive()), &catalog).unwrap();
        assert_eq!(today.status, VisitStatus::Scheduled);

        let later = NaiveDate::from_ymd_opt(2026, 12, 1).unwrap();
        store.create_visit(visit_on(later), &catalog).unwrap();

        assert_eq!(store.visits().len(), 2);
        assert_eq!(store.scheduled_visit_count(), 2);
    }

    #[test]
    fn visit_in_the_past_is_rejected() {
        let catalog = embedded_catalog();
        let mut store = store();
        let yesterday = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();

        assert_eq!(
            store.create_visit(visit_on(yesterday), &catalog),
            Err(RecordError::VisitInPast {
                date: yesterday,
                today: now().date_naive(),
            })
        );
        assert!(store.visits().is_empty());
    }

    #[test]
    fn visit_to_unknown_municipality_is_rejected() {
        let catalog = embedded_catalog();
        let mut store = store();
        let mut fields = visit_on(now().date_naive());
        fields.municipality_id = 99;

        assert_eq!(
            store.create_visit(fields, &catalog),
            Err(RecordError::UnknownMunicipality { id: 99 })
        );
    }

    #[test]
    fn closed_visits_cannot_change_again() {
        let catalog = embedded_catalog();
        let mut store = store();
        let visit = store.create_visit(visit_on(now().date_naive()), &catalog).unwrap();

        let done = store.complete_visit(visit.id).unwrap();
        assert_eq!(done.status, VisitStatus::Completed);
        assert_eq!(store.scheduled_visit_count(), 0);

        assert_eq!(
            store.cancel_visit(visit.id),
            Err(RecordError::VisitClosed {
                id: visit.id,
                status: VisitStatus::Completed,
            })
        );
        assert_eq!(
            store.cancel_visit(123),
            Err(RecordError::VisitNotFound { id: 123 })
        );
    }

    #[test]
    fn draft_from_business_resolves_municipality() {
        let catalog = embedded_catalog();
        let draft = visit_draft_from_business(&catalog, 2).unwrap();
        assert_eq!(draft.client, "Electrodomésticos Tecnohogar");
        assert_eq!(draft.municipality_id, Some(2));
        assert_eq!(draft.address, "Av. de Andalucía, 12");

        assert!(visit_draft_from_business(&catalog, 99).is_none());
    }
}
