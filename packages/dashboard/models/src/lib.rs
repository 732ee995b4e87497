#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! User-created records and aggregate statistics for the dashboard.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

// ---------------------------------------------------------------------------
// Visits
// ---------------------------------------------------------------------------

/// Lifecycle state of a scheduled visit.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VisitStatus {
    /// Booked and pending.
    Scheduled,
    /// The visit took place.
    Completed,
    /// The visit was called off.
    Cancelled,
}

/// Fields supplied when booking a visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVisit {
    /// Client name.
    pub client: String,
    /// Catalog id of the municipality the visit takes place in.
    pub municipality_id: u32,
    /// Day of the visit.
    pub date: NaiveDate,
    /// Time of the visit.
    pub time: NaiveTime,
    /// Street address.
    pub address: String,
    /// Purpose of the visit.
    #[serde(default)]
    pub reason: String,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
}

/// A visit booked with a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledVisit {
    /// Session-unique identifier.
    pub id: i64,
    /// Client name.
    pub client: String,
    /// Catalog id of the municipality.
    pub municipality_id: u32,
    /// Day of the visit.
    pub date: NaiveDate,
    /// Time of the visit.
    pub time: NaiveTime,
    /// Street address.
    pub address: String,
    /// Purpose of the visit.
    pub reason: String,
    /// Free-form notes.
    pub notes: String,
    /// Current lifecycle state.
    pub status: VisitStatus,
}

/// Partially filled visit form, derived from a new-business lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitDraft {
    /// Client name, taken from the business name.
    pub client: String,
    /// Municipality id, when the business municipality is in the catalog.
    pub municipality_id: Option<u32>,
    /// Business address.
    pub address: String,
}

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

/// Category a note is filed under.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NoteCategory {
    /// Uncategorized.
    #[default]
    General,
    /// About a client or lead.
    Client,
    /// About a specific incident.
    Incident,
    /// Reminder for later action.
    FollowUp,
}

/// Editable fields of a note, used for both creation and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteFields {
    /// Title. Must not be blank.
    pub title: String,
    /// Body text.
    #[serde(default)]
    pub content: String,
    /// Category.
    #[serde(default)]
    pub category: NoteCategory,
}

/// A user note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Session-unique identifier.
    pub id: i64,
    /// Title, never blank.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Category.
    pub category: NoteCategory,
    /// When the note was first saved.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Aggregate counters shown in the dashboard header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Municipalities detailed in the catalog.
    pub total_municipalities: usize,
    /// Incidents known to the session.
    pub total_incidents: usize,
    /// Visits booked during the session.
    pub scheduled_visits: usize,
    /// New-business leads in the catalog.
    pub new_businesses: usize,
    /// When these counters were last recomputed.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_fields_default_to_general() {
        let fields: NoteFields = serde_json::from_str(r#"{"title": "Call back"}"#).unwrap();
        assert_eq!(fields.category, NoteCategory::General);
        assert!(fields.content.is_empty());
    }

    #[test]
    fn visit_status_round_trip() {
        for status in [
            VisitStatus::Scheduled,
            VisitStatus::Completed,
            VisitStatus::Cancelled,
        ] {
            let parsed: VisitStatus = status.as_ref().parse().unwrap();
            assert_eq!(status, parsed);
        }
    }

    #[test]
    fn new_visit_parses_iso_date_and_time() {
        let visit: NewVisit = serde_json::from_str(
            r#"{
                "client": "Restaurante La Alhambra",
                "municipalityId": 1,
                "date": "2026-11-02",
                "time": "10:30:00",
                "address": "C/ Reyes Católicos, 24"
            }"#,
        )
        .unwrap();
        assert_eq!(visit.date, NaiveDate::from_ymd_opt(2026, 11, 2).unwrap());
        assert_eq!(visit.time, NaiveTime::from_hms_opt(10, 30, 0).unwrap());
        assert!(visit.reason.is_empty());
    }
}
