#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the incident watch server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the session types to allow independent evolution of the API
//! contract.

use chrono::{DateTime, Utc};
use incident_watch_catalog_models::Municipality;
use incident_watch_dashboard_models::DashboardStats;
use incident_watch_incident_models::{Incident, IncidentKind, Notification, Severity};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
    /// Offline gateway lifecycle state.
    pub gateway: String,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
}

impl ApiError {
    /// Wraps any displayable error.
    #[must_use]
    pub fn new(error: impl std::fmt::Display) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

/// Aggregate dashboard counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStats {
    /// Municipalities in the catalog.
    pub total_municipalities: usize,
    /// Known incidents.
    pub total_incidents: usize,
    /// Visits still scheduled.
    pub scheduled_visits: usize,
    /// New-business leads.
    pub new_businesses: usize,
    /// Unread notifications.
    pub unread_notifications: usize,
    /// When the counters were last recomputed.
    pub updated_at: DateTime<Utc>,
}

impl ApiStats {
    /// Combines the session stats with the unread counter.
    #[must_use]
    pub const fn new(stats: DashboardStats, unread_notifications: usize) -> Self {
        Self {
            total_municipalities: stats.total_municipalities,
            total_incidents: stats.total_incidents,
            scheduled_visits: stats.scheduled_visits,
            new_businesses: stats.new_businesses,
            unread_notifications,
            updated_at: stats.updated_at,
        }
    }
}

/// A feed entry as rendered by the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiNotification {
    /// Incident id.
    pub id: i64,
    /// Headline.
    pub title: String,
    /// `"<municipality> - <zone>"`.
    pub subtitle: String,
    /// Incident kind.
    pub kind: IncidentKind,
    /// Incident severity.
    pub severity: Severity,
    /// Whether the entry has been seen.
    pub read: bool,
    /// When the alert arrived.
    pub received_at: DateTime<Utc>,
    /// When the incident happened.
    pub occurred_at: DateTime<Utc>,
}

impl From<&Notification> for ApiNotification {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id(),
            title: n.title().to_string(),
            subtitle: n.subtitle(),
            kind: n.incident.kind,
            severity: n.incident.severity,
            read: n.read,
            received_at: n.received_at,
            occurred_at: n.incident.occurred_at,
        }
    }
}

/// Notification feed, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiNotificationFeed {
    /// Unread entries.
    pub unread: usize,
    /// Entries, newest first.
    pub notifications: Vec<ApiNotification>,
}

/// Body of `POST /api/incidents`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIncidentBody {
    /// Incident kind.
    pub kind: IncidentKind,
    /// Municipality name.
    pub municipality: String,
    /// Zone within the municipality.
    #[serde(default)]
    pub zone: String,
    /// Street address.
    #[serde(default)]
    pub address: String,
    /// Free-text description. Defaults to the kind's label.
    pub description: Option<String>,
    /// Severity. Defaults to the kind's default severity.
    pub severity: Option<Severity>,
    /// Whether the report is confirmed.
    #[serde(default)]
    pub confirmed: bool,
}

impl NewIncidentBody {
    /// Builds the incident with the given id and timestamp.
    #[must_use]
    pub fn into_incident(self, id: i64, occurred_at: DateTime<Utc>) -> Incident {
        Incident {
            id,
            kind: self.kind,
            location: incident_watch_incident_models::Location {
                municipality: self.municipality,
                zone: self.zone,
            },
            address: self.address,
            description: self
                .description
                .unwrap_or_else(|| format!("{} reported", self.kind.label())),
            occurred_at,
            severity: self.severity.unwrap_or_else(|| self.kind.default_severity()),
            confirmed: self.confirmed,
        }
    }
}

/// Query parameters of `GET /api/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    /// Free-text query.
    #[serde(default)]
    pub q: String,
}

/// Search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSearchResults {
    /// Total hits.
    pub total: usize,
    /// Matching municipalities.
    pub municipalities: Vec<Municipality>,
    /// Matching zones.
    pub zones: Vec<ApiZoneMatch>,
}

/// A zone that matched a search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiZoneMatch {
    /// Owning municipality.
    pub municipality: String,
    /// Zone name.
    pub zone: String,
    /// Zone incidence score.
    pub incidence: f64,
}

/// Entry of the municipality select list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMunicipalityChoice {
    /// Municipality id.
    pub id: u32,
    /// Display name.
    pub name: String,
}

/// Result of a displayed push notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiPushDisplayed {
    /// Notification id, used for the click endpoint.
    pub id: String,
    /// Window opened on click.
    pub url: String,
}
