#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident and notification types for the alert pipeline.
//!
//! An [`Incident`] is a single reported security event in the monitored
//! region. Every incident that reaches the alert pipeline is turned into
//! exactly one [`Notification`], which adds the read state the
//! notification feed needs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Severity of a reported incident.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    /// Minor incident, informational only.
    Low,
    /// Incident worth following up.
    Medium,
    /// Incident requiring immediate attention.
    High,
}

impl Severity {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Medium, Self::High]
    }
}

/// Kind of reported incident.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IncidentKind {
    /// Completed theft or burglary.
    Theft,
    /// Attempted theft or break-in.
    Attempt,
    /// Willful damage to property.
    Vandalism,
    /// Anything that doesn't fit the other kinds.
    Other,
}

impl IncidentKind {
    /// Severity assigned to incidents of this kind when the reporting
    /// source doesn't provide one.
    #[must_use]
    pub const fn default_severity(self) -> Severity {
        match self {
            Self::Theft => Severity::High,
            Self::Attempt | Self::Vandalism => Severity::Medium,
            Self::Other => Severity::Low,
        }
    }

    /// Human-readable label, capitalized for use in feed headlines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Theft => "Theft",
            Self::Attempt => "Attempt",
            Self::Vandalism => "Vandalism",
            Self::Other => "Other",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Theft, Self::Attempt, Self::Vandalism, Self::Other]
    }
}

/// Where an incident happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Municipality name as it appears in the catalog.
    pub municipality: String,
    /// Zone within the municipality.
    pub zone: String,
}

/// A single reported security event.
///
/// Incidents are immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Session-unique identifier.
    pub id: i64,
    /// What kind of event this is.
    pub kind: IncidentKind,
    /// Municipality and zone.
    pub location: Location,
    /// Street address.
    pub address: String,
    /// Short description shown as the feed headline.
    pub description: String,
    /// When the incident happened.
    pub occurred_at: DateTime<Utc>,
    /// How serious the incident is.
    pub severity: Severity,
    /// Whether the report has been confirmed.
    pub confirmed: bool,
}

/// Feed-visible record derived 1:1 from an [`Incident`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// The incident this notification announces.
    pub incident: Incident,
    /// Whether the user has seen this notification.
    pub read: bool,
    /// When the alert pipeline received the incident.
    pub received_at: DateTime<Utc>,
}

impl Notification {
    /// Creates an unread notification for `incident`.
    #[must_use]
    pub const fn new(incident: Incident, received_at: DateTime<Utc>) -> Self {
        Self {
            incident,
            read: false,
            received_at,
        }
    }

    /// Identifier of the underlying incident.
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.incident.id
    }

    /// Headline for the feed entry.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.incident.description
    }

    /// `"<municipality> - <zone>"` subtitle for the feed entry.
    #[must_use]
    pub fn subtitle(&self) -> String {
        format!(
            "{} - {}",
            self.incident.location.municipality, self.incident.location.zone
        )
    }
}
