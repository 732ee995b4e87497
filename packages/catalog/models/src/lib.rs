#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Read-only reference data for the monitored region.
//!
//! The [`Catalog`] is supplied once at startup and never mutated. It is
//! used as the lookup table for search, for municipality choice lists,
//! and for pre-filling visits from new-business leads.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Patrol priority assigned to a municipality.
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
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PriorityTier {
    /// Routine coverage.
    Low,
    /// Slightly below average incidence.
    MediumLow,
    /// Average incidence.
    Medium,
    /// Above average incidence.
    MediumHigh,
    /// Highest incidence, first in line for visits.
    High,
}

/// Administrative class of a municipality.
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
pub enum MunicipalityKind {
    /// Provincial capital.
    Capital,
    /// Town with city status.
    City,
    /// Any smaller settlement.
    Town,
}

// ---------------------------------------------------------------------------
// Reference records
// ---------------------------------------------------------------------------

/// A zone within a municipality.
///
/// Some municipalities publish per-zone incidence scores, others only a
/// list of zone names. Only [`Zone::Scored`] zones take part in search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Zone {
    /// Zone with its own incidence score.
    Scored {
        /// Zone name.
        name: String,
        /// Incidence score on a 0-10 scale.
        incidence: f64,
    },
    /// Zone known only by name.
    Named(String),
}

impl Zone {
    /// Zone name regardless of variant.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Scored { name, .. } | Self::Named(name) => name,
        }
    }
}

/// A municipality in the monitored province.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Municipality {
    /// Catalog identifier, referenced by scheduled visits.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Administrative class.
    pub kind: MunicipalityKind,
    /// Resident population, if known.
    #[serde(default)]
    pub population: Option<u64>,
    /// Postal code or postal code range (e.g. `"14001-14014"`).
    pub postal_code: String,
    /// `[latitude, longitude]`.
    pub coordinates: [f64; 2],
    /// Incidence score on a 0-10 scale.
    pub incidence: f64,
    /// Patrol priority.
    pub priority: PriorityTier,
    /// Zones in catalog order. Empty when the municipality publishes none.
    #[serde(default)]
    pub zones: Vec<Zone>,
}

/// A zone singled out as a hot spot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotZone {
    /// Municipality name.
    pub municipality: String,
    /// Zone name.
    pub zone: String,
    /// Incidence score on a 0-10 scale.
    pub incidence: f64,
}

/// A newly opened business, used as a sales lead for visits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    /// Lead identifier.
    pub id: u32,
    /// Business name.
    pub name: String,
    /// Business category (e.g. `"restaurant"`).
    pub kind: String,
    /// Municipality name as it appears in the catalog.
    pub municipality: String,
    /// Street address.
    pub address: String,
    /// Postal code.
    pub postal_code: String,
    /// Opening date.
    pub opened_on: NaiveDate,
    /// Contact phone number.
    pub phone: String,
    /// Sales potential rating.
    pub potential: String,
}

/// The static reference dataset for the region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    /// Number of municipalities in the whole province, including the ones
    /// not yet detailed in [`Self::municipalities`].
    pub province_municipalities: u32,
    /// Municipalities in catalog order.
    pub municipalities: Vec<Municipality>,
    /// Share of incidents per incident type, in percent.
    #[serde(default)]
    pub incidence_by_type: BTreeMap<String, u32>,
    /// Highest-incidence zones.
    #[serde(default)]
    pub hot_zones: Vec<HotZone>,
    /// Newly opened businesses.
    #[serde(default)]
    pub new_businesses: Vec<Business>,
}

impl Catalog {
    /// Looks up a municipality by catalog id.
    #[must_use]
    pub fn municipality(&self, id: u32) -> Option<&Municipality> {
        self.municipalities.iter().find(|m| m.id == id)
    }

    /// Looks up a municipality by exact name.
    #[must_use]
    pub fn municipality_by_name(&self, name: &str) -> Option<&Municipality> {
        self.municipalities.iter().find(|m| m.name == name)
    }

    /// Looks up a new-business lead by id.
    #[must_use]
    pub fn business(&self, id: u32) -> Option<&Business> {
        self.new_businesses.iter().find(|b| b.id == id)
    }

    /// `(id, name)` pairs in catalog order, for municipality pickers.
    #[must_use]
    pub fn choices(&self) -> Vec<(u32, &str)> {
        self.municipalities
            .iter()
            .map(|m| (m.id, m.name.as_str()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Search results
// ---------------------------------------------------------------------------

/// A zone that matched a search query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneMatch {
    /// Name of the municipality the zone belongs to.
    pub municipality: String,
    /// Zone name.
    pub zone: String,
    /// Zone incidence score.
    pub incidence: f64,
}

/// Result of a free-text catalog search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    /// Municipalities whose name or postal code matched, in catalog order.
    pub municipalities: Vec<Municipality>,
    /// Zones whose name matched, in catalog order.
    pub zones: Vec<ZoneMatch>,
}

impl SearchResults {
    /// Total number of matches across both lists.
    #[must_use]
    pub fn total(&self) -> usize {
        self.municipalities.len() + self.zones.len()
    }

    /// Returns `true` when nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.municipalities.is_empty() && self.zones.is_empty()
    }
}
