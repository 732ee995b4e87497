#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Embedded reference data for the province of Córdoba.
//!
//! The municipality catalog and the seed alerts are TOML files under
//! `data/`, baked into the binary at compile time via [`include_str!`].
//! Nothing in this crate mutates the catalog after it is parsed.

pub mod search;

use chrono::{DateTime, Duration, Utc};
use incident_watch_catalog_models::Catalog;
use incident_watch_incident_models::{Incident, IncidentKind, Location, Severity};
use serde::Deserialize;

pub use search::search;

/// Municipality catalog embedded at compile time.
const CATALOG_TOML: &str = include_str!("../data/cordoba.toml");

/// Seed alerts embedded at compile time.
const ALERTS_TOML: &str = include_str!("../data/alerts.toml");

/// Errors that can occur while parsing reference data.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The TOML document is malformed or doesn't match the schema.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Parses a catalog from a TOML document.
///
/// # Errors
///
/// Returns [`CatalogError`] if the document is not a valid catalog.
pub fn parse_catalog(toml_str: &str) -> Result<Catalog, CatalogError> {
    Ok(toml::de::from_str(toml_str)?)
}

/// Returns the embedded Córdoba catalog.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed (this is a compile-time
/// guarantee since the file is embedded).
#[must_use]
pub fn embedded_catalog() -> Catalog {
    parse_catalog(CATALOG_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse embedded catalog: {e}"))
}

// ── Seed alerts ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SeedAlerts {
    alerts: Vec<SeedAlert>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedAlert {
    id: i64,
    kind: IncidentKind,
    municipality: String,
    zone: String,
    address: String,
    description: String,
    minutes_ago: i64,
    severity: Severity,
    confirmed: bool,
}

impl SeedAlert {
    fn into_incident(self, now: DateTime<Utc>) -> Incident {
        Incident {
            id: self.id,
            kind: self.kind,
            location: Location {
                municipality: self.municipality,
                zone: self.zone,
            },
            address: self.address,
            description: self.description,
            occurred_at: now - Duration::minutes(self.minutes_ago),
            severity: self.severity,
            confirmed: self.confirmed,
        }
    }
}

/// Parses seed alerts from a TOML document, anchoring their relative
/// timestamps at `now`.
///
/// # Errors
///
/// Returns [`CatalogError`] if the document is malformed.
pub fn parse_seed_incidents(
    toml_str: &str,
    now: DateTime<Utc>,
) -> Result<Vec<Incident>, CatalogError> {
    let seed: SeedAlerts = toml::de::from_str(toml_str)?;
    Ok(seed
        .alerts
        .into_iter()
        .map(|a| a.into_incident(now))
        .collect())
}

/// Returns the embedded seed alerts anchored at `now`.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed.
#[must_use]
pub fn seed_incidents(now: DateTime<Utc>) -> Vec<Incident> {
    parse_seed_incidents(ALERTS_TOML, now)
        .unwrap_or_else(|e| panic!("Failed to parse embedded seed alerts: {e}"))
}
