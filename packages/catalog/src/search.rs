//! Free-text search over the municipality catalog.
//!
//! A linear scan in catalog order. Municipalities match on name or postal
//! code; zones match on name, but only zones published with an incidence
//! score ([`Zone::Scored`]). Zones listed by name alone are not indexed.

use incident_watch_catalog_models::{Catalog, SearchResults, Zone, ZoneMatch};

/// Searches the catalog for `query`, case-insensitively.
///
/// An empty or whitespace-only query returns empty results without
/// touching the catalog. Results follow catalog order; there is no
/// ranking.
#[must_use]
pub fn search(catalog: &Catalog, query: &str) -> SearchResults {
    if query.trim().is_empty() {
        return SearchResults::default();
    }

    let needle = query.to_lowercase();

    let municipalities = catalog
        .municipalities
        .iter()
        .filter(|m| m.name.to_lowercase().contains(&needle) || m.postal_code.contains(&needle))
        .cloned()
        .collect();

    let mut zones = Vec::new();
    for municipality in &catalog.municipalities {
        for zone in &municipality.zones {
            let Zone::Scored { name, incidence } = zone else {
                continue;
            };
            if name.to_lowercase().contains(&needle) {
                zones.push(ZoneMatch {
                    municipality: municipality.name.clone(),
                    zone: name.clone(),
                    incidence: *incidence,
                });
            }
        }
    }

    let results = SearchResults {
        municipalities,
        zones,
    };

    log::debug!(
        "search {query:?}: {} municipalities, {} zones",
        results.municipalities.len(),
        results.zones.len()
    );

    results
}
