//! Pluggable incident sources.
//!
//! The alert pipeline pulls incidents one at a time from an
//! [`IncidentSource`]. The [`RandomIncidentSource`] stands in for a real
//! push transport in demos; [`ScriptedIncidentSource`] replays a fixed
//! list for tests.

use std::sync::Arc;

use incident_watch_incident_models::{Incident, IncidentKind, Location};

use crate::clock::Clock;
use crate::ids::IdGenerator;

/// Municipalities the simulated source reports from.
pub const SIMULATED_MUNICIPALITIES: &[&str] = &["Córdoba", "Lucena", "Puente Genil", "Montilla"];

/// Incident kinds the simulated source produces.
pub const SIMULATED_KINDS: &[IncidentKind] = &[
    IncidentKind::Theft,
    IncidentKind::Attempt,
    IncidentKind::Vandalism,
];

/// Anything that can produce the next incident for the alert pipeline.
pub trait IncidentSource: Send {
    /// Produces the next incident.
    fn next_incident(&mut self) -> Incident;
}

/// Synthesizes random incidents from a small fixed vocabulary.
pub struct RandomIncidentSource {
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl RandomIncidentSource {
    /// Creates a source stamping incidents with `ids` and `clock`.
    #[must_use]
    pub fn new(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self { ids, clock }
    }
}

impl IncidentSource for RandomIncidentSource {
    fn next_incident(&mut self) -> Incident {
        // v4 UUIDs are 122 bits of OS randomness; a few bytes are plenty.
        let entropy = uuid::Uuid::new_v4();
        let bytes = entropy.as_bytes();

        let municipality =
            SIMULATED_MUNICIPALITIES[usize::from(bytes[0]) % SIMULATED_MUNICIPALITIES.len()];
        let kind = SIMULATED_KINDS[usize::from(bytes[1]) % SIMULATED_KINDS.len()];
        let confirmed = bytes[2] >= 128;

        Incident {
            id: self.ids.next_id(),
            kind,
            location: Location {
                municipality: municipality.to_string(),
                zone: "Centro".to_string(),
            },
            address: "Calle Ejemplo, 123".to_string(),
            description: format!("{} reported", kind.label()),
            occurred_at: self.clock.now(),
            severity: kind.default_severity(),
            confirmed,
        }
    }
}

/// Replays a fixed list of incidents, cycling back to the start when the
/// list is exhausted.
pub struct ScriptedIncidentSource {
    script: Vec<Incident>,
    cursor: usize,
}

impl ScriptedIncidentSource {
    /// Creates a source replaying `incidents` in order.
    ///
    /// # Panics
    ///
    /// Panics if `incidents` is empty.
    #[must_use]
    pub fn new(incidents: Vec<Incident>) -> Self {
        assert!(
            !incidents.is_empty(),
            "scripted incident source needs at least one incident"
        );
        Self {
            script: incidents,
            cursor: 0,
        }
    }
}

impl IncidentSource for ScriptedIncidentSource {
    fn next_incident(&mut self) -> Incident {
        let next = self.script[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.script.len();
        next
    }
}
