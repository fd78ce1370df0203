//! Edge types for the ontology graph.
//!
//! Edges are directed and labelled with a free-form relationship name.
//! The vocabulary below is what the synthetic generator emits, together
//! with the name of each relation's inverse.

use serde::{Deserialize, Serialize};

/// Relationship labels and their inverses, as emitted by the generator.
pub mod relation {
    pub const MAKES_BOOKING: &str = "MAKES_BOOKING";
    pub const BOOKED_BY: &str = "BOOKED_BY";
    pub const HAS_CONTRACT: &str = "HAS_CONTRACT";
    pub const CONTRACT_OF: &str = "CONTRACT_OF";
    pub const APPLIES_CONTRACT: &str = "APPLIES_CONTRACT";
    pub const APPLIED_TO: &str = "APPLIED_TO";
    pub const ON_ROUTE: &str = "ON_ROUTE";
    pub const ROUTE_OF: &str = "ROUTE_OF";
    pub const USES: &str = "USES";
    pub const USED_BY: &str = "USED_BY";
    pub const OPERATES_ON: &str = "OPERATES_ON";
    pub const SERVED_BY: &str = "SERVED_BY";
    pub const CALLS_AT: &str = "CALLS_AT";
    pub const CALLED_BY: &str = "CALLED_BY";
    pub const CARRIES: &str = "CARRIES";
    pub const CARRIED_IN: &str = "CARRIED_IN";
    pub const HAS_INDEX: &str = "HAS_INDEX";
    pub const INDEXES: &str = "INDEXES";
    pub const AFFECTED_BY: &str = "AFFECTED_BY";
    pub const AFFECTS: &str = "AFFECTS";
    pub const COMPETES_WITH: &str = "COMPETES_WITH";
    pub const COMPETED_BY: &str = "COMPETED_BY";
    pub const OWNED_BY: &str = "OWNED_BY";
    pub const OWNS: &str = "OWNS";
    pub const ARRANGED_BY: &str = "ARRANGED_BY";
    pub const ARRANGES: &str = "ARRANGES";
    pub const INSURED_BY: &str = "INSURED_BY";
    pub const INSURES: &str = "INSURES";
    pub const HAS_ACTIVITY: &str = "HAS_ACTIVITY";
    pub const ACTIVITY_OF: &str = "ACTIVITY_OF";
    pub const HAS_TERMINAL: &str = "HAS_TERMINAL";
    pub const LOCATED_IN: &str = "LOCATED_IN";
    pub const CLEARED_BY: &str = "CLEARED_BY";
    pub const CLEARS: &str = "CLEARS";
    pub const TIME_NEXT: &str = "TIME_NEXT";

    /// Forward relation → inverse relation.
    pub const INVERSES: &[(&str, &str)] = &[
        (MAKES_BOOKING, BOOKED_BY),
        (HAS_CONTRACT, CONTRACT_OF),
        (APPLIES_CONTRACT, APPLIED_TO),
        (ON_ROUTE, ROUTE_OF),
        (USES, USED_BY),
        (OPERATES_ON, SERVED_BY),
        (CALLS_AT, CALLED_BY),
        (CARRIES, CARRIED_IN),
        (HAS_INDEX, INDEXES),
        (AFFECTED_BY, AFFECTS),
        (COMPETES_WITH, COMPETED_BY),
        (OWNED_BY, OWNS),
        (ARRANGED_BY, ARRANGES),
        (INSURED_BY, INSURES),
        (HAS_ACTIVITY, ACTIVITY_OF),
        (HAS_TERMINAL, LOCATED_IN),
        (CLEARED_BY, CLEARS),
    ];

    /// Every label the generator can emit, forward labels first.
    pub fn all() -> Vec<&'static str> {
        INVERSES
            .iter()
            .map(|(fwd, _)| *fwd)
            .chain(INVERSES.iter().map(|(_, inv)| *inv))
            .chain(std::iter::once(TIME_NEXT))
            .collect()
    }

    /// Returns the inverse label of a relation, in either direction.
    pub fn inverse_of(relationship: &str) -> Option<&'static str> {
        INVERSES.iter().find_map(|(fwd, inv)| {
            if *fwd == relationship {
                Some(*inv)
            } else if *inv == relationship {
                Some(*fwd)
            } else {
                None
            }
        })
    }
}

/// An edge in the ontology graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// The relationship label, e.g. `OPERATES_ON`.
    pub relationship: String,
}

impl Edge {
    /// Creates a new edge.
    pub fn new(relationship: impl Into<String>) -> Self {
        Self {
            relationship: relationship.into(),
        }
    }
}

/// A simplified edge for export and collaborator APIs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub relationship: String,
}

#[cfg(test)]
mod tests {
    use super::relation::*;

    #[test]
    fn test_inverse_lookup_both_directions() {
        assert_eq!(inverse_of(USES), Some(USED_BY));
        assert_eq!(inverse_of(USED_BY), Some(USES));
        assert_eq!(inverse_of(TIME_NEXT), None);
    }

    #[test]
    fn test_vocabulary_has_no_duplicates() {
        let labels = all();
        let unique: std::collections::HashSet<_> = labels.iter().collect();
        assert_eq!(labels.len(), unique.len());
        assert_eq!(labels.len(), INVERSES.len() * 2 + 1);
    }
}
