use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The five layout modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutType {
    #[default]
    Force,
    Radial,
    Hierarchical,
    Circular,
    Grid,
}

impl LayoutType {
    pub const ALL: [LayoutType; 5] = [
        LayoutType::Force,
        LayoutType::Radial,
        LayoutType::Hierarchical,
        LayoutType::Circular,
        LayoutType::Grid,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutType::Force => "force",
            LayoutType::Radial => "radial",
            LayoutType::Hierarchical => "hierarchical",
            LayoutType::Circular => "circular",
            LayoutType::Grid => "grid",
        }
    }

    /// Iterative modes keep simulating after the first tick.
    pub fn is_iterative(self) -> bool {
        matches!(
            self,
            LayoutType::Force | LayoutType::Hierarchical | LayoutType::Grid
        )
    }
}

impl fmt::Display for LayoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a string names no layout mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown layout mode: {0} (expected force, radial, hierarchical, circular or grid)")]
pub struct UnknownLayoutType(pub String);

impl FromStr for LayoutType {
    type Err = UnknownLayoutType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        LayoutType::ALL
            .into_iter()
            .find(|mode| mode.as_str() == lower)
            .ok_or_else(|| UnknownLayoutType(s.to_string()))
    }
}
