//! Entity types of the shipping ontology.
//!
//! The set is closed: every node in the graph is exactly one of these
//! fifteen kinds. Each kind also carries the presentation metadata the
//! renderer and the hierarchical layout need (color, base radius, rank).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of business entity a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    /// A cargo owner buying transport (e.g. an electronics manufacturer).
    Shipper,
    /// A liner service between port pairs.
    Route,
    /// A ship deployed on one or more routes.
    Vessel,
    /// A single shipment reservation.
    Booking,
    /// A service contract, RFA or spot agreement.
    Contract,
    /// A seaport.
    Port,
    /// A commodity class carried in bookings.
    Cargo,
    /// A freight or cost index (SCFI, bunker price, FX).
    MarketIndex,
    /// Another carrier competing on a route.
    Competitor,
    /// The owner a vessel is chartered from.
    ShipOwner,
    /// An intermediary arranging transport for shippers.
    FreightForwarder,
    /// A cargo or hull insurance policy.
    Insurance,
    /// A sales meeting, call or visit.
    SalesActivity,
    /// A container terminal inside a port.
    Terminal,
    /// A customs office clearing cargo at a port.
    Customs,
}

impl EntityType {
    /// Every entity type, in rank order.
    pub const ALL: [EntityType; 15] = [
        EntityType::Shipper,
        EntityType::FreightForwarder,
        EntityType::SalesActivity,
        EntityType::Contract,
        EntityType::Booking,
        EntityType::Cargo,
        EntityType::Insurance,
        EntityType::Route,
        EntityType::Vessel,
        EntityType::ShipOwner,
        EntityType::Port,
        EntityType::Terminal,
        EntityType::Customs,
        EntityType::Competitor,
        EntityType::MarketIndex,
    ];

    /// Position of this type in the fixed hierarchical order.
    ///
    /// Commercial entities sit at the top, physical operations in the
    /// middle, and market context at the bottom.
    pub fn rank(self) -> usize {
        Self::ALL
            .iter()
            .position(|t| *t == self)
            .unwrap_or(Self::ALL.len())
    }

    /// Canonical wire name (`MARKET_INDEX`).
    pub fn as_str(self) -> &'static str {
        match self {
            EntityType::Shipper => "SHIPPER",
            EntityType::Route => "ROUTE",
            EntityType::Vessel => "VESSEL",
            EntityType::Booking => "BOOKING",
            EntityType::Contract => "CONTRACT",
            EntityType::Port => "PORT",
            EntityType::Cargo => "CARGO",
            EntityType::MarketIndex => "MARKET_INDEX",
            EntityType::Competitor => "COMPETITOR",
            EntityType::ShipOwner => "SHIP_OWNER",
            EntityType::FreightForwarder => "FREIGHT_FORWARDER",
            EntityType::Insurance => "INSURANCE",
            EntityType::SalesActivity => "SALES_ACTIVITY",
            EntityType::Terminal => "TERMINAL",
            EntityType::Customs => "CUSTOMS",
        }
    }

    /// Human-readable name (`Market Index`).
    pub fn display_name(self) -> &'static str {
        match self {
            EntityType::Shipper => "Shipper",
            EntityType::Route => "Route",
            EntityType::Vessel => "Vessel",
            EntityType::Booking => "Booking",
            EntityType::Contract => "Contract",
            EntityType::Port => "Port",
            EntityType::Cargo => "Cargo",
            EntityType::MarketIndex => "Market Index",
            EntityType::Competitor => "Competitor",
            EntityType::ShipOwner => "Ship Owner",
            EntityType::FreightForwarder => "Freight Forwarder",
            EntityType::Insurance => "Insurance",
            EntityType::SalesActivity => "Sales Activity",
            EntityType::Terminal => "Terminal",
            EntityType::Customs => "Customs",
        }
    }

    /// Fill color used by the renderers, as a CSS hex string.
    pub fn color(self) -> &'static str {
        match self {
            EntityType::Shipper => "#2563eb",
            EntityType::Booking => "#10b981",
            EntityType::Route => "#f59e0b",
            EntityType::Vessel => "#6366f1",
            EntityType::Contract => "#8b5cf6",
            EntityType::MarketIndex => "#ef4444",
            EntityType::Competitor => "#64748b",
            EntityType::SalesActivity => "#ec4899",
            EntityType::Port => "#0ea5e9",
            EntityType::Cargo => "#84cc16",
            EntityType::ShipOwner => "#a855f7",
            EntityType::FreightForwarder => "#14b8a6",
            EntityType::Insurance => "#f97316",
            EntityType::Terminal => "#0891b2",
            EntityType::Customs => "#b45309",
        }
    }

    /// Base visual radius in world units before node-size scaling.
    pub fn base_radius(self) -> f64 {
        match self {
            EntityType::Booking | EntityType::SalesActivity => 8.0,
            EntityType::Shipper | EntityType::Route => 16.0,
            _ => 12.0,
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a string names no known entity type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown entity type: {0}")]
pub struct UnknownEntityType(pub String);

impl FromStr for EntityType {
    type Err = UnknownEntityType;

    /// Accepts `MARKET_INDEX`, `market_index`, `marketIndex` and `Market Index`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        EntityType::ALL
            .iter()
            .copied()
            .find(|t| {
                let canonical: String = t
                    .as_str()
                    .chars()
                    .filter(|c| *c != '_')
                    .map(|c| c.to_ascii_lowercase())
                    .collect();
                canonical == normalized
            })
            .ok_or_else(|| UnknownEntityType(s.to_string()))
    }
}
