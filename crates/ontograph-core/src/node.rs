//! Graph nodes.
//!
//! A `Node` is one business entity: a shipper, a route, a booking. Nodes
//! are created once by the graph builder; afterwards only their layout
//! state (`position`, `pinned`) changes, and only inside derived views.

use crate::entity::EntityType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// A point in graph (world) coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Position) -> f64 {
        (self - other).length()
    }

    /// Length of this point treated as a vector.
    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// True when both coordinates are finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Point on a circle of `radius` around `self` at `angle` radians.
    pub fn on_circle(self, radius: f64, angle: f64) -> Position {
        Position {
            x: self.x + radius * angle.cos(),
            y: self.y + radius * angle.sin(),
        }
    }
}

impl Add for Position {
    type Output = Position;
    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;
    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Position {
    type Output = Position;
    fn mul(self, rhs: f64) -> Position {
        Position::new(self.x * rhs, self.y * rhs)
    }
}

/// Sizing hint given to nodes that do not set one.
pub const DEFAULT_WEIGHT: f64 = 10.0;

/// Free-form, insertion-ordered node properties.
pub type Properties = IndexMap<String, String>;

/// An entity in the ontology graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier (e.g. `SHP-001`).
    pub id: String,

    /// What kind of entity this is.
    pub entity_type: EntityType,

    /// Display label.
    pub label: String,

    /// Sizing hint; larger values render as larger nodes.
    pub weight: f64,

    /// Entity attributes such as `industry` or `transit_time`.
    #[serde(default)]
    pub properties: Properties,

    /// Current layout position.
    #[serde(default)]
    pub position: Position,

    /// Pinned nodes keep their position across layout runs.
    #[serde(default)]
    pub pinned: bool,
}

impl Node {
    /// Creates a node with default weight and no properties.
    pub fn new(id: impl Into<String>, entity_type: EntityType, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entity_type,
            label: label.into(),
            weight: DEFAULT_WEIGHT,
            properties: Properties::new(),
            position: Position::ORIGIN,
            pinned: false,
        }
    }

    /// Sets the sizing hint.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Appends a property, keeping insertion order.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Sets the initial position.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Position::new(x, y);
        self
    }

    /// Gets a property value by key.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Visual radius in world units, scaled by `scale` (node size option).
    ///
    /// Heavier nodes grow with the square root of their weight so a hub
    /// does not swamp the canvas.
    pub fn radius(&self, scale: f64) -> f64 {
        let base = self.entity_type.base_radius();
        let grown = (self.weight.max(0.0).sqrt() * 2.0).max(base);
        grown * scale
    }
}

/// Lightweight node description handed to collaborators (panels, CLI).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSummary {
    pub id: String,
    pub entity_type: EntityType,
    pub label: String,
}

impl From<&Node> for NodeSummary {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            entity_type: node.entity_type,
            label: node.label.clone(),
        }
    }
}
