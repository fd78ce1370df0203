//! Ontograph Core - the typed entity model
//!
//! This crate defines what lives in the ontology graph: the closed set of
//! entity types, the `Node` record with its layout state, and the error
//! taxonomy every other crate reports through.
//!
//! # Example
//!
//! ```
//! use ontograph_core::{EntityType, Node};
//!
//! let node = Node::new("RT-USWC", EntityType::Route, "KR-US-WC")
//!     .with_weight(30.0)
//!     .with_property("transit_time", "14");
//!
//! assert_eq!(node.entity_type.rank(), EntityType::Route.rank());
//! ```

mod entity;
mod error;
mod node;

pub use entity::{EntityType, UnknownEntityType};
pub use error::{ConstructionError, GraphError, Result};
pub use node::{Node, NodeSummary, Position, Properties, DEFAULT_WEIGHT};
