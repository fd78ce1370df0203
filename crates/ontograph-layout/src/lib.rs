//! Ontograph Layout - positioning nodes of a view
//!
//! Five modes share one slot table (`PositionIndex`) and one trait
//! (`LayoutStrategy`). Force, hierarchical and grid modes run an
//! iterative simulation that the caller steps once per frame; radial and
//! circular modes place everything in the first frame.
//!
//! # Example
//!
//! ```
//! use ontograph_graph::GraphStore;
//! use ontograph_layout::{LayoutEngine, LayoutType};
//!
//! let store = GraphStore::synthetic().unwrap();
//! let mut view = store.full_view();
//!
//! let engine = LayoutEngine::default();
//! let mut handle = engine.layout(&view, LayoutType::Circular, None);
//! while handle.step(&mut view) {}
//! ```

mod config;
mod engine;
mod mode;
mod position_index;
mod simulation;
pub mod strategies;

pub use config::{LayoutConfig, Viewport};
pub use engine::{LayoutEngine, LayoutError, TickHandle};
pub use mode::{LayoutType, UnknownLayoutType};
pub use position_index::{PositionIndex, PreviousPositions, Slot};
pub use simulation::{Force, Link, Simulation};
pub use strategies::LayoutStrategy;
