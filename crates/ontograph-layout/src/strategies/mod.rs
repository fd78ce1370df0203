//! Layout strategies.
//!
//! Each mode implements `LayoutStrategy` over a shared `PositionIndex`.
//! `place` builds the index and any simulation state from a view;
//! `step` advances one frame.

mod circular;
mod force;
mod grid;
mod hierarchical;
mod radial;

pub use circular::CircularStrategy;
pub use force::ForceStrategy;
pub use grid::GridStrategy;
pub use hierarchical::HierarchicalStrategy;
pub use radial::RadialStrategy;

use crate::config::LayoutConfig;
use crate::mode::LayoutType;
use crate::position_index::{PositionIndex, PreviousPositions};
use crate::simulation::{Link, Simulation};
use ontograph_graph::{unique_pairs, OntologyGraph};

pub trait LayoutStrategy: std::fmt::Debug {
    fn mode(&self) -> LayoutType;

    /// Computes the starting state for `view`.
    fn place(
        &mut self,
        view: &OntologyGraph,
        previous: Option<&PreviousPositions>,
        config: &LayoutConfig,
    ) -> PositionIndex;

    /// Advances one frame. Returns whether the layout is still converging.
    fn step(&mut self, index: &mut PositionIndex) -> bool;

    /// The running simulation, for iterative modes.
    fn simulation_mut(&mut self) -> Option<&mut Simulation> {
        None
    }
}

/// Springs for every unique node pair whose ends are both in `index`.
pub(crate) fn links_for(view: &OntologyGraph, index: &PositionIndex) -> Vec<Link> {
    unique_pairs(view)
        .into_iter()
        .filter_map(|(a, b)| {
            let source = index.slot_of(&view.get(a)?.id)?;
            let target = index.slot_of(&view.get(b)?.id)?;
            Some(Link { source, target })
        })
        .collect()
}

/// Creates the strategy for a mode.
pub fn strategy_for(mode: LayoutType, radial_center: Option<String>) -> Box<dyn LayoutStrategy> {
    match mode {
        LayoutType::Force => Box::new(ForceStrategy::default()),
        LayoutType::Radial => Box::new(RadialStrategy::new(radial_center)),
        LayoutType::Hierarchical => Box::new(HierarchicalStrategy::default()),
        LayoutType::Circular => Box::new(CircularStrategy),
        LayoutType::Grid => Box::new(GridStrategy::default()),
    }
}
