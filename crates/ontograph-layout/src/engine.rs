//! Layout runs and their cancellation.
//!
//! The engine hands out one `TickHandle` per run. Every run takes a new
//! generation number from a shared counter; a handle whose generation is
//! no longer current (because a newer run started, or the engine was
//! invalidated) turns every `step` into a no-op that writes nothing.
//!
//! Engine and handles live on the caller's frame thread, so the counter
//! is a plain `Rc<Cell<u64>>`.

use crate::config::LayoutConfig;
use crate::mode::LayoutType;
use crate::position_index::{PositionIndex, PreviousPositions};
use crate::strategies::{strategy_for, LayoutStrategy};
use ontograph_core::Position;
use ontograph_graph::OntologyGraph;
use std::cell::Cell;
use std::rc::Rc;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("radial center not in view: {0}")]
    UnknownCenter(String),
}

/// Starts layout runs and tracks which one is current.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    config: LayoutConfig,
    generation: Rc<Cell<u64>>,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            generation: Rc::new(Cell::new(0)),
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: LayoutConfig) {
        self.config = config;
    }

    /// The current generation.
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// Makes every outstanding handle stale.
    pub fn invalidate(&self) -> u64 {
        let next = self.generation.get() + 1;
        self.generation.set(next);
        next
    }

    /// Starts a run in `mode`. Radial runs center on the highest-degree
    /// node.
    pub fn layout(
        &self,
        view: &OntologyGraph,
        mode: LayoutType,
        previous: Option<&PreviousPositions>,
    ) -> TickHandle {
        self.start(view, strategy_for(mode, None), previous)
    }

    /// Starts a radial run around `center`.
    pub fn layout_radial(
        &self,
        view: &OntologyGraph,
        center: &str,
        previous: Option<&PreviousPositions>,
    ) -> Result<TickHandle, LayoutError> {
        if view.get_index(center).is_none() {
            return Err(LayoutError::UnknownCenter(center.to_string()));
        }
        Ok(self.start(
            view,
            strategy_for(LayoutType::Radial, Some(center.to_string())),
            previous,
        ))
    }

    fn start(
        &self,
        view: &OntologyGraph,
        mut strategy: Box<dyn LayoutStrategy>,
        previous: Option<&PreviousPositions>,
    ) -> TickHandle {
        let generation = self.invalidate();
        let index = strategy.place(view, previous, &self.config);

        debug!(
            "Layout run {} started: {} mode, {} nodes",
            generation,
            strategy.mode(),
            index.len()
        );

        TickHandle {
            generation,
            current: Rc::clone(&self.generation),
            strategy,
            index,
            reheat_alpha: self.config.reheat_alpha,
            cancelled: false,
            placed: false,
            ticks: 0,
        }
    }
}

/// One layout run, stepped once per frame by the caller.
#[derive(Debug)]
pub struct TickHandle {
    generation: u64,
    current: Rc<Cell<u64>>,
    strategy: Box<dyn LayoutStrategy>,
    index: PositionIndex,
    reheat_alpha: f64,
    cancelled: bool,
    placed: bool,
    ticks: usize,
}

impl TickHandle {
    pub fn mode(&self) -> LayoutType {
        self.strategy.mode()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// False once cancelled or superseded.
    pub fn is_live(&self) -> bool {
        !self.cancelled && self.current.get() == self.generation
    }

    /// Stops this run. Later `step` calls write nothing.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Advances one frame and writes positions into `view`.
    ///
    /// Returns whether the layout is still converging. A stale or
    /// cancelled handle returns `false` and leaves `view` untouched.
    pub fn step(&mut self, view: &mut OntologyGraph) -> bool {
        if !self.is_live() {
            return false;
        }

        // the placement itself is the first frame
        let converging = if self.placed {
            self.ticks += 1;
            self.strategy.step(&mut self.index)
        } else {
            self.placed = true;
            self.strategy.mode().is_iterative()
        };

        self.index.write_back(view);
        converging
    }

    /// Steps until the layout settles or the handle goes stale. Returns
    /// the number of frames taken.
    pub fn run_to_end(&mut self, view: &mut OntologyGraph) -> usize {
        let mut frames = 0;
        while self.step(view) {
            frames += 1;
        }
        frames
    }

    /// Frames simulated after placement.
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    pub fn index(&self) -> &PositionIndex {
        &self.index
    }

    /// Current positions by id.
    pub fn positions(&self) -> PreviousPositions {
        self.index.positions()
    }

    /// Holds a node at `position` (drag) and re-heats the simulation.
    pub fn fix(&mut self, id: &str, position: Position) -> bool {
        if !self.index.fix(id, position) {
            return false;
        }
        let reheat = self.reheat_alpha;
        if let Some(simulation) = self.strategy.simulation_mut() {
            simulation.reheat(reheat);
        }
        true
    }

    /// Ends a drag. The node stays fixed only if pinned.
    pub fn release(&mut self, id: &str) -> bool {
        if !self.index.release(id) {
            return false;
        }
        if let Some(simulation) = self.strategy.simulation_mut() {
            simulation.cool();
        }
        true
    }

    pub fn set_pinned(&mut self, id: &str, pinned: bool) -> bool {
        self.index.set_pinned(id, pinned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontograph_core::{EntityType, Node};
    use ontograph_graph::GraphBuilder;

    fn triangle() -> OntologyGraph {
        let mut builder = GraphBuilder::new();
        for id in ["a", "b", "c"] {
            builder.add_node(Node::new(id, EntityType::Port, id));
        }
        builder
            .add_relation_pair("a", "b", "CALLS_AT", "CALLED_BY")
            .add_relation_pair("b", "c", "CALLS_AT", "CALLED_BY")
            .add_relation_pair("c", "a", "CALLS_AT", "CALLED_BY");
        builder.build().unwrap()
    }

    #[test]
    fn test_cloned_engine_shares_generation() {
        let engine = LayoutEngine::default();
        let view = triangle();
        let handle = engine.layout(&view, LayoutType::Grid, None);

        let copy = engine.clone();
        assert_eq!(copy.invalidate(), handle.generation() + 1);
        assert_eq!(engine.generation(), copy.generation());
        assert!(!handle.is_live());
    }

    #[test]
    fn test_new_run_makes_old_handle_stale() {
        let engine = LayoutEngine::default();
        let mut view = triangle();

        let mut old = engine.layout(&view, LayoutType::Force, None);
        assert!(old.step(&mut view));

        let mut new = engine.layout(&view, LayoutType::Circular, None);
        assert!(!old.is_live());

        let before: Vec<Position> = view.nodes().map(|n| n.position).collect();
        assert!(!old.step(&mut view));
        let after: Vec<Position> = view.nodes().map(|n| n.position).collect();
        assert_eq!(before, after);

        // the circular run places everything in one frame
        assert!(!new.step(&mut view));
        let a = view.get_index("a").unwrap();
        assert_ne!(view.position(a), before.first().copied());
    }

    #[test]
    fn test_cancel_stops_writes() {
        let engine = LayoutEngine::default();
        let mut view = triangle();
        let mut handle = engine.layout(&view, LayoutType::Grid, None);
        handle.cancel();
        assert!(!handle.step(&mut view));
        assert!(view.nodes().all(|n| n.position == Position::ORIGIN));
    }

    #[test]
    fn test_every_mode_handles_empty_and_single_views() {
        let engine = LayoutEngine::default();
        let mut single = {
            let mut builder = GraphBuilder::new();
            builder.add_node(Node::new("only", EntityType::Vessel, "only"));
            builder.build().unwrap()
        };

        for mode in LayoutType::ALL {
            let mut empty = OntologyGraph::new();
            engine.layout(&empty, mode, None).run_to_end(&mut empty);

            engine.layout(&single, mode, None).run_to_end(&mut single);
            let only = single.get_index("only").unwrap();
            let pos = single.position(only).unwrap();
            assert!(pos.is_finite(), "{} produced {:?}", mode, pos);
        }
    }

    #[test]
    fn test_drag_reheats_and_release_frees() {
        let engine = LayoutEngine::default();
        let mut view = triangle();
        let mut handle = engine.layout(&view, LayoutType::Force, None);
        handle.run_to_end(&mut view);
        assert!(!handle.step(&mut view));

        let target = Position::new(10.0, 20.0);
        assert!(handle.fix("a", target));
        assert!(handle.step(&mut view));
        let a = view.get_index("a").unwrap();
        assert_eq!(view.position(a), Some(target));

        handle.release("a");
        handle.run_to_end(&mut view);
        assert_ne!(view.position(a), Some(target));
    }

    #[test]
    fn test_previous_positions_seed_iterative_modes() {
        let engine = LayoutEngine::default();
        let mut view = triangle();
        let mut first = engine.layout(&view, LayoutType::Force, None);
        first.run_to_end(&mut view);
        let settled = first.positions();

        let mut second = engine.layout(&view, LayoutType::Force, Some(&settled));
        second.step(&mut view);
        let a = view.get_index("a").unwrap();
        assert_eq!(view.position(a), settled.get("a").copied());
    }

    #[test]
    fn test_radial_center_must_exist() {
        let engine = LayoutEngine::default();
        let view = triangle();
        assert_eq!(
            engine.layout_radial(&view, "zz", None).unwrap_err(),
            LayoutError::UnknownCenter("zz".to_string())
        );
        let handle = engine.layout_radial(&view, "b", None).unwrap();
        assert_eq!(handle.index().position("b"), Some(engine.config().viewport.center()));
    }

    #[test]
    fn test_invalidate_bumps_generation() {
        let engine = LayoutEngine::default();
        let view = triangle();
        let handle = engine.layout(&view, LayoutType::Force, None);
        assert_eq!(handle.generation(), engine.generation());
        engine.invalidate();
        assert!(!handle.is_live());
    }
}
