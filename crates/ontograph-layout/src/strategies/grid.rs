use super::LayoutStrategy;
use crate::config::LayoutConfig;
use crate::mode::LayoutType;
use crate::position_index::{PositionIndex, PreviousPositions};
use crate::simulation::{Force, Simulation};
use ontograph_core::Position;
use ontograph_graph::OntologyGraph;

/// Square-ish grid: each node is sprung toward the center of its cell,
/// with a little repulsion so neighbours do not stack while settling.
#[derive(Debug, Default)]
pub struct GridStrategy {
    simulation: Option<Simulation>,
}

/// Cell centers for `n` nodes, centered on `center`, row-major.
pub(crate) fn cell_centers(n: usize, center: Position, spacing: f64) -> Vec<Position> {
    if n == 0 {
        return Vec::new();
    }
    let cols = (n as f64).sqrt().ceil() as usize;
    let rows = n.div_ceil(cols);
    let x0 = center.x - (cols as f64 - 1.0) * spacing / 2.0;
    let y0 = center.y - (rows as f64 - 1.0) * spacing / 2.0;

    (0..n)
        .map(|i| {
            let (row, col) = (i / cols, i % cols);
            Position::new(x0 + col as f64 * spacing, y0 + row as f64 * spacing)
        })
        .collect()
}

impl LayoutStrategy for GridStrategy {
    fn mode(&self) -> LayoutType {
        LayoutType::Grid
    }

    fn place(
        &mut self,
        view: &OntologyGraph,
        previous: Option<&PreviousPositions>,
        config: &LayoutConfig,
    ) -> PositionIndex {
        let center = config.viewport.center();
        let index = PositionIndex::from_view(view, previous, center, config.node_scale);
        let cells = cell_centers(index.len(), center, config.grid_spacing);

        let simulation = Simulation::new(config)
            .with_force(Force::ManyBody {
                strength: config.grid_charge,
            })
            .with_force(Force::TargetX {
                targets: cells.iter().map(|c| c.x).collect(),
                strength: config.grid_strength,
            })
            .with_force(Force::TargetY {
                targets: cells.iter().map(|c| c.y).collect(),
                strength: config.grid_strength,
            });

        self.simulation = Some(simulation);
        index
    }

    fn step(&mut self, index: &mut PositionIndex) -> bool {
        match &mut self.simulation {
            Some(simulation) => simulation.tick(index),
            None => false,
        }
    }

    fn simulation_mut(&mut self) -> Option<&mut Simulation> {
        self.simulation.as_mut()
    }
}
