use super::{links_for, LayoutStrategy};
use crate::config::LayoutConfig;
use crate::mode::LayoutType;
use crate::position_index::{PositionIndex, PreviousPositions};
use crate::simulation::{Force, Simulation};
use ontograph_graph::OntologyGraph;

/// Free force-directed layout: repulsion, link springs, centering and
/// collision.
#[derive(Debug, Default)]
pub struct ForceStrategy {
    simulation: Option<Simulation>,
}

impl LayoutStrategy for ForceStrategy {
    fn mode(&self) -> LayoutType {
        LayoutType::Force
    }

    fn place(
        &mut self,
        view: &OntologyGraph,
        previous: Option<&PreviousPositions>,
        config: &LayoutConfig,
    ) -> PositionIndex {
        let center = config.viewport.center();
        let index = PositionIndex::from_view(view, previous, center, config.node_scale);

        let simulation = Simulation::new(config)
            .with_force(Force::ManyBody {
                strength: config.charge,
            })
            .with_force(Force::Links {
                links: links_for(view, &index),
                distance: config.link_distance,
            })
            .with_force(Force::Center { center })
            .with_force(Force::Collide {
                min_radius: config.collide_radius,
                strength: 1.0,
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

#[cfg(test)]
mod tests {
    use super::*;
    use ontograph_core::{EntityType, Node, Position};
    use ontograph_graph::GraphBuilder;

    #[test]
    fn test_linked_pair_settles_near_link_distance() {
        let mut builder = GraphBuilder::new();
        builder
            .add_node(Node::new("a", EntityType::Route, "a"))
            .add_node(Node::new("b", EntityType::Vessel, "b"))
            .add_relation_pair("b", "a", "OPERATES_ON", "SERVED_BY");
        let view = builder.build().unwrap();
        let config = LayoutConfig::default();

        let mut strategy = ForceStrategy::default();
        let mut index = strategy.place(&view, None, &config);
        while strategy.step(&mut index) {}

        let a = index.position("a").unwrap();
        let b = index.position("b").unwrap();
        let d = a.distance(b);
        // repulsion stretches the spring a little
        assert!(d > 100.0 && d < 250.0, "distance {}", d);

        // the pair is centred on the viewport
        let mid = (a + b) * 0.5;
        assert!(mid.distance(config.viewport.center()) < 1.0);
    }

    #[test]
    fn test_positions_stay_finite() {
        let mut builder = GraphBuilder::new();
        for i in 0..6 {
            builder.add_node(Node::new(format!("n{}", i), EntityType::Port, "p"));
        }
        let view = builder.build().unwrap();
        let mut strategy = ForceStrategy::default();
        let mut index = strategy.place(&view, None, &LayoutConfig::default());
        while strategy.step(&mut index) {}
        assert!(index.slots().iter().all(|s| s.position.is_finite()));
        assert!(index.slots().iter().all(|s| s.position != Position::ORIGIN));
    }
}
