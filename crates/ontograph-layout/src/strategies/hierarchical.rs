use super::{links_for, LayoutStrategy};
use crate::config::LayoutConfig;
use crate::mode::LayoutType;
use crate::position_index::{PositionIndex, PreviousPositions};
use crate::simulation::{Force, Simulation};
use ontograph_graph::OntologyGraph;

/// Pull toward the viewport's vertical axis, kept weak so links and
/// repulsion decide x.
const X_STRENGTH: f64 = 0.02;

/// Type-ranked bands: each node is sprung toward the y of its entity
/// type's band while repulsion and links spread it along x.
#[derive(Debug, Default)]
pub struct HierarchicalStrategy {
    simulation: Option<Simulation>,
}

/// Target y of a rank's band.
pub(crate) fn band_y(rank: usize, band_height: f64) -> f64 {
    band_height * (rank as f64 + 1.0)
}

impl LayoutStrategy for HierarchicalStrategy {
    fn mode(&self) -> LayoutType {
        LayoutType::Hierarchical
    }

    fn place(
        &mut self,
        view: &OntologyGraph,
        previous: Option<&PreviousPositions>,
        config: &LayoutConfig,
    ) -> PositionIndex {
        let center = config.viewport.center();
        let mut index = PositionIndex::from_view(view, previous, center, config.node_scale);

        let targets_y: Vec<f64> = index
            .slots()
            .iter()
            .map(|slot| band_y(slot.rank, config.band_height))
            .collect();

        // fresh nodes start on their band
        let seeded = previous.map_or(false, |p| !p.is_empty());
        if !seeded {
            for (slot, &y) in index.slots_mut().iter_mut().zip(&targets_y) {
                if slot.fixed.is_none() {
                    slot.position.y = y;
                }
            }
        }

        let simulation = Simulation::new(config)
            .with_force(Force::ManyBody {
                strength: config.charge,
            })
            .with_force(Force::Links {
                links: links_for(view, &index),
                distance: config.link_distance,
            })
            .with_force(Force::TargetY {
                targets: targets_y,
                strength: config.band_strength,
            })
            .with_force(Force::TargetX {
                targets: vec![center.x; index.len()],
                strength: X_STRENGTH,
            })
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
    use ontograph_core::{EntityType, Node};
    use ontograph_graph::GraphBuilder;

    #[test]
    fn test_nodes_settle_in_rank_order() {
        let mut builder = GraphBuilder::new();
        builder.add_nodes(vec![
            Node::new("idx", EntityType::MarketIndex, "SCFI"),
            Node::new("shp", EntityType::Shipper, "Shipper"),
            Node::new("rt", EntityType::Route, "Route"),
        ]);
        builder
            .add_relation_pair("shp", "rt", "USES", "USED_BY")
            .add_relation_pair("rt", "idx", "HAS_INDEX", "INDEXES");
        let view = builder.build().unwrap();

        let config = LayoutConfig::default();
        let mut strategy = HierarchicalStrategy::default();
        let mut index = strategy.place(&view, None, &config);
        while strategy.step(&mut index) {}

        let y = |id: &str| index.position(id).unwrap().y;
        assert!(y("shp") < y("rt"));
        assert!(y("rt") < y("idx"));

        let expected = band_y(EntityType::Route.rank(), config.band_height);
        assert!((y("rt") - expected).abs() < config.band_height / 2.0);
    }
}
