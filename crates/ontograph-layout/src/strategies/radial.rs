use super::LayoutStrategy;
use crate::config::LayoutConfig;
use crate::mode::LayoutType;
use crate::position_index::{PositionIndex, PreviousPositions};
use ontograph_graph::{Adjacency, NodeId, OntologyGraph};
use std::f64::consts::PI;
use tracing::warn;

/// Ego-centric star: the center node in the middle, its direct
/// neighbours evenly spaced on one ring. Nodes further out are not part
/// of the layout.
#[derive(Debug, Default)]
pub struct RadialStrategy {
    center: Option<String>,
}

impl RadialStrategy {
    pub fn new(center: Option<String>) -> Self {
        Self { center }
    }

    /// The explicit center when it exists in the view, otherwise the
    /// highest-degree node.
    fn resolve_center(&self, view: &OntologyGraph) -> Option<NodeId> {
        if let Some(id) = &self.center {
            match view.get_index(id) {
                Some(idx) => return Some(idx),
                None => warn!("Radial center {} not in view, using highest degree", id),
            }
        }
        view.degree_centrality().max().map(|(idx, _)| idx)
    }
}

impl LayoutStrategy for RadialStrategy {
    fn mode(&self) -> LayoutType {
        LayoutType::Radial
    }

    fn place(
        &mut self,
        view: &OntologyGraph,
        previous: Option<&PreviousPositions>,
        config: &LayoutConfig,
    ) -> PositionIndex {
        let center_pos = config.viewport.center();
        let Some(center) = self.resolve_center(view) else {
            return PositionIndex::default();
        };

        let adjacency = Adjacency::new(view);
        let neighbors = adjacency.neighbors(center);

        let mut members = Vec::with_capacity(neighbors.len() + 1);
        members.push(center);
        members.extend_from_slice(neighbors);

        let mut index =
            PositionIndex::from_members(view, &members, previous, center_pos, config.node_scale);

        let radius = config.radial_radius();
        let count = neighbors.len();
        for (slot_number, slot) in index.slots_mut().iter_mut().enumerate() {
            if slot.fixed.is_some() {
                continue;
            }
            slot.position = if slot_number == 0 {
                center_pos
            } else {
                let i = slot_number - 1;
                center_pos.on_circle(radius, 2.0 * PI * i as f64 / count as f64)
            };
        }

        index
    }

    fn step(&mut self, _index: &mut PositionIndex) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontograph_core::{EntityType, Node, Position};
    use ontograph_graph::GraphBuilder;

    fn star() -> OntologyGraph {
        // hub with three spokes, one spoke has a further neighbour
        let mut builder = GraphBuilder::new();
        builder.add_nodes(vec![
            Node::new("leaf", EntityType::Port, "leaf"),
            Node::new("hub", EntityType::Route, "hub"),
            Node::new("s1", EntityType::Vessel, "s1"),
            Node::new("s2", EntityType::Vessel, "s2"),
            Node::new("s3", EntityType::Vessel, "s3"),
        ]);
        builder
            .add_relation_pair("hub", "s1", "SERVED_BY", "OPERATES_ON")
            .add_relation_pair("hub", "s2", "SERVED_BY", "OPERATES_ON")
            .add_relation_pair("hub", "s3", "SERVED_BY", "OPERATES_ON")
            .add_relation_pair("s1", "s2", "LINKED", "LINKED")
            .add_relation_pair("s3", "leaf", "CALLS_AT", "CALLED_BY");
        builder.build().unwrap()
    }

    #[test]
    fn test_default_center_is_highest_degree() {
        let config = LayoutConfig::default().with_viewport(300.0, 300.0);
        let mut strategy = RadialStrategy::default();
        let index = strategy.place(&star(), None, &config);

        assert_eq!(index.len(), 4);
        assert_eq!(index.position("hub"), Some(Position::new(150.0, 150.0)));
        assert!(index.get("leaf").is_none());

        // first spoke at angle 0 on the min(w, h) / 3 ring
        let s1 = index.position("s1").unwrap();
        assert!((s1.x - 250.0).abs() < 1e-9);
        assert!((s1.y - 150.0).abs() < 1e-9);
        for id in ["s1", "s2", "s3"] {
            let d = index.position(id).unwrap().distance(Position::new(150.0, 150.0));
            assert!((d - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_explicit_center() {
        let config = LayoutConfig::default();
        let mut strategy = RadialStrategy::new(Some("s3".to_string()));
        let index = strategy.place(&star(), None, &config);
        assert_eq!(index.len(), 3);
        assert_eq!(index.position("s3"), Some(config.viewport.center()));
        assert!(!strategy.step(&mut index.clone()));
    }

    #[test]
    fn test_empty_and_single() {
        let config = LayoutConfig::default();
        let mut strategy = RadialStrategy::default();
        assert!(strategy.place(&OntologyGraph::new(), None, &config).is_empty());

        let mut builder = GraphBuilder::new();
        builder.add_node(Node::new("solo", EntityType::Port, "solo"));
        let index = strategy.place(&builder.build().unwrap(), None, &config);
        assert_eq!(index.position("solo"), Some(config.viewport.center()));
    }
}
