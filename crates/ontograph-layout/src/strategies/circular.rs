use super::LayoutStrategy;
use crate::config::LayoutConfig;
use crate::mode::LayoutType;
use crate::position_index::{PositionIndex, PreviousPositions};
use ontograph_graph::OntologyGraph;
use std::f64::consts::PI;

/// Share of the shorter viewport side used as the circle's radius.
const RADIUS_FRACTION: f64 = 0.4;

/// All nodes on one circle in store order. Single pass.
#[derive(Debug, Default)]
pub struct CircularStrategy;

impl LayoutStrategy for CircularStrategy {
    fn mode(&self) -> LayoutType {
        LayoutType::Circular
    }

    fn place(
        &mut self,
        view: &OntologyGraph,
        previous: Option<&PreviousPositions>,
        config: &LayoutConfig,
    ) -> PositionIndex {
        let center = config.viewport.center();
        let mut index = PositionIndex::from_view(view, previous, center, config.node_scale);

        let n = index.len();
        let radius = config.viewport.min_side() * RADIUS_FRACTION;

        for (i, slot) in index.slots_mut().iter_mut().enumerate() {
            if slot.fixed.is_some() {
                continue;
            }
            slot.position = if n == 1 {
                center
            } else {
                center.on_circle(radius, 2.0 * PI * i as f64 / n as f64)
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

    #[test]
    fn test_even_spacing_in_store_order() {
        let mut builder = GraphBuilder::new();
        for id in ["a", "b", "c", "d"] {
            builder.add_node(Node::new(id, EntityType::Port, id));
        }
        let view = builder.build().unwrap();
        let config = LayoutConfig::default().with_viewport(200.0, 200.0);

        let index = CircularStrategy.place(&view, None, &config);
        let close = |p: Position, x: f64, y: f64| (p.x - x).abs() < 1e-9 && (p.y - y).abs() < 1e-9;
        assert!(close(index.position("a").unwrap(), 180.0, 100.0));
        assert!(close(index.position("b").unwrap(), 100.0, 180.0));
        assert!(close(index.position("c").unwrap(), 20.0, 100.0));
        assert!(close(index.position("d").unwrap(), 100.0, 20.0));
    }

    #[test]
    fn test_pinned_nodes_are_skipped() {
        let mut builder = GraphBuilder::new();
        builder
            .add_node(Node::new("a", EntityType::Port, "a"))
            .add_node(Node::new("b", EntityType::Port, "b"));
        let mut view = builder.build().unwrap();
        let a = view.get_index("a").unwrap();
        view.set_position(a, Position::new(-5.0, -5.0));
        view.set_pinned(a, true);

        let index = CircularStrategy.place(&view, None, &LayoutConfig::default());
        assert_eq!(index.position("a"), Some(Position::new(-5.0, -5.0)));
    }
}
