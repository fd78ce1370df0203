//! JSON export → import over generated graphs.

use ontograph_core::{EntityType, Node};
use ontograph_graph::{GraphBuilder, OntologyGraph};
use ontograph_view::{export_json, import_json};
use proptest::prelude::*;

fn arb_graph() -> impl Strategy<Value = OntologyGraph> {
    let node = (
        0..EntityType::ALL.len(),
        -1.0e6..1.0e6f64,
        -1.0e6..1.0e6f64,
        any::<bool>(),
        "[a-zA-Z &<>\"]{0,12}",
    );
    (
        prop::collection::vec(node, 1..10),
        prop::collection::vec((0..10usize, 0..10usize), 0..20),
    )
        .prop_map(|(nodes, edges)| {
            let n = nodes.len();
            let mut builder = GraphBuilder::new();
            for (i, (t, x, y, pinned, label)) in nodes.into_iter().enumerate() {
                let mut node = Node::new(format!("N{}", i), EntityType::ALL[t], label)
                    .with_property("slot", i.to_string())
                    .at(x, y);
                node.pinned = pinned;
                builder.add_node(node);
            }
            for (a, b) in edges {
                builder.add_edge(format!("N{}", a % n), format!("N{}", b % n), "USES");
            }
            builder.build().unwrap()
        })
}

proptest! {
    #[test]
    fn json_round_trip_reproduces_nodes_edges_and_positions(graph in arb_graph()) {
        let json = export_json(&graph).unwrap();
        let imported = import_json(&json).unwrap();

        prop_assert_eq!(graph.node_count(), imported.node_count());
        for (a, b) in graph.nodes().zip(imported.nodes()) {
            prop_assert_eq!(&a.id, &b.id);
            prop_assert_eq!(a.entity_type, b.entity_type);
            prop_assert_eq!(&a.label, &b.label);
            prop_assert_eq!(&a.properties, &b.properties);
            prop_assert_eq!(a.pinned, b.pinned);
            prop_assert!((a.position.x - b.position.x).abs() <= 1e-9 * a.position.x.abs().max(1.0));
            prop_assert!((a.position.y - b.position.y).abs() <= 1e-9 * a.position.y.abs().max(1.0));
        }
        prop_assert_eq!(graph.export_edges(), imported.export_edges());
    }
}
