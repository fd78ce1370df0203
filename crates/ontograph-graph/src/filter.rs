//! Filtering the store into a view.
//!
//! A filter is applied in one pass: type filter, relationship filter,
//! degree computed on what survived, then the degree window. Nodes whose
//! degree drops because a neighbour was removed by the degree window are
//! not reconsidered.

use crate::analytics::unique_pairs;
use crate::graph::{NodeId, OntologyGraph};
use ontograph_core::EntityType;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, warn};

/// Which nodes and edges make it into a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPredicate {
    pub included_types: BTreeSet<EntityType>,
    pub included_relationships: BTreeSet<String>,
    pub min_degree: usize,
    pub max_degree: usize,
}

impl FilterPredicate {
    /// A predicate that keeps everything in `graph`.
    pub fn all(graph: &OntologyGraph) -> Self {
        Self {
            included_types: EntityType::ALL.into_iter().collect(),
            included_relationships: graph
                .relationships()
                .into_iter()
                .map(String::from)
                .collect(),
            min_degree: 0,
            max_degree: usize::MAX,
        }
    }

    /// Builds the filtered view. Store order is preserved.
    pub fn apply(&self, graph: &OntologyGraph) -> OntologyGraph {
        // 1. type filter
        let typed: HashSet<NodeId> = graph
            .node_indexes()
            .filter(|&idx| {
                graph
                    .get(idx)
                    .map_or(false, |n| self.included_types.contains(&n.entity_type))
            })
            .collect();

        // 2. relationship filter, both endpoints typed
        let keep_edge = |source: NodeId, target: NodeId, relationship: &str| {
            typed.contains(&source)
                && typed.contains(&target)
                && self.included_relationships.contains(relationship)
        };

        let stage_two = graph.retain(
            |idx, _| typed.contains(&idx),
            |s, t, edge| keep_edge(s, t, &edge.relationship),
        );

        // 3. degree over the surviving edges
        let mut degree: HashMap<&str, usize> = HashMap::new();
        for (a, b) in unique_pairs(&stage_two) {
            for idx in [a, b] {
                if let Some(node) = stage_two.get(idx) {
                    *degree.entry(node.id.as_str()).or_default() += 1;
                }
            }
        }

        // 4. degree window, then drop edges touching a dropped node
        let in_window = |id: &str| {
            let d = degree.get(id).copied().unwrap_or(0);
            d >= self.min_degree && d <= self.max_degree
        };

        let view = stage_two.retain(|_, node| in_window(&node.id), |_, _, _| true);

        debug!(
            "Filter kept {}/{} nodes and {}/{} edges",
            view.node_count(),
            graph.node_count(),
            view.edge_count(),
            graph.edge_count()
        );

        view
    }
}

/// Visual node size option.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl NodeSize {
    /// Multiplier applied to node radii.
    pub fn scale(self) -> f64 {
        match self {
            NodeSize::Small => 0.75,
            NodeSize::Medium => 1.0,
            NodeSize::Large => 1.5,
        }
    }
}

/// Filter and display options as collaborators send them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterOptions {
    pub node_types: Vec<String>,
    /// Relationship labels to keep. `None` keeps every label the graph
    /// uses, including ones outside the built-in vocabulary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation_types: Option<Vec<String>>,
    pub min_connections: usize,
    pub max_connections: usize,
    pub show_labels: bool,
    pub node_size: NodeSize,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            node_types: EntityType::ALL
                .iter()
                .map(|t| t.as_str().to_string())
                .collect(),
            relation_types: None,
            min_connections: 0,
            max_connections: 100,
            show_labels: true,
            node_size: NodeSize::Medium,
        }
    }
}

impl FilterOptions {
    /// Converts to a predicate over `graph`. Unknown type names are
    /// skipped.
    pub fn to_predicate(&self, graph: &OntologyGraph) -> FilterPredicate {
        let mut included_types = BTreeSet::new();
        for name in &self.node_types {
            match name.parse::<EntityType>() {
                Ok(entity_type) => {
                    included_types.insert(entity_type);
                }
                Err(e) => warn!("Ignoring node type filter: {}", e),
            }
        }

        FilterPredicate {
            included_types,
            included_relationships: match &self.relation_types {
                Some(names) => names.iter().cloned().collect(),
                None => graph.relationships().into_iter().map(String::from).collect(),
            },
            min_degree: self.min_connections,
            max_degree: self.max_connections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use ontograph_core::Node;

    fn sample() -> OntologyGraph {
        let mut builder = GraphBuilder::new();
        builder.add_nodes(vec![
            Node::new("SHP-1", EntityType::Shipper, "Shipper"),
            Node::new("RT-1", EntityType::Route, "Route"),
            Node::new("VSL-1", EntityType::Vessel, "Vessel"),
            Node::new("PRT-1", EntityType::Port, "Port"),
        ]);
        builder
            .add_relation_pair("SHP-1", "RT-1", "USES", "USED_BY")
            .add_relation_pair("VSL-1", "RT-1", "OPERATES_ON", "SERVED_BY")
            .add_relation_pair("RT-1", "PRT-1", "CALLS_AT", "CALLED_BY");
        builder.build().unwrap()
    }

    fn ids(view: &OntologyGraph) -> Vec<String> {
        view.nodes().map(|n| n.id.clone()).collect()
    }

    #[test]
    fn test_all_keeps_everything() {
        let graph = sample();
        let view = FilterPredicate::all(&graph).apply(&graph);
        assert_eq!(view.node_count(), 4);
        assert_eq!(view.edge_count(), 6);
    }

    #[test]
    fn test_empty_types_gives_empty_view() {
        let graph = sample();
        let mut predicate = FilterPredicate::all(&graph);
        predicate.included_types.clear();
        let view = predicate.apply(&graph);
        assert!(view.is_empty());
        assert_eq!(view.edge_count(), 0);
    }

    #[test]
    fn test_type_filter_drops_touching_edges() {
        let graph = sample();
        let mut predicate = FilterPredicate::all(&graph);
        predicate.included_types.remove(&EntityType::Route);
        let view = predicate.apply(&graph);
        assert_eq!(ids(&view), vec!["SHP-1", "VSL-1", "PRT-1"]);
        assert_eq!(view.edge_count(), 0);
    }

    #[test]
    fn test_degree_window_single_pass() {
        let graph = sample();
        let mut predicate = FilterPredicate::all(&graph);
        // the route has degree 3, every leaf degree 1
        predicate.min_degree = 2;
        let view = predicate.apply(&graph);
        // the route survives with degree 3 computed before pruning, even
        // though all of its neighbours were dropped
        assert_eq!(ids(&view), vec!["RT-1"]);
        assert_eq!(view.edge_count(), 0);
    }

    #[test]
    fn test_relationship_filter_feeds_degree() {
        let graph = sample();
        let mut predicate = FilterPredicate::all(&graph);
        predicate.included_relationships = ["USES", "USED_BY"].iter().map(|s| s.to_string()).collect();
        predicate.min_degree = 1;
        let view = predicate.apply(&graph);
        assert_eq!(ids(&view), vec!["SHP-1", "RT-1"]);
        assert_eq!(view.edge_count(), 2);
    }

    #[test]
    fn test_options_ignore_unknown_types() {
        let options = FilterOptions {
            node_types: vec!["shipper".into(), "spaceship".into(), "MARKET_INDEX".into()],
            ..FilterOptions::default()
        };
        let predicate = options.to_predicate(&sample());
        assert_eq!(predicate.included_types.len(), 2);
        assert!(predicate.included_types.contains(&EntityType::MarketIndex));
        assert_eq!(predicate.max_degree, 100);
    }

    #[test]
    fn test_options_serde_defaults() {
        let options: FilterOptions =
            serde_json::from_str(r#"{"nodeSize": "large", "minConnections": 2}"#).unwrap();
        assert_eq!(options.node_size, NodeSize::Large);
        assert_eq!(options.min_connections, 2);
        assert_eq!(options.node_types.len(), 15);
        assert_eq!(options.relation_types, None);
        assert!(options.show_labels);

        let json = serde_json::to_value(FilterOptions::default()).unwrap();
        assert!(json.get("relationTypes").is_none());
    }

    #[test]
    fn test_default_options_keep_labels_outside_vocabulary() {
        let mut builder = GraphBuilder::new();
        builder.add_nodes(vec![
            Node::new("A", EntityType::Port, "Busan"),
            Node::new("B", EntityType::Port, "Ulsan"),
            Node::new("C", EntityType::Port, "Incheon"),
        ]);
        builder
            .add_edge("A", "B", "LINKED")
            .add_relation_pair("B", "C", "CALLS_AT", "CALLED_BY");
        let graph = builder.build().unwrap();

        let view = FilterOptions::default().to_predicate(&graph).apply(&graph);
        assert_eq!(view.edge_count(), 3);
        assert!(view.relationships().contains(&"LINKED"));

        // an explicit list still excludes what it does not name
        let options = FilterOptions {
            relation_types: Some(vec!["CALLS_AT".into(), "CALLED_BY".into()]),
            ..FilterOptions::default()
        };
        let view = options.to_predicate(&graph).apply(&graph);
        assert_eq!(view.edge_count(), 2);
        assert!(!view.relationships().contains(&"LINKED"));
    }
}
