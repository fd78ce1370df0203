use crate::builder::GraphBuilder;
use crate::edge::GraphEdge;
use crate::filter::{FilterOptions, FilterPredicate};
use crate::graph::{GraphStats, OntologyGraph};
use crate::search_index::SearchIndex;
use crate::synthetic::shipping_ontology;
use ontograph_core::{ConstructionError, Node, Result};
use tracing::info;

/// Default cap on search results.
pub const DEFAULT_SEARCH_LIMIT: usize = 8;

/// The immutable source graph a session starts from.
///
/// Views are produced by filtering; the store itself is never mutated
/// after construction.
#[derive(Debug, Clone)]
pub struct GraphStore {
    graph: OntologyGraph,
    index: SearchIndex,
}

impl GraphStore {
    /// Wraps a finished graph and indexes it for search.
    pub fn from_graph(graph: OntologyGraph) -> Self {
        let index = SearchIndex::build(&graph);
        info!(
            "Graph store ready: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        Self { graph, index }
    }

    /// Builds the store, failing on the first malformed node or edge.
    pub fn build(builder: GraphBuilder) -> std::result::Result<Self, ConstructionError> {
        Ok(Self::from_graph(builder.build()?))
    }

    /// The built-in shipping network.
    pub fn synthetic() -> std::result::Result<Self, ConstructionError> {
        Ok(Self::from_graph(shipping_ontology()?))
    }

    pub fn graph(&self) -> &OntologyGraph {
        &self.graph
    }

    /// All nodes in store order.
    pub fn nodes(&self) -> Vec<&Node> {
        self.graph.nodes().collect()
    }

    /// All directed edges in insertion order.
    pub fn edges(&self) -> Vec<GraphEdge> {
        self.graph.export_edges()
    }

    pub fn node_by_id(&self, id: &str) -> Result<&Node> {
        self.graph.node_by_id(id)
    }

    /// Case-insensitive substring search over label, id, type and
    /// property values. At most `limit` nodes, store order.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Node> {
        self.index
            .search(query)
            .into_iter()
            .filter_map(|idx| self.graph.get(idx))
            .take(limit)
            .collect()
    }

    /// A fresh filtered view.
    pub fn view(&self, predicate: &FilterPredicate) -> OntologyGraph {
        predicate.apply(&self.graph)
    }

    /// A fresh view filtered by `options`. Relationship labels default to
    /// the ones this store actually uses.
    pub fn filtered(&self, options: &FilterOptions) -> OntologyGraph {
        self.view(&options.to_predicate(&self.graph))
    }

    /// The unfiltered graph as a view.
    pub fn full_view(&self) -> OntologyGraph {
        self.graph.clone()
    }

    pub fn stats(&self) -> GraphStats {
        self.graph.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontograph_core::{EntityType, GraphError};

    #[test]
    fn test_synthetic_store() {
        let store = GraphStore::synthetic().unwrap();
        assert!(store.nodes().len() > 15);
        assert_eq!(store.node_by_id("SHP-001").unwrap().entity_type, EntityType::Shipper);
        assert_eq!(
            store.node_by_id("SHP-999"),
            Err(GraphError::NotFound("SHP-999".to_string()))
        );
    }

    #[test]
    fn test_search_limit_and_order() {
        let store = GraphStore::synthetic().unwrap();
        let bookings = store.search("booking", DEFAULT_SEARCH_LIMIT);
        assert_eq!(bookings.len(), DEFAULT_SEARCH_LIMIT);
        assert_eq!(bookings[0].id, "BK-001");

        let by_property = store.search("electronics", 20);
        let ids: Vec<&str> = by_property.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["SHP-001", "CG-001"]);

        assert!(store.search("", DEFAULT_SEARCH_LIMIT).is_empty());
    }

    #[test]
    fn test_filtered_keeps_every_label_by_default() {
        let mut builder = GraphBuilder::new();
        builder
            .add_node(Node::new("a", EntityType::Port, "Busan"))
            .add_node(Node::new("b", EntityType::Terminal, "Busan New"))
            .add_edge("a", "b", "LINKED");
        let store = GraphStore::build(builder).unwrap();

        let view = store.filtered(&FilterOptions::default());
        assert_eq!(view.edge_count(), 1);
    }

    #[test]
    fn test_view_does_not_touch_store() {
        let store = GraphStore::synthetic().unwrap();
        let mut view = store.full_view();
        let idx = view.get_index("SHP-001").unwrap();
        view.set_position(idx, ontograph_core::Position::new(5.0, 5.0));
        assert_eq!(
            store.node_by_id("SHP-001").unwrap().position,
            ontograph_core::Position::ORIGIN
        );
    }

    #[test]
    fn test_build_rejects_dangling_edge() {
        let mut builder = GraphBuilder::new();
        builder
            .add_node(Node::new("a", EntityType::Port, "a"))
            .add_edge("a", "b", "CALLS_AT");
        assert!(GraphStore::build(builder).is_err());
    }
}
