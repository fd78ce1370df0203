//! Graph builder for constructing the ontology graph.
//!
//! The builder collects nodes and string-addressed edges, then resolves
//! the edges against the node index in a second pass. Construction is
//! all-or-nothing: a duplicate id or a dangling endpoint fails the whole
//! build, so a graph that exists is always consistent.

use crate::edge::Edge;
use crate::graph::OntologyGraph;
use ontograph_core::{ConstructionError, Node};
use std::collections::HashSet;
use tracing::debug;

/// An edge waiting for its endpoints to be resolved.
#[derive(Debug, Clone)]
struct PendingEdge {
    source: String,
    target: String,
    relationship: String,
}

/// Builds an `OntologyGraph` from nodes and id-addressed edges.
///
/// The builder handles the two-pass process:
/// 1. Add all nodes
/// 2. Resolve edges by id (`build`)
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<Node>,
    edges: Vec<PendingEdge>,
}

impl GraphBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single node.
    pub fn add_node(&mut self, node: Node) -> &mut Self {
        self.nodes.push(node);
        self
    }

    /// Adds a batch of nodes.
    pub fn add_nodes(&mut self, nodes: impl IntoIterator<Item = Node>) -> &mut Self {
        self.nodes.extend(nodes);
        self
    }

    /// Adds one directed edge.
    pub fn add_edge(
        &mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        relationship: impl Into<String>,
    ) -> &mut Self {
        self.edges.push(PendingEdge {
            source: source.into(),
            target: target.into(),
            relationship: relationship.into(),
        });
        self
    }

    /// Adds a relation and its named inverse as two directed edges.
    pub fn add_relation_pair(
        &mut self,
        source: &str,
        target: &str,
        relationship: &str,
        inverse: &str,
    ) -> &mut Self {
        self.add_edge(source, target, relationship);
        self.add_edge(target, source, inverse);
        self
    }

    /// Number of nodes added so far.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Finishes building and returns the graph.
    pub fn build(self) -> Result<OntologyGraph, ConstructionError> {
        let mut graph = OntologyGraph::new();
        let mut seen: HashSet<String> = HashSet::with_capacity(self.nodes.len());

        for node in self.nodes {
            if node.id.is_empty() {
                return Err(ConstructionError::EmptyId);
            }
            if !seen.insert(node.id.clone()) {
                return Err(ConstructionError::DuplicateNode(node.id));
            }
            graph.add_node(node);
        }

        for pending in self.edges {
            if pending.relationship.is_empty() {
                return Err(ConstructionError::EmptyRelationship {
                    from: pending.source,
                    to: pending.target,
                });
            }

            let from = graph.get_index(&pending.source);
            let to = graph.get_index(&pending.target);

            match (from, to) {
                (Some(from), Some(to)) => {
                    graph.add_edge(from, to, Edge::new(pending.relationship));
                }
                (None, _) => {
                    return Err(ConstructionError::DanglingEdge {
                        missing: pending.source.clone(),
                        from: pending.source,
                        to: pending.target,
                        relationship: pending.relationship,
                    });
                }
                (_, None) => {
                    return Err(ConstructionError::DanglingEdge {
                        missing: pending.target.clone(),
                        from: pending.source,
                        to: pending.target,
                        relationship: pending.relationship,
                    });
                }
            }
        }

        debug!(
            "Built graph with {} nodes and {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        Ok(graph)
    }
}
