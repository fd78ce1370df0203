//! Core graph data structure.
//!
//! `OntologyGraph` wraps a petgraph arena and adds an id index for O(1)
//! lookups. The same type serves as the immutable store graph and as the
//! disposable filtered views derived from it; views are owned copies, so
//! writing layout state into a view never touches the store.

use crate::analytics::unique_pairs;
use crate::edge::{Edge, GraphEdge};
use indexmap::IndexMap;
use ontograph_core::{EntityType, GraphError, Node, Position, Result};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Index of a node inside one graph (store or view).
///
/// Indexes are only meaningful for the graph that produced them; use the
/// string id to move between the store and a view.
pub type NodeId = NodeIndex;

/// The ontology graph: typed nodes plus directed, labelled edges.
#[derive(Debug, Clone, Default)]
pub struct OntologyGraph {
    /// The underlying petgraph graph.
    pub(crate) graph: DiGraph<Node, Edge>,

    /// Maps string IDs to graph node indexes.
    id_index: HashMap<String, NodeId>,

    /// Maps entity types to their nodes, in insertion order.
    type_index: HashMap<EntityType, Vec<NodeId>>,
}

impl OntologyGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node. Callers guarantee the id is unique.
    pub(crate) fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id.clone();
        let entity_type = node.entity_type;

        let index = self.graph.add_node(node);

        self.id_index.insert(id, index);
        self.type_index.entry(entity_type).or_default().push(index);

        index
    }

    /// Adds an edge between two existing nodes.
    pub(crate) fn add_edge(&mut self, from: NodeId, to: NodeId, edge: Edge) {
        self.graph.add_edge(from, to, edge);
    }

    /// Gets a node by its string ID.
    pub fn get_by_id(&self, id: &str) -> Option<&Node> {
        let index = self.id_index.get(id)?;
        self.graph.node_weight(*index)
    }

    /// Gets a node by its string ID, reporting unknown ids as `NotFound`.
    pub fn node_by_id(&self, id: &str) -> Result<&Node> {
        self.get_by_id(id).ok_or_else(|| GraphError::not_found(id))
    }

    /// Gets a node by its graph index.
    pub fn get(&self, index: NodeId) -> Option<&Node> {
        self.graph.node_weight(index)
    }

    /// Gets the node index for a string ID.
    pub fn get_index(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    /// Like `get_index`, but unknown ids are an error.
    pub fn require_index(&self, id: &str) -> Result<NodeId> {
        self.get_index(id).ok_or_else(|| GraphError::not_found(id))
    }

    /// Finds all nodes of one entity type, in store order.
    pub fn find_by_type(&self, entity_type: EntityType) -> Vec<&Node> {
        self.type_index
            .get(&entity_type)
            .map(|indexes| {
                indexes
                    .iter()
                    .filter_map(|idx| self.graph.node_weight(*idx))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of directed edges (forward and inverse counted).
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// True when the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Iterates over all nodes in store order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    /// Iterates over all node indexes in store order.
    pub fn node_indexes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_indices()
    }

    /// Iterates over all directed edges as `(source, target, edge)`,
    /// in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, &Edge)> {
        self.graph
            .edge_references()
            .map(|edge_ref| (edge_ref.source(), edge_ref.target(), edge_ref.weight()))
    }

    /// Returns all edges with source and target IDs for export.
    pub fn export_edges(&self) -> Vec<GraphEdge> {
        self.edges()
            .filter_map(|(source, target, edge)| {
                Some(GraphEdge {
                    source: self.get(source)?.id.clone(),
                    target: self.get(target)?.id.clone(),
                    relationship: edge.relationship.clone(),
                })
            })
            .collect()
    }

    /// Distinct relationship labels, in first-seen order.
    pub fn relationships(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.graph
            .edge_weights()
            .map(|edge| edge.relationship.as_str())
            .filter(|rel| seen.insert(*rel))
            .collect()
    }

    /// Current layout position of a node.
    pub fn position(&self, index: NodeId) -> Option<Position> {
        self.get(index).map(|node| node.position)
    }

    /// Writes a node's layout position. Only layout and interaction code
    /// should call this, and only on views.
    pub fn set_position(&mut self, index: NodeId, position: Position) {
        if let Some(node) = self.graph.node_weight_mut(index) {
            node.position = position;
        }
    }

    /// Marks a node as pinned or free.
    pub fn set_pinned(&mut self, index: NodeId, pinned: bool) {
        if let Some(node) = self.graph.node_weight_mut(index) {
            node.pinned = pinned;
        }
    }

    /// Builds a new graph from the nodes and edges accepted by the
    /// predicates. Store order is preserved for both.
    pub(crate) fn retain(
        &self,
        keep_node: impl Fn(NodeId, &Node) -> bool,
        keep_edge: impl Fn(NodeId, NodeId, &Edge) -> bool,
    ) -> OntologyGraph {
        let mut view = OntologyGraph::new();
        let mut remap: HashMap<NodeId, NodeId> = HashMap::new();

        for index in self.graph.node_indices() {
            if let Some(node) = self.graph.node_weight(index) {
                if keep_node(index, node) {
                    remap.insert(index, view.add_node(node.clone()));
                }
            }
        }

        for (source, target, edge) in self.edges() {
            if let (Some(&from), Some(&to)) = (remap.get(&source), remap.get(&target)) {
                if keep_edge(source, target, edge) {
                    view.add_edge(from, to, edge.clone());
                }
            }
        }

        view
    }

    /// Star sub-view around `center`: the center, its depth-1 neighbours,
    /// and only the edges that touch the center.
    pub fn ego_network(&self, center: &str) -> Result<OntologyGraph> {
        let center_idx = self.require_index(center)?;

        let mut members: HashSet<NodeId> = HashSet::new();
        members.insert(center_idx);
        for (source, target, _) in self.edges() {
            if source == center_idx {
                members.insert(target);
            } else if target == center_idx {
                members.insert(source);
            }
        }

        Ok(self.retain(
            |idx, _| members.contains(&idx),
            |source, target, _| source == center_idx || target == center_idx,
        ))
    }
}

/// Graph statistics for the stats panel and CLI.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub node_count: usize,
    /// Directed edges as stored, forward and inverse both counted.
    pub edge_count: usize,
    /// Unique unordered node pairs (the analytics convention).
    pub unique_edge_count: usize,
    /// Nodes per entity type, in rank order; absent types are omitted.
    pub type_distribution: IndexMap<EntityType, usize>,
}

impl OntologyGraph {
    /// Returns graph statistics.
    pub fn stats(&self) -> GraphStats {
        let mut type_distribution = IndexMap::new();
        for entity_type in EntityType::ALL {
            let count = self.type_index.get(&entity_type).map_or(0, Vec::len);
            if count > 0 {
                type_distribution.insert(entity_type, count);
            }
        }

        GraphStats {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            unique_edge_count: unique_pairs(self).len(),
            type_distribution,
        }
    }
}
