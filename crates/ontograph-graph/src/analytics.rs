//! Degree centrality, density and clustering.
//!
//! All measures here use the unique unordered pair convention: a forward
//! edge and its inverse, or several parallel edges, count as one
//! connection. Self-loops are skipped entirely.

use crate::graph::{NodeId, OntologyGraph};
use ontograph_core::{EntityType, NodeSummary};
use serde::Serialize;
use std::collections::{HashSet, VecDeque};

/// Unique unordered node pairs, in order of first appearance.
///
/// Each pair is normalized so the lower index comes first.
pub fn unique_pairs(graph: &OntologyGraph) -> Vec<(NodeId, NodeId)> {
    let mut seen = HashSet::new();
    let mut pairs = Vec::new();

    for (source, target, _) in graph.edges() {
        if source == target {
            continue;
        }
        let pair = if source < target {
            (source, target)
        } else {
            (target, source)
        };
        if seen.insert(pair) {
            pairs.push(pair);
        }
    }

    pairs
}

/// Undirected adjacency over unique pairs.
///
/// Neighbour lists keep the order in which the connecting edges were
/// first inserted, which keeps traversals deterministic.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    neighbors: Vec<Vec<NodeId>>,
    pair_count: usize,
}

impl Adjacency {
    pub fn new(graph: &OntologyGraph) -> Self {
        let mut neighbors = vec![Vec::new(); graph.node_count()];
        let pairs = unique_pairs(graph);

        for &(a, b) in &pairs {
            neighbors[a.index()].push(b);
            neighbors[b.index()].push(a);
        }

        Self {
            neighbors,
            pair_count: pairs.len(),
        }
    }

    /// Neighbours of a node; empty for an unknown index.
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        self.neighbors
            .get(node.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn degree(&self, node: NodeId) -> usize {
        self.neighbors(node).len()
    }

    pub fn node_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Number of unique pairs (undirected edges).
    pub fn pair_count(&self) -> usize {
        self.pair_count
    }

    /// Nodes at exactly two hops, excluding the node itself and its
    /// direct neighbours.
    pub fn second_ring(&self, node: NodeId) -> usize {
        let direct: HashSet<NodeId> = self.neighbors(node).iter().copied().collect();
        let mut ring = HashSet::new();

        for &neighbor in self.neighbors(node) {
            for &next in self.neighbors(neighbor) {
                if next != node && !direct.contains(&next) {
                    ring.insert(next);
                }
            }
        }

        ring.len()
    }
}

/// Degree of every node, indexed by store order.
#[derive(Debug, Clone, PartialEq)]
pub struct DegreeCentrality {
    degrees: Vec<usize>,
}

impl DegreeCentrality {
    pub fn compute(graph: &OntologyGraph) -> Self {
        Self::from_adjacency(&Adjacency::new(graph))
    }

    pub fn from_adjacency(adjacency: &Adjacency) -> Self {
        let degrees = (0..adjacency.node_count())
            .map(|i| adjacency.degree(NodeId::new(i)))
            .collect();
        Self { degrees }
    }

    pub fn degree(&self, node: NodeId) -> usize {
        self.degrees.get(node.index()).copied().unwrap_or(0)
    }

    /// Sum of all degrees; always twice the unique pair count.
    pub fn total(&self) -> usize {
        self.degrees.iter().sum()
    }

    /// The node with the highest degree. Ties go to the earliest node.
    pub fn max(&self) -> Option<(NodeId, usize)> {
        let mut best: Option<(NodeId, usize)> = None;
        for (i, &degree) in self.degrees.iter().enumerate() {
            if best.map_or(true, |(_, d)| degree > d) {
                best = Some((NodeId::new(i), degree));
            }
        }
        best
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, usize)> + '_ {
        self.degrees
            .iter()
            .enumerate()
            .map(|(i, &d)| (NodeId::new(i), d))
    }
}

/// A node together with its degree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDegree {
    #[serde(flatten)]
    pub node: NodeSummary,
    pub degree: usize,
}

/// Summary figures for the statistics panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMetrics {
    pub node_count: usize,
    pub edge_count: usize,
    pub unique_edge_count: usize,
    pub density: f64,
    pub average_degree: f64,
    pub max_degree_node: Option<NodeDegree>,
}

/// Nodes of one entity type connected through same-type neighbours.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeCluster {
    pub entity_type: EntityType,
    /// Member ids in store order.
    pub members: Vec<String>,
}

impl TypeCluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl OntologyGraph {
    /// Degree of one node under the unique pair convention.
    pub fn degree(&self, node: NodeId) -> usize {
        Adjacency::new(self).degree(node)
    }

    /// Degree centrality for every node.
    pub fn degree_centrality(&self) -> DegreeCentrality {
        DegreeCentrality::compute(self)
    }

    /// `|unique pairs| / (|V|·(|V|−1)/2)`, or 0 below two nodes.
    pub fn density(&self) -> f64 {
        let n = self.node_count();
        if n < 2 {
            return 0.0;
        }
        let possible = (n * (n - 1)) as f64 / 2.0;
        unique_pairs(self).len() as f64 / possible
    }

    /// `2·|unique pairs| / |V|`, or 0 for an empty graph.
    pub fn average_degree(&self) -> f64 {
        let n = self.node_count();
        if n == 0 {
            return 0.0;
        }
        2.0 * unique_pairs(self).len() as f64 / n as f64
    }

    /// The best-connected node, first in store order on ties.
    pub fn max_degree_node(&self) -> Option<NodeDegree> {
        let (index, degree) = self.degree_centrality().max()?;
        let node = self.get(index)?;
        Some(NodeDegree {
            node: NodeSummary::from(node),
            degree,
        })
    }

    /// All summary metrics in one pass over the pairs.
    pub fn metrics(&self) -> GraphMetrics {
        let unique_edge_count = unique_pairs(self).len();

        GraphMetrics {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            unique_edge_count,
            density: self.density(),
            average_degree: self.average_degree(),
            max_degree_node: self.max_degree_node(),
        }
    }

    /// Connected components where every hop stays within one entity
    /// type. Largest first; equal sizes keep store order.
    pub fn type_clusters(&self) -> Vec<TypeCluster> {
        let adjacency = Adjacency::new(self);
        let mut visited = vec![false; self.node_count()];
        let mut clusters = Vec::new();

        for start in self.node_indexes() {
            if visited[start.index()] {
                continue;
            }
            let Some(start_node) = self.get(start) else {
                continue;
            };
            let entity_type = start_node.entity_type;

            let mut members = Vec::new();
            let mut queue = VecDeque::from([start]);
            visited[start.index()] = true;

            while let Some(current) = queue.pop_front() {
                members.push(current);
                for &next in adjacency.neighbors(current) {
                    let same_type = self
                        .get(next)
                        .map_or(false, |n| n.entity_type == entity_type);
                    if same_type && !visited[next.index()] {
                        visited[next.index()] = true;
                        queue.push_back(next);
                    }
                }
            }

            members.sort();
            clusters.push(TypeCluster {
                entity_type,
                members: members
                    .into_iter()
                    .filter_map(|idx| self.get(idx).map(|n| n.id.clone()))
                    .collect(),
            });
        }

        clusters.sort_by(|a, b| b.len().cmp(&a.len()));
        clusters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use ontograph_core::Node;

    fn chain() -> OntologyGraph {
        // A - B - C - D, stored as forward/inverse pairs
        let mut builder = GraphBuilder::new();
        for id in ["A", "B", "C", "D"] {
            builder.add_node(Node::new(id, EntityType::Port, id));
        }
        builder
            .add_relation_pair("A", "B", "CALLS_AT", "CALLED_BY")
            .add_relation_pair("B", "C", "CALLS_AT", "CALLED_BY")
            .add_relation_pair("C", "D", "CALLS_AT", "CALLED_BY");
        builder.build().unwrap()
    }

    #[test]
    fn test_unique_pairs_collapse_inverses() {
        let graph = chain();
        assert_eq!(graph.edge_count(), 6);
        assert_eq!(unique_pairs(&graph).len(), 3);
    }

    #[test]
    fn test_chain_metrics() {
        let graph = chain();
        let b = graph.get_index("B").unwrap();
        assert_eq!(graph.degree(b), 2);
        assert!((graph.density() - 0.5).abs() < 1e-12);
        assert!((graph.average_degree() - 1.5).abs() < 1e-12);

        let centrality = graph.degree_centrality();
        assert_eq!(centrality.total(), 2 * 3);
    }

    #[test]
    fn test_max_degree_tie_goes_to_store_order() {
        let graph = chain();
        let best = graph.max_degree_node().unwrap();
        assert_eq!(best.node.id, "B");
        assert_eq!(best.degree, 2);
    }

    #[test]
    fn test_self_loop_ignored() {
        let mut builder = GraphBuilder::new();
        builder
            .add_node(Node::new("A", EntityType::Booking, "A"))
            .add_node(Node::new("B", EntityType::Booking, "B"))
            .add_edge("A", "A", "TIME_NEXT")
            .add_edge("A", "B", "TIME_NEXT");
        let graph = builder.build().unwrap();

        let a = graph.get_index("A").unwrap();
        assert_eq!(graph.degree(a), 1);
        assert!((graph.density() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_and_single_node_metrics() {
        let empty = OntologyGraph::new();
        assert_eq!(empty.density(), 0.0);
        assert_eq!(empty.average_degree(), 0.0);
        assert!(empty.max_degree_node().is_none());

        let mut builder = GraphBuilder::new();
        builder.add_node(Node::new("solo", EntityType::Vessel, "Solo"));
        let single = builder.build().unwrap();
        assert_eq!(single.density(), 0.0);
        assert_eq!(single.average_degree(), 0.0);
    }

    #[test]
    fn test_second_ring() {
        let graph = chain();
        let adjacency = Adjacency::new(&graph);
        let b = graph.get_index("B").unwrap();
        let a = graph.get_index("A").unwrap();
        assert_eq!(adjacency.second_ring(b), 1);
        assert_eq!(adjacency.second_ring(a), 1);
    }

    #[test]
    fn test_type_clusters_split_on_type_change() {
        // port - port - vessel - port
        let mut builder = GraphBuilder::new();
        builder.add_nodes(vec![
            Node::new("P1", EntityType::Port, "Busan"),
            Node::new("P2", EntityType::Port, "Ulsan"),
            Node::new("V1", EntityType::Vessel, "Hana"),
            Node::new("P3", EntityType::Port, "Tokyo"),
        ]);
        builder
            .add_edge("P1", "P2", "LINKED")
            .add_edge("P2", "V1", "LINKED")
            .add_edge("V1", "P3", "LINKED");
        let graph = builder.build().unwrap();

        let clusters = graph.type_clusters();
        assert_eq!(clusters.len(), 3);
        assert_eq!(clusters[0].members, vec!["P1", "P2"]);
        assert_eq!(clusters[1].members, vec!["V1"]);
        assert_eq!(clusters[2].members, vec!["P3"]);
    }
}
