//! Bounded path enumeration between two nodes.
//!
//! Paths are simple (no repeated node) and follow the undirected unique
//! adjacency, so a forward/inverse edge pair is walked as one hop.
//! Exploration deepens one hop at a time: every 1-hop path is found
//! before any 2-hop path, and the result cap can only cut the longest
//! level.

use crate::analytics::Adjacency;
use crate::graph::{NodeId, OntologyGraph};
use ontograph_core::{NodeSummary, Result};
use petgraph::graph::UnGraph;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Default hop bound.
pub const DEFAULT_MAX_HOPS: usize = 4;

/// Default result cap.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// A path query between two node ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathQuery {
    pub start: String,
    pub end: String,
    #[serde(default = "default_max_hops")]
    pub max_hops: usize,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_max_hops() -> usize {
    DEFAULT_MAX_HOPS
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

impl PathQuery {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            max_hops: DEFAULT_MAX_HOPS,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }
}

/// An ordered node sequence from start to end.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphPath {
    pub nodes: Vec<NodeSummary>,
}

impl GraphPath {
    /// Number of edges walked.
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }
}

/// Result of a path query. An empty result is not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "paths", rename_all = "camelCase")]
pub enum PathOutcome {
    Found(Vec<GraphPath>),
    NoPathFound,
}

impl PathOutcome {
    pub fn paths(&self) -> &[GraphPath] {
        match self {
            PathOutcome::Found(paths) => paths,
            PathOutcome::NoPathFound => &[],
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, PathOutcome::Found(_))
    }
}

/// Enumerates simple paths from `start` to `end`, shortest first.
///
/// Paths of equal length keep DFS discovery order, which follows the
/// adjacency's insertion order. At most `max_results` paths of at most
/// `max_hops` edges are returned.
pub(crate) fn enumerate_paths(
    adjacency: &Adjacency,
    start: NodeId,
    end: NodeId,
    max_hops: usize,
    max_results: usize,
) -> Vec<Vec<NodeId>> {
    let mut found: Vec<Vec<NodeId>> = Vec::new();
    if max_results == 0 {
        return found;
    }
    if start == end {
        found.push(vec![start]);
        return found;
    }

    let mut seen: HashSet<Vec<NodeId>> = HashSet::new();

    for depth in 1..=max_hops {
        let mut walker = DepthWalker {
            adjacency,
            end,
            path: vec![start],
            on_path: HashSet::from([start]),
            found: &mut found,
            seen: &mut seen,
            max_results,
        };
        walker.walk(start, depth);

        if found.len() >= max_results {
            break;
        }
    }

    found
}

/// DFS for paths of exactly one length.
struct DepthWalker<'a> {
    adjacency: &'a Adjacency,
    end: NodeId,
    path: Vec<NodeId>,
    on_path: HashSet<NodeId>,
    found: &'a mut Vec<Vec<NodeId>>,
    seen: &'a mut HashSet<Vec<NodeId>>,
    max_results: usize,
}

impl DepthWalker<'_> {
    fn walk(&mut self, current: NodeId, remaining: usize) {
        if self.found.len() >= self.max_results {
            return;
        }
        if remaining == 0 {
            if current == self.end && self.seen.insert(self.path.clone()) {
                self.found.push(self.path.clone());
            }
            return;
        }

        for &next in self.adjacency.neighbors(current) {
            if self.on_path.contains(&next) {
                continue;
            }
            // the end node may only appear as the last vertex
            if next == self.end && remaining > 1 {
                continue;
            }

            self.path.push(next);
            self.on_path.insert(next);
            self.walk(next, remaining - 1);
            self.on_path.remove(&next);
            self.path.pop();

            if self.found.len() >= self.max_results {
                return;
            }
        }
    }
}

impl OntologyGraph {
    fn to_path(&self, indexes: &[NodeId]) -> GraphPath {
        GraphPath {
            nodes: indexes
                .iter()
                .filter_map(|&idx| self.get(idx).map(NodeSummary::from))
                .collect(),
        }
    }

    /// Finds up to `max_results` simple paths of at most `max_hops` edges.
    ///
    /// Unknown ids are `NotFound`; no path within the bound is
    /// `PathOutcome::NoPathFound`.
    pub fn find_paths(&self, query: &PathQuery) -> Result<PathOutcome> {
        let start = self.require_index(&query.start)?;
        let end = self.require_index(&query.end)?;

        let adjacency = Adjacency::new(self);
        let paths = enumerate_paths(
            &adjacency,
            start,
            end,
            query.max_hops,
            query.max_results,
        );

        debug!(
            "Path query {} -> {}: {} paths (max {} hops)",
            query.start,
            query.end,
            paths.len(),
            query.max_hops
        );

        if paths.is_empty() {
            return Ok(PathOutcome::NoPathFound);
        }

        Ok(PathOutcome::Found(
            paths.iter().map(|p| self.to_path(p)).collect(),
        ))
    }

    /// Single unweighted shortest path, with no hop bound.
    pub fn shortest_path(&self, start: &str, end: &str) -> Result<PathOutcome> {
        let from = self.require_index(start)?;
        let to = self.require_index(end)?;

        let mut undirected: UnGraph<(), ()> =
            UnGraph::with_capacity(self.node_count(), self.edge_count());
        for _ in self.node_indexes() {
            undirected.add_node(());
        }
        for (a, b) in crate::analytics::unique_pairs(self) {
            undirected.add_edge(a, b, ());
        }

        let result = petgraph::algo::astar(
            &undirected,
            from,
            |finish| finish == to,
            |_| 1usize, // unweighted
            |_| 0,
        );

        Ok(match result {
            Some((_, indexes)) => PathOutcome::Found(vec![self.to_path(&indexes)]),
            None => PathOutcome::NoPathFound,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use ontograph_core::{EntityType, GraphError, Node};

    fn graph_of(ids: &[&str], pairs: &[(&str, &str)]) -> OntologyGraph {
        let mut builder = GraphBuilder::new();
        for id in ids {
            builder.add_node(Node::new(*id, EntityType::Port, *id));
        }
        for (a, b) in pairs {
            builder.add_relation_pair(a, b, "LINKED", "LINKED_BY");
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_chain_has_single_path() {
        let graph = graph_of(&["A", "B", "C", "D"], &[("A", "B"), ("B", "C"), ("C", "D")]);
        let outcome = graph.find_paths(&PathQuery::new("A", "D")).unwrap();

        let paths = outcome.paths();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].ids(), vec!["A", "B", "C", "D"]);
        assert_eq!(paths[0].hops(), 3);
    }

    #[test]
    fn test_hop_bound_gives_no_path() {
        let graph = graph_of(&["A", "B", "C", "D"], &[("A", "B"), ("B", "C"), ("C", "D")]);
        let outcome = graph
            .find_paths(&PathQuery::new("A", "D").with_max_hops(2))
            .unwrap();
        assert_eq!(outcome, PathOutcome::NoPathFound);
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let graph = graph_of(&["A"], &[]);
        assert_eq!(
            graph.find_paths(&PathQuery::new("A", "Z")),
            Err(GraphError::NotFound("Z".to_string()))
        );
    }

    #[test]
    fn test_disconnected_is_no_path() {
        let graph = graph_of(&["A", "B"], &[]);
        let outcome = graph.find_paths(&PathQuery::new("A", "B")).unwrap();
        assert!(!outcome.is_found());
    }

    #[test]
    fn test_shorter_paths_first() {
        //   A - B - D
        //   |       |
        //   C ----- E ... plus a direct A - D
        let graph = graph_of(
            &["A", "B", "C", "D", "E"],
            &[("A", "B"), ("B", "D"), ("A", "C"), ("C", "E"), ("E", "D"), ("A", "D")],
        );
        let outcome = graph.find_paths(&PathQuery::new("A", "D")).unwrap();
        let hops: Vec<usize> = outcome.paths().iter().map(GraphPath::hops).collect();
        assert_eq!(hops, vec![1, 2, 3]);
        assert_eq!(outcome.paths()[1].ids(), vec!["A", "B", "D"]);
    }

    #[test]
    fn test_result_cap_keeps_shortest() {
        let graph = graph_of(
            &["A", "B", "C", "D", "E"],
            &[("A", "B"), ("B", "D"), ("A", "C"), ("C", "E"), ("E", "D"), ("A", "D")],
        );
        let outcome = graph
            .find_paths(&PathQuery::new("A", "D").with_max_results(2))
            .unwrap();
        let hops: Vec<usize> = outcome.paths().iter().map(GraphPath::hops).collect();
        assert_eq!(hops, vec![1, 2]);
    }

    #[test]
    fn test_paths_are_simple() {
        // a triangle with a tail: cycles must not be walked
        let graph = graph_of(
            &["A", "B", "C", "D"],
            &[("A", "B"), ("B", "C"), ("C", "A"), ("C", "D")],
        );
        let outcome = graph
            .find_paths(&PathQuery::new("A", "D").with_max_hops(6))
            .unwrap();
        for path in outcome.paths() {
            let ids = path.ids();
            let unique: HashSet<_> = ids.iter().collect();
            assert_eq!(unique.len(), ids.len());
        }
        assert_eq!(outcome.paths().len(), 2);
    }

    #[test]
    fn test_same_start_and_end() {
        let graph = graph_of(&["A"], &[]);
        let outcome = graph.find_paths(&PathQuery::new("A", "A")).unwrap();
        assert_eq!(outcome.paths()[0].hops(), 0);
    }

    #[test]
    fn test_shortest_path_ignores_direction() {
        let mut builder = GraphBuilder::new();
        builder.add_nodes(vec![
            Node::new("A", EntityType::Route, "A"),
            Node::new("B", EntityType::Route, "B"),
            Node::new("C", EntityType::Route, "C"),
        ]);
        builder.add_edge("B", "A", "HAS_INDEX").add_edge("C", "B", "HAS_INDEX");
        let graph = builder.build().unwrap();

        let outcome = graph.shortest_path("A", "C").unwrap();
        assert_eq!(outcome.paths()[0].ids(), vec!["A", "B", "C"]);
    }
}
