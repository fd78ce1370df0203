//! Node-removal impact analysis.
//!
//! Answers "what happens to the network if this entity disappears?" by
//! combining three counts per node:
//! - direct: its degree
//! - indirect: nodes exactly two hops away
//! - affected paths: enumerated paths that pass through it as an
//!   interior vertex
//!
//! Each count is normalized by its maximum over the view and blended into
//! a 0..=10 importance score.

use crate::analytics::Adjacency;
use crate::graph::{NodeId, OntologyGraph};
use crate::paths::{enumerate_paths, DEFAULT_MAX_HOPS, DEFAULT_MAX_RESULTS};
use ontograph_core::{EntityType, GraphError, Result};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

/// Severity band of an importance score.
///
/// Never construct directly; always use `from_score()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactSeverity {
    /// Score of 7 or more
    High = 0,
    /// Score of 4 up to 7
    Medium = 1,
    /// Below 4
    Low = 2,
}

impl ImpactSeverity {
    /// Derives severity from an importance score.
    pub fn from_score(score: f64) -> Self {
        if score >= 7.0 {
            ImpactSeverity::High
        } else if score >= 4.0 {
            ImpactSeverity::Medium
        } else {
            ImpactSeverity::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactSeverity::High => "high",
            ImpactSeverity::Medium => "medium",
            ImpactSeverity::Low => "low",
        }
    }
}

impl std::fmt::Display for ImpactSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Blend weights for the importance score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactWeights {
    pub direct: f64,
    pub indirect: f64,
    pub paths: f64,
}

impl Default for ImpactWeights {
    fn default() -> Self {
        Self {
            direct: 0.4,
            indirect: 0.3,
            paths: 0.3,
        }
    }
}

/// Tunables for impact analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImpactConfig {
    pub weights: ImpactWeights,
    /// Views with at most this many nodes enumerate paths for every pair.
    pub full_pair_cutoff: usize,
    /// Number of pairs examined above the cutoff.
    pub sample_pairs: usize,
    pub max_hops: usize,
    pub max_results: usize,
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            weights: ImpactWeights::default(),
            full_pair_cutoff: 60,
            sample_pairs: 600,
            max_hops: DEFAULT_MAX_HOPS,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// Blends normalized counts into a score in `0..=10`.
///
/// Inputs are expected in `0..=1`; the result is clamped either way.
pub fn importance_score(
    direct_norm: f64,
    indirect_norm: f64,
    paths_norm: f64,
    weights: &ImpactWeights,
) -> f64 {
    let blended = weights.direct * direct_norm
        + weights.indirect * indirect_norm
        + weights.paths * paths_norm;
    (10.0 * blended).clamp(0.0, 10.0)
}

fn normalize(value: usize, max: usize) -> f64 {
    if max == 0 {
        0.0
    } else {
        value as f64 / max as f64
    }
}

/// Impact of removing one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalImpact {
    pub id: String,
    pub label: String,
    pub entity_type: EntityType,
    pub direct: usize,
    pub indirect: usize,
    pub affected_paths: usize,
    pub importance: f64,
    pub severity: ImpactSeverity,
}

impl RemovalImpact {
    /// Returns a summary suitable for CLI output.
    pub fn summary(&self) -> String {
        format!(
            "Removal impact of {}: importance {:.1}/10 ({}) - direct: {}, indirect: {}, paths: {}",
            self.id,
            self.importance,
            self.severity,
            self.direct,
            self.indirect,
            self.affected_paths
        )
    }
}

/// Raw counts for every node of a view.
struct ImpactTable {
    direct: Vec<usize>,
    indirect: Vec<usize>,
    paths: Vec<usize>,
}

impl ImpactTable {
    fn compute(graph: &OntologyGraph, config: &ImpactConfig) -> Self {
        let started = Instant::now();
        let adjacency = Adjacency::new(graph);
        let n = graph.node_count();

        let direct: Vec<usize> = (0..n).map(|i| adjacency.degree(NodeId::new(i))).collect();
        let indirect: Vec<usize> = (0..n)
            .map(|i| adjacency.second_ring(NodeId::new(i)))
            .collect();

        let mut paths = vec![0usize; n];
        let pairs = pair_schedule(n, config);
        let examined = pairs.len();

        for (a, b) in pairs {
            let found = enumerate_paths(
                &adjacency,
                NodeId::new(a),
                NodeId::new(b),
                config.max_hops,
                config.max_results,
            );
            for path in found {
                if path.len() > 2 {
                    for interior in &path[1..path.len() - 1] {
                        paths[interior.index()] += 1;
                    }
                }
            }
        }

        debug!(
            "Impact table for {} nodes: {} pairs examined in {:?}",
            n,
            examined,
            started.elapsed()
        );

        Self {
            direct,
            indirect,
            paths,
        }
    }

    fn impact_of(
        &self,
        graph: &OntologyGraph,
        node: NodeId,
        weights: &ImpactWeights,
    ) -> Option<RemovalImpact> {
        let data = graph.get(node)?;
        let i = node.index();

        let max_direct = self.direct.iter().copied().max().unwrap_or(0);
        let max_indirect = self.indirect.iter().copied().max().unwrap_or(0);
        let max_paths = self.paths.iter().copied().max().unwrap_or(0);

        let importance = importance_score(
            normalize(self.direct[i], max_direct),
            normalize(self.indirect[i], max_indirect),
            normalize(self.paths[i], max_paths),
            weights,
        );

        Some(RemovalImpact {
            id: data.id.clone(),
            label: data.label.clone(),
            entity_type: data.entity_type,
            direct: self.direct[i],
            indirect: self.indirect[i],
            affected_paths: self.paths[i],
            importance,
            severity: ImpactSeverity::from_score(importance),
        })
    }
}

/// Unordered index pairs to enumerate. Every pair up to the cutoff,
/// otherwise an evenly strided sample in lexicographic order.
fn pair_schedule(n: usize, config: &ImpactConfig) -> Vec<(usize, usize)> {
    let all = (0..n).flat_map(|a| ((a + 1)..n).map(move |b| (a, b)));

    if n <= config.full_pair_cutoff {
        return all.collect();
    }

    let total = n * (n - 1) / 2;
    let stride = (total / config.sample_pairs.max(1)).max(1);
    all.step_by(stride).take(config.sample_pairs).collect()
}

impl OntologyGraph {
    /// Impact of removing a single node from this view.
    pub fn analyze_removal(&self, id: &str, config: &ImpactConfig) -> Result<RemovalImpact> {
        let node = self.require_index(id)?;
        let table = ImpactTable::compute(self, config);
        table
            .impact_of(self, node, &config.weights)
            .ok_or_else(|| GraphError::not_found(id))
    }

    /// Impact of every node, highest importance first. Equal scores keep
    /// store order.
    pub fn rank_by_importance(&self, config: &ImpactConfig) -> Vec<RemovalImpact> {
        let table = ImpactTable::compute(self, config);
        let mut ranked: Vec<RemovalImpact> = self
            .node_indexes()
            .filter_map(|idx| table.impact_of(self, idx, &config.weights))
            .collect();

        ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));
        ranked
    }
}
