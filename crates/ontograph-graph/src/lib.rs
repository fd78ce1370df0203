//! Ontograph Graph - the ontology store and its analytics
//!
//! This crate owns the entity/relationship graph: construction, the
//! immutable store, filtered views, search, and every analytic the
//! exploration panels ask for.
//!
//! # Architecture
//!
//! The graph uses petgraph internally with additional indexes for:
//! - Id-based lookups
//! - Type-based grouping
//! - N-gram substring search
//!
//! Analytics treat the directed multigraph as undirected and collapse
//! each connected pair of nodes to one connection.
//!
//! # Example
//!
//! ```
//! use ontograph_graph::{FilterOptions, GraphStore, PathQuery};
//!
//! let store = GraphStore::synthetic().unwrap();
//! let view = store.view(&FilterOptions::default().to_predicate(store.graph()));
//!
//! let outcome = view.find_paths(&PathQuery::new("SHP-001", "PRT-BUS")).unwrap();
//! assert!(outcome.is_found());
//! ```

mod analytics;
mod builder;
pub mod edge;
mod filter;
mod graph;
mod impact;
mod paths;
mod search_index;
mod store;
mod synthetic;

pub use analytics::{
    unique_pairs, Adjacency, DegreeCentrality, GraphMetrics, NodeDegree, TypeCluster,
};
pub use builder::GraphBuilder;
pub use edge::{Edge, GraphEdge};
pub use filter::{FilterOptions, FilterPredicate, NodeSize};
pub use graph::{GraphStats, NodeId, OntologyGraph};
pub use impact::{importance_score, ImpactConfig, ImpactSeverity, ImpactWeights, RemovalImpact};
pub use paths::{GraphPath, PathOutcome, PathQuery, DEFAULT_MAX_HOPS, DEFAULT_MAX_RESULTS};
pub use search_index::SearchIndex;
pub use store::{GraphStore, DEFAULT_SEARCH_LIMIT};
pub use synthetic::shipping_ontology;
