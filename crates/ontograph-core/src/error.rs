//! Error taxonomy shared by the graph crates.
//!
//! Construction errors are fatal: the static graph is malformed and the
//! session cannot start. Everything else is reported to the caller as a
//! value. Empty results (no nodes after filtering, no path within the hop
//! bound) are not errors at all and never appear here.

use thiserror::Error;

/// The static graph could not be assembled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    #[error("node id must not be empty")]
    EmptyId,

    #[error("duplicate node id: {0}")]
    DuplicateNode(String),

    #[error("edge {from} -[{relationship}]-> {to} references missing node {missing}")]
    DanglingEdge {
        from: String,
        to: String,
        relationship: String,
        missing: String,
    },

    #[error("edge {from} -> {to} has an empty relationship label")]
    EmptyRelationship { from: String, to: String },
}

/// Errors returned by graph queries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error("node not found: {0}")]
    NotFound(String),

    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

impl GraphError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;
