//! The JSON export document.
//!
//! JSON is the authoritative export: importing a document rebuilds the
//! same nodes, edges and positions. Optional fields are defaulted on
//! import so hand-written or older documents still load.

use super::ExportError;
use chrono::{DateTime, Utc};
use ontograph_core::{EntityType, Node, Properties, DEFAULT_WEIGHT};
use ontograph_graph::{GraphBuilder, GraphEdge, OntologyGraph};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Version written into every export.
pub const DOCUMENT_VERSION: &str = "1.0";

fn default_version() -> String {
    DOCUMENT_VERSION.to_string()
}

fn default_weight() -> f64 {
    DEFAULT_WEIGHT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDocument {
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default = "Utc::now")]
    pub exported_at: DateTime<Utc>,

    pub nodes: Vec<DocumentNode>,

    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

/// One node as written to JSON, flattened to `x`/`y`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentNode {
    pub id: String,
    pub entity_type: EntityType,
    pub label: String,
    #[serde(default)]
    pub properties: Properties,
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub pinned: bool,
}

impl From<&Node> for DocumentNode {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            entity_type: node.entity_type,
            label: node.label.clone(),
            properties: node.properties.clone(),
            x: node.position.x,
            y: node.position.y,
            weight: node.weight,
            pinned: node.pinned,
        }
    }
}

impl From<DocumentNode> for Node {
    fn from(doc: DocumentNode) -> Self {
        let mut node = Node::new(doc.id, doc.entity_type, doc.label)
            .with_weight(doc.weight)
            .at(doc.x, doc.y);
        node.properties = doc.properties;
        node.pinned = doc.pinned;
        node
    }
}

impl GraphDocument {
    /// Snapshot of a view with its current positions.
    pub fn from_view(view: &OntologyGraph) -> Self {
        Self {
            version: default_version(),
            exported_at: Utc::now(),
            nodes: view.nodes().map(DocumentNode::from).collect(),
            edges: view.export_edges(),
        }
    }

    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        let document: GraphDocument = serde_json::from_str(json)?;
        let major = document.version.split('.').next().unwrap_or_default();
        if major != "1" {
            return Err(ExportError::UnsupportedVersion(document.version));
        }
        Ok(document)
    }

    /// Rebuilds the graph. Fails like any other construction on
    /// duplicate ids or dangling edges.
    pub fn into_graph(self) -> Result<OntologyGraph, ExportError> {
        let mut builder = GraphBuilder::new();
        builder.add_nodes(self.nodes.into_iter().map(Node::from));
        for edge in self.edges {
            builder.add_edge(edge.source, edge.target, edge.relationship);
        }
        Ok(builder.build()?)
    }
}

/// Serializes `view` to the JSON document format.
pub fn export_json(view: &OntologyGraph) -> Result<String, ExportError> {
    GraphDocument::from_view(view).to_json()
}

/// Parses a JSON document back into a graph.
pub fn import_json(json: &str) -> Result<OntologyGraph, ExportError> {
    let graph = GraphDocument::from_json(json)?.into_graph()?;
    info!(
        "Imported graph: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}
