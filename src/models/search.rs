//! Retrieval and snapshot response models.

use serde::{Deserialize, Serialize};

/// One retrieved chunk with its similarity score and linked concept ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceHit {
    pub text: String,
    /// Cosine similarity; higher is more similar.
    pub score: f64,
    /// Concept ids the chunk mentions.
    pub entities: Vec<String>,
}

/// Answer plus the sources it was grounded on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    pub sources: Vec<SourceHit>,
}

impl QueryResponse {
    /// Response for a query that matched nothing in the index.
    pub fn empty() -> Self {
        Self {
            answer: "No relevant information found.".to_string(),
            sources: Vec::new(),
        }
    }
}

/// A concept node in a graph snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: Option<String>,
}

/// A concept-to-concept edge in a graph snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotEdge {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub edge_type: String,
}

/// Bounded view of the concept graph for visualization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<SnapshotNode>,
    pub edges: Vec<SnapshotEdge>,
}
