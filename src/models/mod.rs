//! Domain models for the knowledge graph.

mod document;
mod extraction;
mod search;

pub use document::{generate_chunk_id, normalize_document_id, Chunk, Document};
pub use extraction::{
    sanitize_concept_type, sanitize_relation_type, ChunkExtraction, Concept, ExtractionOutcome,
    Relation,
};
pub use search::{GraphSnapshot, QueryResponse, SnapshotEdge, SnapshotNode, SourceHit};
