//! Extraction payload models and label sanitization.
//!
//! Relation types become structural edge labels, and edge labels cannot be
//! bound as query parameters; they are interpolated into query text. Every
//! label therefore passes through the sanitizers here before any query is
//! built; nothing else in the crate is allowed to interpolate model-derived
//! text.

use serde::{Deserialize, Serialize};

/// A named entity extracted from a chunk.
///
/// The `id` is the deduplication key across all documents; the stored node
/// label is `Entity`, the modeling term is "concept".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Concept {
    /// Entity name, e.g. `"Memgraph"`. Trimmed before use; empty names are
    /// skipped at write time.
    #[serde(default, alias = "name")]
    pub id: String,
    /// Free-text category, e.g. `"Technology"`. Sanitized before storage.
    #[serde(default, rename = "type")]
    pub concept_type: String,
}

/// A directed, typed relation between two concepts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Relation {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub target: String,
    /// Relation type, e.g. `"SUPPORTED_BY"`. Sanitized into an edge label.
    #[serde(default, rename = "type")]
    pub relation_type: String,
}

/// The structured payload extracted from one chunk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkExtraction {
    #[serde(default)]
    pub entities: Vec<Concept>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl ChunkExtraction {
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.relations.is_empty()
    }
}

/// Result of best-effort extraction on one chunk.
///
/// Extraction never fails a document; a failure is recorded as a degraded
/// outcome with its cause so operators can distinguish "genuinely no
/// entities" from "extraction broke".
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    pub payload: ChunkExtraction,
    /// Cause of degradation, when the payload is empty because extraction
    /// failed rather than because the chunk has no entities.
    pub degraded: Option<String>,
}

impl ExtractionOutcome {
    pub fn ok(payload: ChunkExtraction) -> Self {
        Self {
            payload,
            degraded: None,
        }
    }

    pub fn degraded(cause: impl Into<String>) -> Self {
        Self {
            payload: ChunkExtraction::default(),
            degraded: Some(cause.into()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }
}

/// Sanitizes a concept type into `[A-Za-z0-9_]`.
///
/// Invalid characters are dropped after trimming; an empty result falls
/// back to `"Thing"`.
pub fn sanitize_concept_type(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if cleaned.is_empty() {
        "Thing".to_string()
    } else {
        cleaned
    }
}

/// Sanitizes a relation type into an upper-snake-case edge label.
///
/// Spaces map to underscores, the rest uppercases, and anything outside
/// `[A-Za-z0-9_]` is dropped; an empty result falls back to `"RELATED"`.
/// The returned string is the only text ever interpolated into query text.
pub fn sanitize_relation_type(raw: &str) -> String {
    let cleaned: String = raw
        .replace(' ', "_")
        .to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if cleaned.is_empty() {
        "RELATED".to_string()
    } else {
        cleaned
    }
}
