//! Application error types.
//!
//! The taxonomy separates failures that abort a file's ingestion (read,
//! conversion, graph write) from failures that degrade a single chunk
//! (extraction, embedding during ingestion) and failures surfaced directly
//! to a querying user (embedding during retrieval, synthesis).

use thiserror::Error;

/// Application-level errors for Noesis.
#[derive(Error, Debug)]
pub enum AppError {
    // Graph store errors
    #[error("Memgraph connection error: {0}")]
    Connection(#[from] neo4rs::Error),

    #[error("Graph query error: {message}")]
    Query { message: String, query: String },

    /// Embedding length does not match the vector index configuration.
    /// Writing a mismatched vector would corrupt the similarity index.
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    Dimension { expected: usize, actual: usize },

    // Ingestion errors
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Document conversion failed: {0}")]
    Conversion(String),

    /// Captured as a degradation cause per chunk; never aborts a file.
    #[error("Extraction failed: {0}")]
    Extraction(String),

    // Model service errors
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Answer synthesis failed: {0}")]
    Synthesis(String),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("{0}")]
    Internal(String),
}
