//! Noesis - GraphRAG knowledge pipeline
//!
//! Ingests documents into a Memgraph knowledge graph (chunks, entities,
//! relations, embeddings) and answers questions grounded in retrieved
//! chunks.

pub mod cli;
pub mod config;
pub mod context;
pub mod convert;
pub mod di;
pub mod error;
pub mod graph;
pub mod llm;
pub mod models;
pub mod repositories;
pub mod services;

// Re-export FromRef at crate root for di-macros generated code
pub use di::FromRef;
