//! Data access layer for graph operations.
//!
//! Repositories provide a clean abstraction over graph queries,
//! using the `FromContext` derive macro for dependency injection.

mod ingest;
mod schema;
mod search;

pub use ingest::IngestRepository;
pub use schema::{SchemaRepository, CHUNK_VECTOR_INDEX};
pub use search::SearchRepository;
