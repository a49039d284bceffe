//! Business logic services for the ingestion and retrieval pipelines.
//!
//! Services orchestrate repositories and model clients, using the
//! `FromContext` derive macro for dependency injection.

mod answer;
mod chunker;
mod extraction;
mod pipeline;
mod reader;
mod retrieval;

pub use answer::AnswerService;
pub use chunker::Chunker;
pub use extraction::ExtractionService;
pub use pipeline::PipelineService;
pub use reader::ContentReader;
pub use retrieval::RetrievalService;
