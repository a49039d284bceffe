//! Language-model and embedding capability interfaces.
//!
//! The pipeline consumes these traits, not a concrete vendor client, so
//! tests inject deterministic fakes and the Gemini implementation stays
//! swappable.

mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;

use crate::error::AppError;

/// One text-generation round trip.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest<'a> {
    /// User prompt.
    pub prompt: &'a str,
    /// Optional system instruction.
    pub system: Option<&'a str>,
    /// Sampling temperature; `None` leaves the model default.
    pub temperature: Option<f32>,
    /// Constrain the response to a JSON document (no prose, no fencing).
    pub json: bool,
}

/// Text generation capability.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generates free text for the given request.
    async fn generate(&self, request: GenerateRequest<'_>) -> Result<String, AppError>;
}

/// Which embedding space a vector belongs to.
///
/// Retrieval models use asymmetric spaces: stored chunks embed in
/// `Document` mode, questions embed in `Query` mode. Mixing the two
/// degrades similarity scores silently, so the mode is an explicit
/// argument at every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingMode {
    Document,
    Query,
}

/// Text embedding capability.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Embeds `text` into a fixed-dimension vector.
    async fn embed(&self, text: &str, mode: EmbeddingMode) -> Result<Vec<f32>, AppError>;
}
