//! Question answering over the stored graph.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::Config;
use crate::context::{AppEmbedder, Context};
use crate::di::FromContext;
use crate::error::AppError;
use crate::llm::EmbeddingMode;
use crate::models::QueryResponse;
use crate::repositories::SearchRepository;
use crate::services::AnswerService;

/// Retrieval service: embed the question, find the nearest chunks,
/// synthesize a grounded answer.
#[derive(FromContext, Clone)]
pub struct RetrievalService {
    embedder: AppEmbedder,
    search: SearchRepository,
    answers: AnswerService,
    config: Arc<Config>,
}

impl RetrievalService {
    /// Answers `question` from the stored chunks.
    ///
    /// An empty index (or no hits) is the well-defined empty response, not
    /// an error. Embedding, store, and synthesis failures propagate.
    pub async fn search(&self, question: &str) -> Result<QueryResponse, AppError> {
        let vector = self.embedder.embed(question, EmbeddingMode::Query).await?;

        let hits = self
            .search
            .nearest_chunks(&vector, self.config.retrieval.top_k)
            .await?;
        debug!(hits = hits.len(), "similarity search complete");

        if hits.is_empty() {
            info!("no relevant chunks found");
            return Ok(QueryResponse::empty());
        }

        let answer = self.answers.synthesize(question, &hits).await?;
        Ok(QueryResponse {
            answer,
            sources: hits,
        })
    }
}
