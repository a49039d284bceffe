//! Answer synthesis from retrieved sources.

use crate::context::{AppLlm, Context};
use crate::di::FromContext;
use crate::error::AppError;
use crate::llm::GenerateRequest;
use crate::models::SourceHit;

/// Synthesizes a grounded answer from retrieved chunks.
#[derive(FromContext, Clone)]
pub struct AnswerService {
    pub(crate) llm: AppLlm,
}

impl AnswerService {
    /// Generates an answer to `question` using only the given sources.
    pub async fn synthesize(
        &self,
        question: &str,
        sources: &[SourceHit],
    ) -> Result<String, AppError> {
        let context = build_context(sources);
        let prompt = format!(
            "You are a helpful assistant. Answer the question based strictly on the Context provided.\n\
             \n\
             Context:\n\
             {}\n\
             Question: {}\n\
             Answer:",
            context, question
        );

        self.llm
            .generate(GenerateRequest {
                prompt: &prompt,
                ..GenerateRequest::default()
            })
            .await
            .map_err(|e| AppError::Synthesis(e.to_string()))
    }
}

/// Formats retrieved sources into the grounding context block.
fn build_context(sources: &[SourceHit]) -> String {
    let mut context = String::new();
    for (i, source) in sources.iter().enumerate() {
        let entities = if source.entities.is_empty() {
            "(No entities)".to_string()
        } else {
            source.entities.join(", ")
        };
        context.push_str(&format!(
            "Source {}:\nText: {}\nEntities: {}\n\n",
            i + 1,
            source.text,
            entities
        ));
    }
    context
}
