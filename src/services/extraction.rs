//! Best-effort entity and relation extraction.

use tracing::warn;

use crate::context::{AppLlm, Context};
use crate::di::FromContext;
use crate::llm::GenerateRequest;
use crate::models::{ChunkExtraction, ExtractionOutcome};

const SYSTEM_PROMPT: &str = r#"You are an expert Knowledge Graph Engineer.
Extract entities and relationships from the text.

STRICT JSON OUTPUT FORMAT (NO MARKDOWN, NO COMMENTS):
{
  "entities": [
    {"id": "Entity Name", "type": "Category"}
  ],
  "relations": [
    {"source": "Entity Name", "target": "Entity Name", "type": "RELATION_TYPE"}
  ]
}
Normalize IDs. Use SCREAMING_SNAKE_CASE for relation types."#;

/// Low temperature keeps the output schema-shaped.
const TEMPERATURE: f32 = 0.1;

/// Extracts a structured graph payload from chunk text.
#[derive(FromContext, Clone)]
pub struct ExtractionService {
    pub(crate) llm: AppLlm,
}

impl ExtractionService {
    /// Extracts entities and relations from one chunk.
    ///
    /// Never fails: any error (transport, malformed output) becomes a
    /// degraded outcome carrying its cause, and the chunk is still stored
    /// as searchable text.
    pub async fn extract(&self, text: &str) -> ExtractionOutcome {
        let prompt = format!("Extract graph from:\n\n{}", text);
        let request = GenerateRequest {
            prompt: &prompt,
            system: Some(SYSTEM_PROMPT),
            temperature: Some(TEMPERATURE),
            json: true,
        };

        let raw = match self.llm.generate(request).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "extraction request failed, degrading chunk");
                return ExtractionOutcome::degraded(e.to_string());
            }
        };

        match serde_json::from_str::<ChunkExtraction>(strip_code_fences(&raw)) {
            Ok(payload) => ExtractionOutcome::ok(payload),
            Err(e) => {
                warn!(error = %e, "extraction returned malformed JSON, degrading chunk");
                ExtractionOutcome::degraded(format!("malformed extraction JSON: {}", e))
            }
        }
    }
}

/// Strips a markdown code fence if the model wrapped its output in one,
/// JSON response mode notwithstanding.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
    else {
        return trimmed;
    };
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
