//! Gemini REST API client (`generateContent` / `embedContent`).
//!
//! All wire types are private to this module; callers only see the
//! [`LanguageModel`] and [`TextEmbedder`] traits. The client is stateless
//! and cheap to clone (`reqwest::Client` is `Arc`-based internally), with
//! a per-call timeout from configuration.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GeminiConfig;
use crate::error::AppError;
use crate::llm::{EmbeddingMode, GenerateRequest, LanguageModel, TextEmbedder};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Client for the Gemini generative-language API.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    extraction_model: String,
    qa_model: String,
    embedding_model: String,
}

impl GeminiClient {
    /// Builds a client from configuration.
    pub fn new(config: &GeminiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: API_BASE.to_string(),
            extraction_model: config.extraction_model.clone(),
            qa_model: config.qa_model.clone(),
            embedding_model: config.embedding_model.clone(),
        })
    }

    /// Overrides the API base URL (proxies, local stub servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn model_for(&self, request: &GenerateRequest<'_>) -> &str {
        // JSON-constrained calls are extraction; free text is QA.
        if request.json {
            &self.extraction_model
        } else {
            &self.qa_model
        }
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, request: GenerateRequest<'_>) -> Result<String, AppError> {
        let model = self.model_for(&request);
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        let payload = GenerateContentRequest {
            system_instruction: request.system.map(Content::from_text),
            contents: vec![Content::from_text(request.prompt)],
            generation_config: GenerationConfig {
                temperature: request.temperature,
                response_mime_type: request.json.then(|| "application/json".to_string()),
            },
        };

        debug!(model, prompt_len = request.prompt.len(), json = request.json, "generate request");

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Gemini request failed: {}", e)))?;
        let response = check_status(response).await?;

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("failed to parse Gemini response: {}", e)))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Internal("empty Gemini response".to_string()))
    }
}

#[async_trait]
impl TextEmbedder for GeminiClient {
    async fn embed(&self, text: &str, mode: EmbeddingMode) -> Result<Vec<f32>, AppError> {
        let url = format!(
            "{}/models/{}:embedContent?key={}",
            self.base_url, self.embedding_model, self.api_key
        );

        let task_type = match mode {
            EmbeddingMode::Document => "RETRIEVAL_DOCUMENT",
            EmbeddingMode::Query => "RETRIEVAL_QUERY",
        };

        let payload = EmbedContentRequest {
            model: format!("models/{}", self.embedding_model),
            content: Content::from_text(text),
            task_type,
        };

        debug!(model = %self.embedding_model, task_type, text_len = text.len(), "embed request");

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Embedding(e.to_string()))?;
        let response = check_status(response)
            .await
            .map_err(|e| AppError::Embedding(e.to_string()))?;

        let parsed: EmbedContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::Embedding(format!("failed to parse response: {}", e)))?;

        Ok(parsed.embedding.values)
    }
}

// --- Private wire types ---

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none", rename = "systemInstruction")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "responseMimeType")]
    response_mime_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

impl Content {
    fn from_text(text: &str) -> Self {
        Self {
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Serialize)]
struct EmbedContentRequest {
    model: String,
    content: Content,
    #[serde(rename = "taskType")]
    task_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct EmbedContentResponse {
    embedding: EmbeddingValues,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

/// Returns the response if successful, otherwise an error with the body's
/// error message when the API supplies one.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read error body>".to_string());

    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|env| format!("HTTP {}: {}", status, env.error.message))
        .unwrap_or_else(|_| format!("HTTP {}: {}", status, body));

    Err(AppError::Internal(message))
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}
