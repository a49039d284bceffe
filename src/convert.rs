//! Document conversion capability for non-text formats.
//!
//! PDF ingestion delegates to an external conversion service that renders
//! the document as Markdown-like text. Conversion failure is a distinct
//! error from "empty document": an empty result means nothing to ingest,
//! a conversion error means the operator has a broken service or file.

use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart;

use crate::error::AppError;

/// Converts a document file into Markdown-like text.
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    async fn convert(&self, path: &Path) -> Result<String, AppError>;
}

/// HTTP client for a docling-serve compatible conversion endpoint.
#[derive(Clone)]
pub struct DoclingConverter {
    client: reqwest::Client,
    endpoint: String,
}

impl DoclingConverter {
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl DocumentConverter for DoclingConverter {
    async fn convert(&self, path: &Path) -> Result<String, AppError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::Conversion(format!("cannot read {}: {}", path.display(), e)))?;

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "document.pdf".to_string());

        let form = multipart::Form::new().part(
            "files",
            multipart::Part::bytes(bytes).file_name(filename),
        );

        let url = format!(
            "{}/v1alpha/convert/file",
            self.endpoint.trim_end_matches('/')
        );
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Conversion(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Conversion(format!("HTTP {}: {}", status, body)));
        }

        let parsed: ConvertResponse = response
            .json()
            .await
            .map_err(|e| AppError::Conversion(format!("bad response body: {}", e)))?;

        match parsed.document.md_content {
            Some(markdown) => Ok(markdown),
            None => Err(AppError::Conversion(
                "conversion service returned no markdown content".to_string(),
            )),
        }
    }
}

#[derive(serde::Deserialize)]
struct ConvertResponse {
    document: ConvertedDocument,
}

#[derive(serde::Deserialize)]
struct ConvertedDocument {
    #[serde(default)]
    md_content: Option<String>,
}

/// Converter used when no conversion endpoint is configured.
///
/// Always fails with a conversion error so PDF ingestion aborts loudly
/// instead of ingesting nothing.
#[derive(Clone, Default)]
pub struct DisabledConverter;

#[async_trait]
impl DocumentConverter for DisabledConverter {
    async fn convert(&self, path: &Path) -> Result<String, AppError> {
        Err(AppError::Conversion(format!(
            "no conversion service configured (cannot convert {})",
            path.display()
        )))
    }
}
