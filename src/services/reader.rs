//! Document content reader.
//!
//! Plain-text formats are read directly as UTF-8; PDFs go through the
//! document conversion capability and come back as markdown.

use std::path::Path;

use crate::context::{AppConverter, Context};
use crate::di::FromContext;
use crate::error::AppError;

/// Reads a document's text content from disk.
#[derive(FromContext, Clone)]
pub struct ContentReader {
    pub(crate) converter: AppConverter,
}

impl ContentReader {
    /// Returns the document's text.
    ///
    /// `.pdf` files are converted to markdown; everything else is read as
    /// UTF-8 with NUL bytes stripped (graph string properties reject them).
    pub async fn read(&self, path: &Path) -> Result<String, AppError> {
        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

        if is_pdf {
            return self.converter.convert(path).await;
        }

        let bytes = tokio::fs::read(path).await.map_err(|e| AppError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Ok(String::from_utf8_lossy(&bytes).replace('\0', ""))
    }
}
