//! Document and chunk models.

use serde::{Deserialize, Serialize};

/// An ingested document, identified by its normalized filename.
///
/// Merged idempotently: re-ingesting the same file matches the existing
/// node. The pipeline never deletes documents; file management is an
/// external concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Normalized filename (see [`normalize_document_id`]).
    pub id: String,
}

/// A bounded, overlapping token window of a document's text.
///
/// Chunks get a fresh identity on every ingestion run and are immutable
/// once written; they are not deduplicated by content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Position within the document, `0..N-1` in document order.
    pub index: usize,
    /// The window's source text, a byte-exact slice of the document.
    pub text: String,
}

/// Normalizes a filename into a document id.
///
/// Every character outside `[A-Za-z0-9_-]` becomes `_`, so ids are safe
/// as plain string properties and stable across runs.
pub fn normalize_document_id(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Generates a fresh chunk identity (ULID).
pub fn generate_chunk_id() -> String {
    ulid::Ulid::new().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_id_keeps_safe_characters() {
        assert_eq!(normalize_document_id("notes_2024-q3.txt"), "notes_2024-q3_txt");
        assert_eq!(normalize_document_id("plain"), "plain");
    }

    #[test]
    fn document_id_replaces_everything_else() {
        assert_eq!(normalize_document_id("white paper (final).pdf"), "white_paper__final__pdf");
        assert_eq!(normalize_document_id("доклад.txt"), "_______txt");
    }

    #[test]
    fn document_id_is_stable() {
        let once = normalize_document_id("a b.c");
        let twice = normalize_document_id(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn chunk_ids_are_unique() {
        assert_ne!(generate_chunk_id(), generate_chunk_id());
    }
}
