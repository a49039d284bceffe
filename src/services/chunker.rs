//! Sliding-window text chunker.

use crate::models::Chunk;

/// Splits text into overlapping windows of whitespace-delimited tokens.
///
/// Each window's text is a byte-exact slice of the source, from the first
/// byte of its first token to the last byte of its last token. Successive
/// windows share `overlap` tokens, so concatenating them (overlap-adjusted)
/// reproduces the full token stream in order.
#[derive(Debug, Clone)]
pub struct Chunker {
    window_size: usize,
    overlap: usize,
}

impl Chunker {
    /// Creates a chunker producing windows of `window_size` tokens that
    /// overlap by `overlap` tokens.
    ///
    /// An overlap at or above the window size would stall the window; it is
    /// clamped so the window always advances by at least one token.
    pub fn new(window_size: usize, overlap: usize) -> Self {
        let window_size = window_size.max(1);
        Self {
            window_size,
            overlap: overlap.min(window_size - 1),
        }
    }

    /// Chunks `text` into indexed windows, in document order.
    ///
    /// Whitespace-only text yields no chunks; text shorter than one window
    /// yields exactly one.
    pub fn chunk(&self, text: &str) -> Vec<Chunk> {
        let tokens = token_spans(text);
        if tokens.is_empty() {
            return Vec::new();
        }

        let step = self.window_size - self.overlap;
        let mut chunks = Vec::new();
        let mut start = 0;
        loop {
            let end = (start + self.window_size).min(tokens.len());
            let (first, _) = tokens[start];
            let (_, last) = tokens[end - 1];
            chunks.push(Chunk {
                index: chunks.len(),
                text: text[first..last].to_string(),
            });
            if end == tokens.len() {
                break;
            }
            start += step;
        }
        chunks
    }
}

/// Byte ranges of the whitespace-delimited tokens in `text`.
fn token_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut token_start = None;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(start) = token_start.take() {
                spans.push((start, i));
            }
        } else if token_start.is_none() {
            token_start = Some(i);
        }
    }
    if let Some(start) = token_start {
        spans.push((start, text.len()));
    }
    spans
}
