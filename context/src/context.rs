use crate::types::{ContextMeta, ReadLimits, SearchMatch, Span};
use errors::ContextError;
use tracing::{debug, instrument, warn};

/// An opened context: the full text plus a character index over it.
///
/// ASCII text needs no index since byte and character offsets coincide.
#[derive(Debug, Clone)]
pub struct Context {
    path: String,
    text: String,
    char_starts: Option<Vec<usize>>,
    limits: ReadLimits,
}

impl Context {
    pub fn new(path: impl Into<String>, text: String, limits: ReadLimits) -> Self {
        let char_starts = if text.is_ascii() {
            None
        } else {
            Some(text.char_indices().map(|(i, _)| i).collect())
        };
        Self {
            path: path.into(),
            text,
            char_starts,
            limits,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn limits(&self) -> &ReadLimits {
        &self.limits
    }

    /// Length in characters.
    pub fn char_len(&self) -> usize {
        match &self.char_starts {
            Some(starts) => starts.len(),
            None => self.text.len(),
        }
    }

    /// Byte offset of character `index`, clamped to the end of the text.
    pub fn byte_offset(&self, index: usize) -> usize {
        match &self.char_starts {
            Some(starts) => starts.get(index).copied().unwrap_or(self.text.len()),
            None => index.min(self.text.len()),
        }
    }

    /// Character offset of a byte offset that lies on a char boundary.
    pub fn char_offset(&self, byte: usize) -> usize {
        match &self.char_starts {
            Some(starts) => match starts.binary_search(&byte) {
                Ok(i) | Err(i) => i,
            },
            None => byte.min(self.text.len()),
        }
    }

    /// Text of a character span, clamped to the context.
    pub fn slice(&self, span: Span) -> &str {
        let start = self.byte_offset(span.start);
        let end = self.byte_offset(span.end).max(start);
        &self.text[start..end]
    }

    /// Metadata recomputed from the text.
    pub fn meta(&self) -> ContextMeta {
        ContextMeta {
            bytes: self.text.len(),
            chars: self.char_len(),
            sha256: utils::compute_content_hash(&self.text),
            created: utils::unix_timestamp(),
            ctx_id: None,
            ctx_path: self.path.clone(),
        }
    }

    /// Bounded window read.
    ///
    /// `offset` is clamped into `[0, len]` and `length` into
    /// `[0, min(length, max_peek_length, len - offset)]`.
    pub fn peek(&self, offset: usize, length: usize) -> &str {
        let n = self.char_len();
        let offset = offset.min(n);
        let length = length.min(self.limits.max_peek_length).min(n - offset);
        self.slice(Span::new(offset, offset + length))
    }

    /// Regex search bounded by result count and deadline.
    ///
    /// Offsets in the result are character offsets.
    #[instrument(skip(self), fields(ctx = %self.path))]
    pub fn search(&self, pattern: &str) -> Result<Vec<SearchMatch>, ContextError> {
        crate::search::find_bounded(
            self,
            pattern,
            self.limits.max_search_results,
            self.limits.search_timeout,
        )
    }

    /// Fixed-size windows over the text.
    ///
    /// `size` is floored at 1 and `overlap` clamped to `[0, size - 1]`. The
    /// window that reaches the end of the text is the last one.
    pub fn chunk(&self, size: usize, overlap: usize) -> Vec<Span> {
        let n = self.char_len();
        let size = size.max(1);
        let overlap = overlap.min(size - 1);

        let mut chunks = Vec::new();
        let mut i = 0;
        while i < n {
            let j = n.min(i + size);
            chunks.push(Span::new(i, j));
            if j == n {
                break;
            }
            if chunks.len() >= self.limits.max_chunks {
                warn!(
                    ctx = %self.path,
                    max_chunks = self.limits.max_chunks,
                    "chunk ceiling reached before end of text"
                );
                break;
            }
            i = j - overlap;
        }
        debug!(ctx = %self.path, size, overlap, count = chunks.len(), "chunked context");
        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(text: &str) -> Context {
        Context::new("test.txt", text.to_string(), ReadLimits::default())
    }

    #[test]
    fn test_peek_within_bounds() {
        let c = ctx("hello world");
        assert_eq!(c.peek(6, 5), "world");
        assert_eq!(c.peek(0, 5), "hello");
    }

    #[test]
    fn test_peek_clamps_offset_and_length() {
        let c = ctx("hello world");
        assert_eq!(c.peek(100, 5), "");
        assert_eq!(c.peek(6, 100), "world");
        assert_eq!(c.peek(0, 0), "");
    }

    #[test]
    fn test_peek_respects_ceiling() {
        let limits = ReadLimits {
            max_peek_length: 4,
            ..ReadLimits::default()
        };
        let c = Context::new("t", "abcdefgh".to_string(), limits);
        assert_eq!(c.peek(0, 100), "abcd");
    }

    #[test]
    fn test_peek_uses_character_offsets() {
        let c = ctx("héllo wörld");
        assert_eq!(c.char_len(), 11);
        assert_eq!(c.peek(1, 4), "éllo");
        assert_eq!(c.peek(6, 5), "wörld");
    }

    #[test]
    fn test_chunk_with_overlap_stops_at_end() {
        let c = ctx("abcdefghijkl");
        let chunks = c.chunk(5, 2);
        assert_eq!(
            chunks,
            vec![Span::new(0, 5), Span::new(3, 8), Span::new(6, 11), Span::new(9, 12)]
        );
    }

    #[test]
    fn test_chunk_clamps_size_and_overlap() {
        let c = ctx("abc");
        assert_eq!(
            c.chunk(0, 0),
            vec![Span::new(0, 1), Span::new(1, 2), Span::new(2, 3)]
        );
        // overlap >= size is clamped to size - 1, so windows still advance
        assert_eq!(c.chunk(2, 10), vec![Span::new(0, 2), Span::new(1, 3)]);
    }

    #[test]
    fn test_chunk_empty_text() {
        assert!(ctx("").chunk(10, 0).is_empty());
    }

    #[test]
    fn test_chunk_ceiling() {
        let limits = ReadLimits {
            max_chunks: 3,
            ..ReadLimits::default()
        };
        let c = Context::new("t", "x".repeat(100), limits);
        assert_eq!(c.chunk(1, 0).len(), 3);
    }

    #[test]
    fn test_meta_counts_bytes_and_chars() {
        let meta = ctx("naïve").meta();
        assert_eq!(meta.chars, 5);
        assert_eq!(meta.bytes, 6);
        assert_eq!(meta.sha256.len(), 64);
        assert_eq!(meta.ctx_path, "test.txt");
        assert!(meta.ctx_id.is_none());
    }

    #[test]
    fn test_char_and_byte_offsets_roundtrip() {
        let c = ctx("aé b");
        assert_eq!(c.byte_offset(2), 3);
        assert_eq!(c.char_offset(3), 2);
        assert_eq!(c.byte_offset(99), c.text().len());
        assert_eq!(c.char_offset(c.text().len()), 4);
    }
}
