use config::StoreConfig;
use config::limits;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Metadata persisted as `<id>.json` and reported by `meta`.
///
/// `ctx_id` is only known when the context was just stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMeta {
    pub bytes: usize,
    pub chars: usize,
    pub sha256: String,
    pub created: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ctx_id: Option<String>,
    pub ctx_path: String,
}

/// Half-open character range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One regex hit, offsets in characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMatch {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "match")]
    pub text: String,
}

/// Read ceilings applied by a [`crate::Context`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadLimits {
    pub max_peek_length: usize,
    pub max_search_results: usize,
    pub max_chunks: usize,
    pub search_timeout: Duration,
}

impl Default for ReadLimits {
    fn default() -> Self {
        Self {
            max_peek_length: limits::MAX_PEEK_LENGTH,
            max_search_results: limits::MAX_SEARCH_RESULTS,
            max_chunks: limits::MAX_CHUNKS,
            search_timeout: Duration::from_millis(limits::SEARCH_TIMEOUT_MS),
        }
    }
}

impl From<&StoreConfig> for ReadLimits {
    fn from(config: &StoreConfig) -> Self {
        Self {
            max_peek_length: config.max_peek_length.min(limits::MAX_PEEK_LENGTH),
            max_search_results: config.max_search_results.min(limits::MAX_SEARCH_RESULTS),
            max_chunks: config.max_chunks.min(limits::MAX_CHUNKS),
            search_timeout: Duration::from_millis(
                config.search_timeout_ms.min(limits::SEARCH_TIMEOUT_MS),
            ),
        }
    }
}
