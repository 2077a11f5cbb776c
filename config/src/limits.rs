//! # Hard Limits
//!
//! Ceilings shared by the store, the planners and the delegation layer.
//! Configuration may lower these values, validation rejects anything above.

/// Longest text a single `peek` returns, in characters.
pub const MAX_PEEK_LENGTH: usize = 16_000;

/// Most matches a single `search` returns.
pub const MAX_SEARCH_RESULTS: usize = 200;

/// Most windows a single `chunk` call emits.
pub const MAX_CHUNKS: usize = 5_000;

/// Wall-clock budget for one regex search.
pub const SEARCH_TIMEOUT_MS: u64 = 5_000;

/// Most delegated sub-calls in one manifest.
pub const MAX_SUBCALLS: usize = 32;

/// Most batches in one manifest.
pub const MAX_BATCHES: usize = 8;

/// Keywords kept from a goal statement.
pub const MAX_KEYWORDS: usize = 8;

/// Occurrences located per keyword.
pub const MAX_HITS_PER_KEYWORD: usize = 20;

/// Characters added on each side of a keyword hit.
pub const DEFAULT_WINDOW: usize = 1_200;

/// Widest slice turned into a prompt file.
pub const DEFAULT_SLICE_MAX: usize = 16_000;

/// Prompts per batch.
pub const DEFAULT_BATCH_SIZE: usize = 4;
