//! # Observability
//!
//! Run tracing for the RLM controller:
//! - [`TraceLog`] appends `init`, `action` and `final` entries to a JSONL log
//! - [`summarize`] replays a log into a [`TraceSummary`] that renders as
//!   markdown

pub mod summary;
pub mod trace_log;

pub use summary::{TraceSummary, summarize, summarize_str};
pub use trace_log::{EntryKind, RESERVED_KEYS, TraceLog};
