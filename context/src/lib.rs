//! Content-addressed context storage for the RLM controller.
//!
//! A context is an immutable text blob stored as `<id>.txt` next to an
//! `<id>.json` metadata file, where the id is the first 12 hex characters of
//! the SHA-256 of the text. Reads are bounded:
//!
//! - `peek` clamps its window and never fails on range
//! - `search` stops at a result ceiling and fails closed on its deadline
//! - `chunk` emits at most a fixed number of windows
//!
//! All offsets are character offsets, matching the `chars` metadata field.
//!
//! # Example
//!
//! ```rust,ignore
//! use context::{ContextStore, ReadLimits};
//! use utils::PathGuard;
//!
//! let store = ContextStore::new(PathGuard::current_dir()?, ReadLimits::default());
//! let meta = store.store("notes.txt", "ctx")?;
//! let ctx = store.open(&meta.ctx_path)?;
//! println!("{}", ctx.peek(0, 200));
//! ```

mod context;
mod search;
mod store;
mod types;

pub use context::Context;
pub use store::ContextStore;
pub use types::{ContextMeta, ReadLimits, SearchMatch, Span};
