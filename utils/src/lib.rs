//! # RLM Controller Utilities
//!
//! Leaf helpers shared by every other crate:
//!
//! - content hashing and content-derived identifiers
//! - [`PathGuard`], the containment check gating all file paths
//! - [`redact_secrets`], the scrubber applied to delegated prompt text

pub mod path_guard;
pub mod redact;

pub use path_guard::PathGuard;
pub use redact::{REDACTED, SecretRedactor, redact_secrets};

use sha2::{Digest, Sha256};

/// Number of hex characters kept from the content hash to form a context id.
pub const CONTEXT_ID_LENGTH: usize = 12;

/// Compute SHA-256 hash of content string
///
/// # Examples
///
/// ```
/// use utils::compute_content_hash;
///
/// let hash = compute_content_hash("hello world");
/// assert_eq!(hash.len(), 64);
/// ```
#[must_use]
pub fn compute_content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Derive the content-addressed id of a text blob.
///
/// The id is the first [`CONTEXT_ID_LENGTH`] hex characters of the SHA-256
/// of the content, so storing identical content always yields the same id.
#[must_use]
pub fn context_id(content: &str) -> String {
    let mut hash = compute_content_hash(content);
    hash.truncate(CONTEXT_ID_LENGTH);
    hash
}

/// Current wall-clock time as whole seconds since the Unix epoch.
#[must_use]
pub fn unix_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}
