//! # Configuration Structures
//!
//! All configuration structures for the RLM controller toolchain.
//!
//! Every structure:
//! - Uses `serde` for serialization/deserialization, with per-field defaults
//!   so partial files are accepted
//! - Uses `validator` for range checks against the hard ceilings in
//!   [`crate::limits`]

use crate::limits;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Top-level configuration aggregating every component.
///
/// ## Usage
/// ```rust
/// use config::{Config, Validate};
///
/// let config = Config::default();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.store.max_peek_length, 16_000);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default, PartialEq)]
pub struct Config {
    /// Context store read limits
    #[serde(default)]
    #[validate(nested)]
    pub store: StoreConfig,

    /// Keyword relevance planner settings
    #[serde(default)]
    #[validate(nested)]
    pub planner: PlannerConfig,

    /// Prompt-file generation settings
    #[serde(default)]
    #[validate(nested)]
    pub auto_plan: AutoPlanConfig,

    /// Batch scheduling and emission ceilings
    #[serde(default)]
    #[validate(nested)]
    pub delegation: DelegationConfig,

    /// Logging configuration
    #[serde(default)]
    #[validate(nested)]
    pub observability: ObservabilityConfig,
}

/// Context store configuration.
///
/// Reads are clamped to these values; none of them may exceed the ceilings
/// in [`crate::limits`].
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct StoreConfig {
    /// Directory contexts are stored in when none is given
    #[serde(default = "default_store_ctx_dir")]
    #[validate(length(min = 1))]
    pub ctx_dir: String,

    /// Longest text returned by one peek, in characters
    #[serde(default = "default_store_max_peek_length")]
    #[validate(range(min = 1, max = 16_000))]
    pub max_peek_length: usize,

    /// Most matches returned by one search
    #[serde(default = "default_store_max_search_results")]
    #[validate(range(min = 1, max = 200))]
    pub max_search_results: usize,

    /// Most windows returned by one chunk call
    #[serde(default = "default_store_max_chunks")]
    #[validate(range(min = 1, max = 5_000))]
    pub max_chunks: usize,

    /// Search deadline in milliseconds
    #[serde(default = "default_store_search_timeout_ms")]
    #[validate(range(min = 1, max = 5_000))]
    pub search_timeout_ms: u64,
}

fn default_store_ctx_dir() -> String {
    "ctx".to_string()
}

fn default_store_max_peek_length() -> usize {
    limits::MAX_PEEK_LENGTH
}

fn default_store_max_search_results() -> usize {
    limits::MAX_SEARCH_RESULTS
}

fn default_store_max_chunks() -> usize {
    limits::MAX_CHUNKS
}

fn default_store_search_timeout_ms() -> u64 {
    limits::SEARCH_TIMEOUT_MS
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            ctx_dir: default_store_ctx_dir(),
            max_peek_length: default_store_max_peek_length(),
            max_search_results: default_store_max_search_results(),
            max_chunks: default_store_max_chunks(),
            search_timeout_ms: default_store_search_timeout_ms(),
        }
    }
}

/// Relevance planner configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct PlannerConfig {
    /// Keywords kept from the goal
    #[serde(default = "default_planner_max_keywords")]
    #[validate(range(min = 1, max = 32))]
    pub max_keywords: usize,

    /// Occurrences located per keyword
    #[serde(default = "default_planner_max_hits_per_keyword")]
    #[validate(range(min = 1, max = 200))]
    pub max_hits_per_keyword: usize,

    /// Characters added on each side of a hit
    #[serde(default = "default_planner_window")]
    #[validate(range(max = 16_000))]
    pub window: usize,
}

fn default_planner_max_keywords() -> usize {
    limits::MAX_KEYWORDS
}

fn default_planner_max_hits_per_keyword() -> usize {
    limits::MAX_HITS_PER_KEYWORD
}

fn default_planner_window() -> usize {
    limits::DEFAULT_WINDOW
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_keywords: default_planner_max_keywords(),
            max_hits_per_keyword: default_planner_max_hits_per_keyword(),
            window: default_planner_window(),
        }
    }
}

/// Auto-planner configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct AutoPlanConfig {
    /// Most prompt files written for one plan
    #[serde(default = "default_auto_plan_max_subcalls")]
    #[validate(range(min = 1, max = 32))]
    pub max_subcalls: usize,

    /// Widest slice turned into a prompt, also the fallback chunk size
    #[serde(default = "default_auto_plan_slice_max")]
    #[validate(range(min = 1, max = 16_000))]
    pub slice_max: usize,

    /// Scrub prompt text before writing it
    #[serde(default = "default_auto_plan_redact")]
    pub redact: bool,
}

fn default_auto_plan_max_subcalls() -> usize {
    limits::MAX_SUBCALLS
}

fn default_auto_plan_slice_max() -> usize {
    limits::DEFAULT_SLICE_MAX
}

fn default_auto_plan_redact() -> bool {
    true
}

impl Default for AutoPlanConfig {
    fn default() -> Self {
        Self {
            max_subcalls: default_auto_plan_max_subcalls(),
            slice_max: default_auto_plan_slice_max(),
            redact: default_auto_plan_redact(),
        }
    }
}

/// Delegation configuration.
///
/// The subcall and batch ceilings can only be lowered.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct DelegationConfig {
    /// Prompts per batch
    #[serde(default = "default_delegation_batch_size")]
    #[validate(range(min = 1, max = 32))]
    pub batch_size: usize,

    /// Most records in a manifest
    #[serde(default = "default_delegation_max_subcalls")]
    #[validate(range(min = 1, max = 32))]
    pub max_subcalls: usize,

    /// Highest batch id in a manifest
    #[serde(default = "default_delegation_max_batches")]
    #[validate(range(min = 1, max = 8))]
    pub max_batches: usize,

    /// Scrub composed task text at emission
    #[serde(default = "default_delegation_redact")]
    pub redact: bool,
}

fn default_delegation_batch_size() -> usize {
    limits::DEFAULT_BATCH_SIZE
}

fn default_delegation_max_subcalls() -> usize {
    limits::MAX_SUBCALLS
}

fn default_delegation_max_batches() -> usize {
    limits::MAX_BATCHES
}

fn default_delegation_redact() -> bool {
    true
}

impl Default for DelegationConfig {
    fn default() -> Self {
        Self {
            batch_size: default_delegation_batch_size(),
            max_subcalls: default_delegation_max_subcalls(),
            max_batches: default_delegation_max_batches(),
            redact: default_delegation_redact(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ObservabilityConfig {
    /// Logging level
    #[serde(default = "default_observability_logging_level")]
    #[validate(custom(function = "validate_logging_level"))]
    pub logging_level: String,
}

fn default_observability_logging_level() -> String {
    "warn".to_string()
}

fn validate_logging_level(value: &str) -> Result<(), validator::ValidationError> {
    match value {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(validator::ValidationError::new("Invalid logging level")),
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            logging_level: default_observability_logging_level(),
        }
    }
}
