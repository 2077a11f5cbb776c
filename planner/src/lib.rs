//! # Relevance Planning
//!
//! Turns a goal statement into bounded work for delegated sub-calls:
//!
//! 1. [`extract_keywords`] picks the most frequent meaningful words of the goal
//! 2. [`RelevancePlanner`] finds them in a context and merges the surrounding
//!    windows into sorted, non-overlapping [`Slice`]s
//! 3. [`AutoPlanner`] writes one redacted prompt file per slice and the
//!    [`Plan`] descriptor referencing them

pub mod auto;
pub mod keywords;
pub mod ranges;
pub mod relevance;
pub mod types;

pub use auto::{AutoPlanOptions, AutoPlanner, FALLBACK_KEYWORD};
pub use keywords::{STOP_WORDS, extract_keywords};
pub use ranges::{Interval, merge_intervals};
pub use relevance::RelevancePlanner;
pub use types::{Plan, Policy, PromptFile, RelevancePlan, Slice};
