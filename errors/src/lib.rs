//! # RLM Controller Errors
//!
//! Error types for every component of the controller toolchain.
//!
//! The taxonomy mirrors how failures are handled:
//! - input-shape errors (malformed manifests, missing fields) are fatal
//! - write-time policy limits (sub-call and batch ceilings) are fatal
//! - security violations (traversal, escape, disallowed actions) are fatal
//!   and raised before any I/O
//! - regex hazards fail on compilation or on the search deadline
//!
//! Read-time limits never surface here: the store clamps them silently.

use thiserror::Error;

/// Path Guard rejections.
#[derive(Debug, Error)]
pub enum PathError {
    #[error("Refusing path traversal: {path} contains a '..' segment")]
    Traversal { path: String },

    #[error("Path {path} resolves outside the working directory {root}")]
    OutsideRoot { path: String, root: String },

    #[error("Cannot resolve {path}: {reason}")]
    Unresolvable { path: String, reason: String },

    #[error("Working directory unavailable: {reason}")]
    WorkingDirectory { reason: String },
}

/// Context Store errors.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error("I/O on {path} failed: {reason}")]
    Io { path: String, reason: String },

    #[error("Invalid regex: {reason}")]
    InvalidPattern { reason: String },

    #[error("Regex search timed out after {timeout_ms}ms (possible ReDoS pattern)")]
    SearchTimeout { timeout_ms: u64 },

    #[error("Serialization error: {reason}")]
    Serialization { reason: String },
}

/// Relevance Planner and Auto-Planner errors.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error("I/O on {path} failed: {reason}")]
    Io { path: String, reason: String },

    #[error("Invalid plan parameter {field}: {reason}")]
    InvalidParameter { field: String, reason: String },

    #[error("Plan descriptor {path} is malformed: {reason}")]
    MalformedPlan { path: String, reason: String },
}

/// Batch Scheduler and Toolcall Emitter errors.
#[derive(Debug, Error)]
pub enum DelegationError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error("I/O on {path} failed: {reason}")]
    Io { path: String, reason: String },

    #[error("Invalid batch size {batch_size}: must be at least 1")]
    InvalidBatchSize { batch_size: usize },

    #[error("Sub-call limit exceeded: {count} records, max {max}")]
    SubcallLimitExceeded { count: usize, max: usize },

    #[error("Batch limit exceeded: {count} batches, max {max}")]
    BatchLimitExceeded { count: usize, max: usize },

    #[error("Manifest line {line}: disallowed action {action:?}")]
    DisallowedAction { line: usize, action: String },

    #[error("Manifest line {line}: batch id {value} is not a positive integer")]
    InvalidBatchId { line: usize, value: String },

    #[error("Manifest line {line}: batch id {batch} follows batch {previous}")]
    BatchOutOfOrder {
        line: usize,
        batch: u64,
        previous: u64,
    },

    #[error("Manifest line {line}: missing required field {field}")]
    MissingField { line: usize, field: String },

    #[error("Manifest line {line}: malformed record: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("Descriptor {path} is malformed: {reason}")]
    MalformedDescriptor { path: String, reason: String },

    #[error("Serialization error: {reason}")]
    Serialization { reason: String },
}

/// Trace Logger errors.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error("I/O on {path} failed: {reason}")]
    Io { path: String, reason: String },

    #[error("Trace line {line} is malformed: {reason}")]
    MalformedEntry { line: usize, reason: String },

    #[error("Serialization error: {reason}")]
    Serialization { reason: String },
}
