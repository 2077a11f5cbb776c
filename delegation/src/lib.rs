//! # Delegation
//!
//! Turns a [`planner::Plan`] into work for an external executor:
//!
//! - [`AsyncPlan`] partitions prompts into fixed-size batches
//! - [`write_spawn_manifest`] serializes the batches as a JSONL manifest,
//!   enforcing the sub-call and batch ceilings at write time
//! - [`ToolCallEmitter`] re-validates a manifest and renders grouped tool
//!   calls; it never executes them
//!
//! Requests within a batch may run concurrently. Batches run strictly in
//! ascending order.

pub mod async_plan;
pub mod emit;
pub mod manifest;

pub use async_plan::AsyncPlan;
pub use emit::{
    DEFAULT_PREAMBLE, SPAWN_TOOL, ToolCall, ToolCallBatch, ToolCallEmitter, ToolCallParams,
    read_preamble,
};
pub use manifest::{
    ManifestLimits, SpawnAction, SpawnRecord, build_records, write_spawn_manifest,
};
