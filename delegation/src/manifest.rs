//! Spawn manifest writing.
//!
//! The manifest is JSONL, one record per prompt. Ceilings are enforced
//! before anything touches the disk: an over-limit plan leaves no file
//! behind.

use crate::async_plan::AsyncPlan;
use config::{DelegationConfig, limits};
use errors::DelegationError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, instrument, warn};
use utils::PathGuard;

/// The only action a manifest record may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnAction {
    #[serde(rename = "sessions_spawn")]
    SessionsSpawn,
}

/// One manifest line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnRecord {
    pub batch: usize,
    pub prompt_file: String,
    pub slice_start: usize,
    pub slice_end: usize,
    pub kw: String,
    pub action: SpawnAction,
}

/// Sub-call and batch ceilings for a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManifestLimits {
    pub max_subcalls: usize,
    pub max_batches: usize,
}

impl Default for ManifestLimits {
    fn default() -> Self {
        Self {
            max_subcalls: limits::MAX_SUBCALLS,
            max_batches: limits::MAX_BATCHES,
        }
    }
}

impl From<&DelegationConfig> for ManifestLimits {
    fn from(config: &DelegationConfig) -> Self {
        Self {
            max_subcalls: config.max_subcalls.min(limits::MAX_SUBCALLS),
            max_batches: config.max_batches.min(limits::MAX_BATCHES),
        }
    }
}

/// Records for every prompt of `plan`, batch ids 1-based.
pub fn build_records(
    plan: &AsyncPlan,
    limits: &ManifestLimits,
) -> Result<Vec<SpawnRecord>, DelegationError> {
    let count = plan.prompt_count();
    if count > limits.max_subcalls {
        warn!(count, max = limits.max_subcalls, "sub-call limit exceeded");
        return Err(DelegationError::SubcallLimitExceeded {
            count,
            max: limits.max_subcalls,
        });
    }
    if plan.batches.len() > limits.max_batches {
        warn!(batches = plan.batches.len(), max = limits.max_batches, "batch limit exceeded");
        return Err(DelegationError::BatchLimitExceeded {
            count: plan.batches.len(),
            max: limits.max_batches,
        });
    }

    let records = plan
        .batches
        .iter()
        .enumerate()
        .flat_map(|(i, batch)| {
            batch.iter().map(move |prompt| SpawnRecord {
                batch: i + 1,
                prompt_file: prompt.file.clone(),
                slice_start: prompt.slice.start,
                slice_end: prompt.slice.end,
                kw: prompt.slice.kw.clone(),
                action: SpawnAction::SessionsSpawn,
            })
        })
        .collect();
    Ok(records)
}

/// Validate `plan` and write its manifest to `out` in one write.
///
/// Every prompt path must pass the guard.
#[instrument(skip(guard, plan, out, limits), fields(out = %out.as_ref().display()))]
pub fn write_spawn_manifest(
    guard: &PathGuard,
    plan: &AsyncPlan,
    out: impl AsRef<Path>,
    limits: &ManifestLimits,
) -> Result<Vec<SpawnRecord>, DelegationError> {
    let out = out.as_ref();
    let resolved_out = guard.validate(out)?;
    let records = build_records(plan, limits)?;
    for record in &records {
        guard.validate(&record.prompt_file)?;
    }

    let mut body = String::new();
    for record in &records {
        let line = serde_json::to_string(record).map_err(|e| DelegationError::Serialization {
            reason: e.to_string(),
        })?;
        body.push_str(&line);
        body.push('\n');
    }

    if let Some(parent) = resolved_out.parent() {
        fs::create_dir_all(parent).map_err(|e| DelegationError::Io {
            path: out.display().to_string(),
            reason: e.to_string(),
        })?;
    }
    fs::write(&resolved_out, body).map_err(|e| DelegationError::Io {
        path: out.display().to_string(),
        reason: e.to_string(),
    })?;

    info!(records = records.len(), batches = plan.batches.len(), "spawn manifest written");
    Ok(records)
}
