use errors::DelegationError;
use planner::{Plan, PromptFile};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;
use utils::PathGuard;

/// A plan's prompts partitioned into fixed-size batches, order preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsyncPlan {
    pub ctx: String,
    pub goal: String,
    pub batch_size: usize,
    pub batches: Vec<Vec<PromptFile>>,
}

impl AsyncPlan {
    /// Consecutive batches of exactly `batch_size` prompts, the last may be
    /// smaller.
    pub fn build(plan: &Plan, batch_size: usize) -> Result<Self, DelegationError> {
        if batch_size == 0 {
            return Err(DelegationError::InvalidBatchSize { batch_size });
        }
        let batches: Vec<Vec<PromptFile>> = plan
            .subcall_prompts
            .chunks(batch_size)
            .map(<[PromptFile]>::to_vec)
            .collect();
        info!(
            prompts = plan.subcall_prompts.len(),
            batches = batches.len(),
            batch_size,
            "async plan built"
        );
        Ok(Self {
            ctx: plan.ctx.clone(),
            goal: plan.goal.clone(),
            batch_size,
            batches,
        })
    }

    pub fn prompt_count(&self) -> usize {
        self.batches.iter().map(Vec::len).sum()
    }

    pub fn load(guard: &PathGuard, path: impl AsRef<Path>) -> Result<Self, DelegationError> {
        let path = path.as_ref();
        let resolved = guard.validate(path)?;
        let raw = fs::read_to_string(&resolved).map_err(|e| DelegationError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|e| DelegationError::MalformedDescriptor {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    pub fn save(&self, guard: &PathGuard, path: impl AsRef<Path>) -> Result<(), DelegationError> {
        let path = path.as_ref();
        let resolved = guard.validate(path)?;
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            DelegationError::Serialization {
                reason: e.to_string(),
            }
        })?;
        fs::write(&resolved, json).map_err(|e| DelegationError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}
