use crate::ranges::Interval;
use context::Span;
use errors::PlanError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use utils::PathGuard;

/// Character range of a context tagged with the keyword that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slice {
    pub start: usize,
    pub end: usize,
    pub kw: String,
}

impl Slice {
    pub fn new(start: usize, end: usize, kw: impl Into<String>) -> Self {
        Self {
            start,
            end,
            kw: kw.into(),
        }
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}

impl Interval for Slice {
    type Point = usize;

    fn start(&self) -> usize {
        self.start
    }

    fn end(&self) -> usize {
        self.end
    }

    fn extend_to(&mut self, end: usize) {
        self.end = end;
    }
}

/// Keyword planner output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelevancePlan {
    pub keywords: Vec<String>,
    pub slices: Vec<Slice>,
}

/// A written prompt file and the slice it was cut from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptFile {
    pub file: String,
    pub slice: Slice,
}

/// Limits applied while building a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub max_subcalls: usize,
    pub slice_max: usize,
    pub window: usize,
    pub redact: bool,
}

/// The `plan.json` descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub ctx: String,
    pub goal: String,
    pub keywords: Vec<String>,
    pub slices: Vec<Slice>,
    pub subcall_prompts: Vec<PromptFile>,
    pub policy: Policy,
}

impl Plan {
    /// Read a plan descriptor through the guard.
    pub fn load(guard: &PathGuard, path: impl AsRef<Path>) -> Result<Self, PlanError> {
        let path = path.as_ref();
        let resolved = guard.validate(path)?;
        let raw = fs::read_to_string(&resolved).map_err(|e| PlanError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|e| PlanError::MalformedPlan {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Write the descriptor as pretty JSON through the guard.
    pub fn save(&self, guard: &PathGuard, path: impl AsRef<Path>) -> Result<(), PlanError> {
        let path = path.as_ref();
        let resolved = guard.validate(path)?;
        let json = serde_json::to_string_pretty(self).map_err(|e| PlanError::MalformedPlan {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        fs::write(&resolved, json).map_err(|e| PlanError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}
