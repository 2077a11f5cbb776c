//! Tool-call emission.
//!
//! The emitter trusts nothing the scheduler wrote. Every manifest line is
//! re-checked (action safelist, positive batch id, required fields, guarded
//! prompt path, ceilings) before any prompt file is opened, and a single bad
//! record fails the whole emission.

use crate::manifest::ManifestLimits;
use errors::DelegationError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};
use utils::{PathGuard, redact_secrets};

/// Actions the emitter will turn into tool calls.
const EMITTABLE_ACTIONS: &[&str] = &["sessions_spawn"];

/// Tool named in every emitted call.
pub const SPAWN_TOOL: &str = "sessions_spawn";

const REQUIRED_FIELDS: &[&str] = &[
    "batch",
    "prompt_file",
    "slice_start",
    "slice_end",
    "kw",
    "action",
];

/// Prepended to every delegated task unless a custom preamble is given.
pub const DEFAULT_PREAMBLE: &str = "You are a sub-agent processing one slice of a larger \
document. Work only with the text below. Answer the goal concisely, quote the passages that \
support your answer, and reply \"NO RELEVANT CONTENT\" if the slice does not address the goal.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallParams {
    pub task: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool: String,
    pub params: ToolCallParams,
}

/// Calls that may run concurrently; batches run in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallBatch {
    pub batch: u64,
    pub calls: Vec<ToolCall>,
}

#[derive(Debug)]
struct CheckedRecord {
    batch: u64,
    prompt_file: String,
    resolved: PathBuf,
}

/// Renders a spawn manifest into grouped tool calls.
#[derive(Debug, Clone)]
pub struct ToolCallEmitter {
    guard: PathGuard,
    limits: ManifestLimits,
    redact: bool,
}

impl ToolCallEmitter {
    pub fn new(guard: PathGuard, limits: ManifestLimits, redact: bool) -> Self {
        Self {
            guard,
            limits,
            redact,
        }
    }

    /// Read a manifest file through the guard and emit it.
    #[instrument(skip(self, manifest, preamble), fields(manifest = %manifest.as_ref().display()))]
    pub fn emit_file(
        &self,
        manifest: impl AsRef<Path>,
        preamble: &str,
    ) -> Result<Vec<ToolCallBatch>, DelegationError> {
        let manifest = manifest.as_ref();
        let resolved = self.guard.validate(manifest)?;
        let raw = fs::read_to_string(&resolved).map_err(|e| DelegationError::Io {
            path: manifest.display().to_string(),
            reason: e.to_string(),
        })?;
        self.emit(&raw, preamble)
    }

    /// Validate every JSONL record of `manifest`, then compose one call per
    /// record grouped by batch id.
    pub fn emit(
        &self,
        manifest: &str,
        preamble: &str,
    ) -> Result<Vec<ToolCallBatch>, DelegationError> {
        let mut records: Vec<CheckedRecord> = Vec::new();
        for (index, line) in manifest.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record = self.check_record(index + 1, line)?;
            // Batch ids never decrease in file order.
            let previous = records.last().map_or(0, |r| r.batch);
            if record.batch < previous {
                return Err(DelegationError::BatchOutOfOrder {
                    line: index + 1,
                    batch: record.batch,
                    previous,
                });
            }
            records.push(record);
        }

        if records.len() > self.limits.max_subcalls {
            return Err(DelegationError::SubcallLimitExceeded {
                count: records.len(),
                max: self.limits.max_subcalls,
            });
        }
        let highest = records.iter().map(|r| r.batch).max().unwrap_or(0);
        if highest > self.limits.max_batches as u64 {
            return Err(DelegationError::BatchLimitExceeded {
                count: highest as usize,
                max: self.limits.max_batches,
            });
        }

        let mut grouped: BTreeMap<u64, Vec<ToolCall>> = BTreeMap::new();
        for record in &records {
            let content = fs::read_to_string(&record.resolved).map_err(|e| DelegationError::Io {
                path: record.prompt_file.clone(),
                reason: e.to_string(),
            })?;
            let mut task = format!("{preamble}\n\n{content}");
            if self.redact {
                task = redact_secrets(&task);
            }
            let calls = grouped.entry(record.batch).or_default();
            let label = format!("rlm-b{}-{}", record.batch, calls.len() + 1);
            calls.push(ToolCall {
                tool: SPAWN_TOOL.to_string(),
                params: ToolCallParams { task, label },
            });
        }

        let batches: Vec<ToolCallBatch> = grouped
            .into_iter()
            .map(|(batch, calls)| ToolCallBatch { batch, calls })
            .collect();
        info!(
            records = records.len(),
            batches = batches.len(),
            redact = self.redact,
            "tool calls emitted"
        );
        Ok(batches)
    }

    fn check_record(&self, line: usize, raw: &str) -> Result<CheckedRecord, DelegationError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| DelegationError::MalformedRecord {
                line,
                reason: e.to_string(),
            })?;
        let Value::Object(record) = value else {
            return Err(DelegationError::MalformedRecord {
                line,
                reason: "expected a JSON object".to_string(),
            });
        };

        for field in REQUIRED_FIELDS {
            if record.get(*field).is_none_or(Value::is_null) {
                return Err(DelegationError::MissingField {
                    line,
                    field: (*field).to_string(),
                });
            }
        }

        let action = string_field(&record, "action", line)?;
        if !EMITTABLE_ACTIONS.contains(&action) {
            warn!(line, action, "disallowed action in manifest");
            return Err(DelegationError::DisallowedAction {
                line,
                action: action.to_string(),
            });
        }

        let batch = match record.get("batch").and_then(Value::as_u64) {
            Some(id) if id > 0 => id,
            _ => {
                return Err(DelegationError::InvalidBatchId {
                    line,
                    value: record.get("batch").map(Value::to_string).unwrap_or_default(),
                });
            }
        };

        for field in ["slice_start", "slice_end"] {
            if record.get(field).and_then(Value::as_u64).is_none() {
                return Err(DelegationError::MalformedRecord {
                    line,
                    reason: format!("{field} must be a non-negative integer"),
                });
            }
        }
        string_field(&record, "kw", line)?;

        let prompt_file = string_field(&record, "prompt_file", line)?;
        let resolved = self.guard.validate(prompt_file)?;
        debug!(line, batch, prompt_file, "manifest record accepted");

        Ok(CheckedRecord {
            batch,
            prompt_file: prompt_file.to_string(),
            resolved,
        })
    }
}

fn string_field<'a>(
    record: &'a Map<String, Value>,
    field: &str,
    line: usize,
) -> Result<&'a str, DelegationError> {
    record
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| DelegationError::MalformedRecord {
            line,
            reason: format!("{field} must be a string"),
        })
}

/// Read a custom preamble through the guard.
pub fn read_preamble(guard: &PathGuard, path: impl AsRef<Path>) -> Result<String, DelegationError> {
    let path = path.as_ref();
    let resolved = guard.validate(path)?;
    fs::read_to_string(&resolved).map_err(|e| DelegationError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn emitter(root: &TempDir) -> ToolCallEmitter {
        ToolCallEmitter::new(
            PathGuard::new(root.path()).unwrap(),
            ManifestLimits::default(),
            true,
        )
    }

    fn line(batch: &str, action: &str) -> String {
        format!(
            r#"{{"batch": {batch}, "prompt_file": "p.txt", "slice_start": 0, "slice_end": 4, "kw": "k", "action": "{action}"}}"#
        )
    }

    #[test]
    fn test_disallowed_action_rejected() {
        let root = TempDir::new().unwrap();
        let err = emitter(&root)
            .emit(&line("1", "shell_exec"), DEFAULT_PREAMBLE)
            .unwrap_err();
        assert!(matches!(
            err,
            DelegationError::DisallowedAction { line: 1, ref action } if action == "shell_exec"
        ));
    }

    #[test]
    fn test_batch_must_be_positive_integer() {
        let root = TempDir::new().unwrap();
        for bad in ["0", "-1", "1.5", "\"1\""] {
            let err = emitter(&root)
                .emit(&line(bad, "sessions_spawn"), DEFAULT_PREAMBLE)
                .unwrap_err();
            assert!(
                matches!(err, DelegationError::InvalidBatchId { line: 1, .. }),
                "batch {bad} accepted"
            );
        }
    }

    #[test]
    fn test_missing_field_named() {
        let root = TempDir::new().unwrap();
        let raw = r#"{"batch": 1, "prompt_file": "p.txt", "slice_start": 0, "slice_end": 4, "action": "sessions_spawn"}"#;
        let err = emitter(&root).emit(raw, DEFAULT_PREAMBLE).unwrap_err();
        assert!(matches!(err, DelegationError::MissingField { ref field, .. } if field == "kw"));
    }

    #[test]
    fn test_non_object_line_rejected() {
        let root = TempDir::new().unwrap();
        let err = emitter(&root).emit("[1, 2]", DEFAULT_PREAMBLE).unwrap_err();
        assert!(matches!(err, DelegationError::MalformedRecord { line: 1, .. }));
    }

    #[test]
    fn test_empty_manifest_emits_nothing() {
        let root = TempDir::new().unwrap();
        assert!(emitter(&root).emit("\n\n", DEFAULT_PREAMBLE).unwrap().is_empty());
    }
}
