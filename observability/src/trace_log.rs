//! # Trace Log
//!
//! Append-only JSONL record of one controller run. Every line carries a
//! `type` (`init`, `action` or `final`) and a `ts` Unix timestamp; lines are
//! never rewritten.

use errors::TraceError;
use serde_json::{Map, Value};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;
use utils::PathGuard;

/// Keys owned by the log itself; callers cannot override them.
pub const RESERVED_KEYS: &[&str] = &["type", "ts"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Init,
    Action,
    Final,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::Init => "init",
            EntryKind::Action => "action",
            EntryKind::Final => "final",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "init" => Some(EntryKind::Init),
            "action" => Some(EntryKind::Action),
            "final" => Some(EntryKind::Final),
            _ => None,
        }
    }
}

/// Handle on a trace log file behind the guard.
#[derive(Debug, Clone)]
pub struct TraceLog {
    path: String,
    resolved: PathBuf,
}

impl TraceLog {
    pub fn open(guard: &PathGuard, path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let path = path.as_ref();
        let resolved = guard.validate(path)?;
        Ok(Self {
            path: path.display().to_string(),
            resolved,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Record the start of a run.
    pub fn init(&self, ctx: &str, goal: &str) -> Result<(), TraceError> {
        let mut fields = Map::new();
        fields.insert("ctx".to_string(), Value::from(ctx));
        fields.insert("goal".to_string(), Value::from(goal));
        self.write_entry(EntryKind::Init, fields)
    }

    /// Record an ad hoc action; `type` and `ts` in `fields` are ignored.
    pub fn append(&self, fields: Map<String, Value>) -> Result<(), TraceError> {
        self.write_entry(EntryKind::Action, fields)
    }

    /// Record the final result.
    pub fn finalize(&self, result: &str) -> Result<(), TraceError> {
        let mut fields = Map::new();
        fields.insert("result".to_string(), Value::from(result));
        self.write_entry(EntryKind::Final, fields)
    }

    fn write_entry(&self, kind: EntryKind, fields: Map<String, Value>) -> Result<(), TraceError> {
        let mut entry = Map::new();
        entry.insert("type".to_string(), Value::from(kind.as_str()));
        entry.insert("ts".to_string(), Value::from(utils::unix_timestamp()));
        for (key, value) in fields {
            if !RESERVED_KEYS.contains(&key.as_str()) {
                entry.insert(key, value);
            }
        }

        let mut line = serde_json::to_string(&Value::Object(entry)).map_err(|e| {
            TraceError::Serialization {
                reason: e.to_string(),
            }
        })?;
        line.push('\n');

        let io_error = |e: std::io::Error| TraceError::Io {
            path: self.path.clone(),
            reason: e.to_string(),
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.resolved)
            .map_err(io_error)?;
        file.write_all(line.as_bytes()).map_err(io_error)?;

        debug!(path = %self.path, kind = kind.as_str(), "trace entry appended");
        Ok(())
    }
}
