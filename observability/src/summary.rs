//! # Trace Summary
//!
//! Replays a trace log into a structured summary and renders it as markdown.

use crate::trace_log::{EntryKind, RESERVED_KEYS};
use errors::TraceError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::info;
use utils::PathGuard;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TraceSummary {
    pub ctx: Option<String>,
    pub goal: Option<String>,
    /// Action fields without `type` and `ts`, in log order; each keeps the
    /// order its fields were written in.
    pub actions: Vec<Map<String, Value>>,
    /// Result of the last `final` entry.
    pub result: Option<String>,
}

impl TraceSummary {
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    /// Markdown report of the run.
    pub fn render(&self) -> String {
        let mut out = String::from("# RLM Trace Summary\n\n");
        if let Some(ctx) = &self.ctx {
            let _ = writeln!(out, "- Context: {ctx}");
        }
        if let Some(goal) = &self.goal {
            let _ = writeln!(out, "- Goal: {goal}");
        }
        let _ = writeln!(out, "- Actions: {}\n", self.action_count());

        out.push_str("## Actions\n\n");
        if self.actions.is_empty() {
            out.push_str("_none_\n");
        }
        for (i, action) in self.actions.iter().enumerate() {
            let fields: Vec<String> = action
                .iter()
                .map(|(key, value)| format!("{key}={}", render_value(value)))
                .collect();
            let _ = writeln!(out, "{}. {}", i + 1, fields.join(", "));
        }

        out.push_str("\n## Final\n\n");
        match &self.result {
            Some(result) => {
                out.push_str(result);
                out.push('\n');
            }
            None => out.push_str("_no final result recorded_\n"),
        }
        out
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse trace log text; line numbers in errors are 1-based.
pub fn summarize_str(raw: &str) -> Result<TraceSummary, TraceError> {
    let mut summary = TraceSummary::default();
    for (index, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let line_no = index + 1;
        let malformed = |reason: &str| TraceError::MalformedEntry {
            line: line_no,
            reason: reason.to_string(),
        };

        let value: Value =
            serde_json::from_str(line).map_err(|e| malformed(&e.to_string()))?;
        let Value::Object(mut entry) = value else {
            return Err(malformed("expected a JSON object"));
        };
        let kind = entry
            .get("type")
            .and_then(Value::as_str)
            .and_then(EntryKind::parse)
            .ok_or_else(|| malformed("missing or unknown type"))?;

        match kind {
            EntryKind::Init => {
                summary.ctx = entry.get("ctx").and_then(Value::as_str).map(str::to_string);
                summary.goal = entry.get("goal").and_then(Value::as_str).map(str::to_string);
            }
            EntryKind::Action => {
                entry.retain(|key, _| !RESERVED_KEYS.contains(&key.as_str()));
                summary.actions.push(entry);
            }
            EntryKind::Final => {
                summary.result = Some(
                    entry
                        .get("result")
                        .map(render_value)
                        .unwrap_or_default(),
                );
            }
        }
    }
    Ok(summary)
}

/// Read and summarize a trace log through the guard.
pub fn summarize(guard: &PathGuard, path: impl AsRef<Path>) -> Result<TraceSummary, TraceError> {
    let path = path.as_ref();
    let resolved = guard.validate(path)?;
    let raw = fs::read_to_string(&resolved).map_err(|e| TraceError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let summary = summarize_str(&raw)?;
    info!(path = %path.display(), actions = summary.action_count(), "trace summarized");
    Ok(summary)
}
