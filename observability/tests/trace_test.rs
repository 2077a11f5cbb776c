//! Writing a log with `TraceLog` and reading it back with `summarize`.

use std::fs;

use errors::TraceError;
use observability::{TraceLog, summarize};
use serde_json::{Map, Value};
use tempfile::TempDir;
use utils::PathGuard;

#[test]
fn test_written_log_summarizes() {
    let root = TempDir::new().unwrap();
    let guard = PathGuard::new(root.path()).unwrap();
    let log = TraceLog::open(&guard, "trace.jsonl").unwrap();

    log.init("ctx/abc.txt", "count the timeouts").unwrap();
    for batch in 1..=2 {
        let mut fields = Map::new();
        fields.insert("op".to_string(), Value::from("batch_done"));
        fields.insert("batch".to_string(), Value::from(batch));
        log.append(fields).unwrap();
    }
    log.finalize("7 timeouts").unwrap();

    let summary = summarize(&guard, "trace.jsonl").unwrap();
    assert_eq!(summary.ctx.as_deref(), Some("ctx/abc.txt"));
    assert_eq!(summary.action_count(), 2);
    assert_eq!(summary.actions[1]["batch"], 2);
    assert_eq!(summary.result.as_deref(), Some("7 timeouts"));

    let markdown = summary.render();
    assert!(markdown.contains("- Goal: count the timeouts"));
    assert!(markdown.contains("2. op=batch_done, batch=2"));
}

#[test]
fn test_reopening_appends_instead_of_truncating() {
    let root = TempDir::new().unwrap();
    let guard = PathGuard::new(root.path()).unwrap();

    TraceLog::open(&guard, "trace.jsonl").unwrap().init("c", "g").unwrap();
    TraceLog::open(&guard, "trace.jsonl").unwrap().finalize("r").unwrap();

    let raw = fs::read_to_string(root.path().join("trace.jsonl")).unwrap();
    assert_eq!(raw.lines().count(), 2);
}

#[test]
fn test_missing_log_is_io_error() {
    let root = TempDir::new().unwrap();
    let guard = PathGuard::new(root.path()).unwrap();

    let err = summarize(&guard, "absent.jsonl").unwrap_err();
    assert!(matches!(err, TraceError::Io { .. }));
}

#[test]
fn test_corrupted_line_reports_line_number() {
    let root = TempDir::new().unwrap();
    let guard = PathGuard::new(root.path()).unwrap();
    let log = TraceLog::open(&guard, "trace.jsonl").unwrap();
    log.init("c", "g").unwrap();
    let mut raw = fs::read_to_string(root.path().join("trace.jsonl")).unwrap();
    raw.push_str("{\"type\": \"action\"\n");
    fs::write(root.path().join("trace.jsonl"), raw).unwrap();

    let err = summarize(&guard, "trace.jsonl").unwrap_err();
    assert!(matches!(err, TraceError::MalformedEntry { line: 2, .. }));
    assert!(err.to_string().contains("line 2"));
}
