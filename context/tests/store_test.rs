//! Store round trips against a scratch directory.

use std::fs;

use context::{ContextMeta, ContextStore, ReadLimits, Span};
use errors::{ContextError, PathError};
use tempfile::TempDir;
use utils::PathGuard;

fn store_in(root: &TempDir) -> ContextStore {
    ContextStore::new(PathGuard::new(root.path()).unwrap(), ReadLimits::default())
}

#[test]
fn test_store_writes_text_and_meta() {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("doc.txt"), "hello world").unwrap();
    let store = store_in(&root);

    let meta = store.store("doc.txt", "ctx").unwrap();

    assert_eq!(meta.ctx_id.as_deref(), Some("b94d27b9934d"));
    assert_eq!(meta.bytes, 11);
    assert_eq!(meta.chars, 11);
    assert_eq!(
        meta.sha256,
        "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
    );
    assert!(meta.ctx_path.ends_with("b94d27b9934d.txt"));

    let txt = root.path().join("ctx").join("b94d27b9934d.txt");
    assert_eq!(fs::read_to_string(txt).unwrap(), "hello world");

    let json = fs::read_to_string(root.path().join("ctx").join("b94d27b9934d.json")).unwrap();
    let on_disk: ContextMeta = serde_json::from_str(&json).unwrap();
    assert_eq!(on_disk, meta);
}

#[test]
fn test_store_is_idempotent() {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("doc.txt"), "same content").unwrap();
    let store = store_in(&root);

    let first = store.store("doc.txt", "ctx").unwrap();
    let second = store.store("doc.txt", "ctx").unwrap();

    assert_eq!(first.ctx_id, second.ctx_id);
    assert_eq!(fs::read_dir(root.path().join("ctx")).unwrap().count(), 2);
}

#[test]
fn test_invalid_utf8_replaced_lossily() {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("bin.txt"), b"ok \xff\xfe end").unwrap();
    let store = store_in(&root);

    let meta = store.store("bin.txt", "ctx").unwrap();
    let ctx = store.open(&meta.ctx_path).unwrap();
    assert!(ctx.text().contains('\u{FFFD}'));
    assert!(ctx.text().starts_with("ok "));
}

#[test]
fn test_open_then_read_primitives() {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("doc.txt"), "alpha beta gamma beta").unwrap();
    let store = store_in(&root);
    let meta = store.store("doc.txt", "ctx").unwrap();

    let ctx = store.open(&meta.ctx_path).unwrap();
    assert_eq!(ctx.peek(6, 4), "beta");

    let hits = ctx.search("beta").unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(ctx.slice(Span::new(hits[1].start, hits[1].end)), "beta");

    let recomputed = ctx.meta();
    assert_eq!(recomputed.sha256, meta.sha256);
    assert_eq!(recomputed.chars, meta.chars);
}

#[test]
fn test_traversal_rejected_before_read() {
    let root = TempDir::new().unwrap();
    let store = store_in(&root);

    let err = store.open("../../etc/passwd").unwrap_err();
    assert!(matches!(err, ContextError::Path(PathError::Traversal { .. })));
    assert!(err.to_string().contains("path traversal"));
}

#[test]
fn test_store_outside_root_rejected() {
    let root = TempDir::new().unwrap();
    let other = TempDir::new().unwrap();
    fs::write(root.path().join("doc.txt"), "text").unwrap();
    let store = store_in(&root);

    let err = store.store("doc.txt", other.path()).unwrap_err();
    assert!(matches!(err, ContextError::Path(PathError::OutsideRoot { .. })));
    assert_eq!(fs::read_dir(other.path()).unwrap().count(), 0);
}

#[test]
fn test_missing_source_is_io_error() {
    let root = TempDir::new().unwrap();
    let store = store_in(&root);

    let err = store.store("absent.txt", "ctx").unwrap_err();
    assert!(matches!(err, ContextError::Io { .. }));
}
