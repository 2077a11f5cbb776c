//! # Path Guard
//!
//! The sole gate against path traversal. Every component validates its paths
//! here before opening, creating or listing anything.
//!
//! Containment is whole-directory: a path is accepted when its fully resolved
//! form (symlinks followed) lies under the resolved root, which defaults to
//! the current working directory.

use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use errors::PathError;
use tracing::{debug, warn};

/// Resolved containment root plus the validation logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathGuard {
    root: PathBuf,
}

impl PathGuard {
    /// Guard rooted at the process working directory.
    pub fn current_dir() -> Result<Self, PathError> {
        let cwd = std::env::current_dir().map_err(|e| PathError::WorkingDirectory {
            reason: e.to_string(),
        })?;
        Self::new(cwd)
    }

    /// Guard rooted at `root`, which must exist. The root is canonicalized so a
    /// root reached through a symlink compares against its real location.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, PathError> {
        let root = root.as_ref();
        let resolved = root
            .canonicalize()
            .map_err(|e| PathError::WorkingDirectory {
                reason: format!("{}: {e}", root.display()),
            })?;
        Ok(Self { root: resolved })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate `path` and return its resolved absolute form.
    ///
    /// Relative paths are interpreted against the root. Paths that do not
    /// exist yet are resolved through their deepest existing ancestor.
    pub fn validate(&self, path: impl AsRef<Path>) -> Result<PathBuf, PathError> {
        let path = path.as_ref();

        if path
            .components()
            .any(|component| matches!(component, Component::ParentDir))
        {
            warn!(path = %path.display(), "Rejected path traversal");
            return Err(PathError::Traversal {
                path: path.display().to_string(),
            });
        }

        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };

        let resolved = resolve_lenient(&absolute)?;

        if !resolved.starts_with(&self.root) {
            warn!(
                path = %path.display(),
                resolved = %resolved.display(),
                root = %self.root.display(),
                "Rejected path outside the working directory"
            );
            return Err(PathError::OutsideRoot {
                path: path.display().to_string(),
                root: self.root.display().to_string(),
            });
        }

        debug!(path = %path.display(), resolved = %resolved.display(), "Path validated");
        Ok(resolved)
    }
}

/// Canonicalize the deepest existing ancestor of `path` and re-attach the
/// components that do not exist yet.
fn resolve_lenient(path: &Path) -> Result<PathBuf, PathError> {
    let mut existing = path;
    let mut missing: Vec<&OsStr> = Vec::new();

    loop {
        match existing.canonicalize() {
            Ok(mut resolved) => {
                for part in missing.iter().rev() {
                    resolved.push(part);
                }
                return Ok(resolved);
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                // A dangling symlink would be followed on write.
                if existing.symlink_metadata().is_ok() {
                    return Err(PathError::Unresolvable {
                        path: path.display().to_string(),
                        reason: format!("dangling symlink at {}", existing.display()),
                    });
                }
                match (existing.parent(), existing.file_name()) {
                    (Some(parent), Some(name)) => {
                        missing.push(name);
                        existing = parent;
                    }
                    _ => {
                        return Err(PathError::Unresolvable {
                            path: path.display().to_string(),
                            reason: "no existing ancestor".to_string(),
                        });
                    }
                }
            }
            Err(err) => {
                return Err(PathError::Unresolvable {
                    path: path.display().to_string(),
                    reason: err.to_string(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parent_segment_rejected_before_resolution() {
        let guard = PathGuard::new(std::env::temp_dir()).unwrap();
        let err = guard.validate("../../etc/passwd").unwrap_err();
        assert!(matches!(err, PathError::Traversal { .. }));
        assert!(err.to_string().contains("path traversal"));
    }

    #[test]
    fn test_inner_parent_segment_rejected() {
        let dir = TempDir::new().unwrap();
        let guard = PathGuard::new(dir.path()).unwrap();
        let err = guard.validate("a/../b.txt").unwrap_err();
        assert!(matches!(err, PathError::Traversal { .. }));
    }

    #[test]
    fn test_missing_components_are_reattached() {
        let dir = TempDir::new().unwrap();
        let guard = PathGuard::new(dir.path()).unwrap();
        let resolved = guard.validate("out/subcalls/p1.txt").unwrap();
        assert_eq!(resolved, guard.root().join("out/subcalls/p1.txt"));
    }

    #[test]
    fn test_root_itself_is_accepted() {
        let dir = TempDir::new().unwrap();
        let guard = PathGuard::new(dir.path()).unwrap();
        assert_eq!(guard.validate(".").unwrap(), guard.root());
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = PathGuard::new(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, PathError::WorkingDirectory { .. }));
    }
}
