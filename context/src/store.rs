use crate::context::Context;
use crate::types::{ContextMeta, ReadLimits};
use errors::ContextError;
use std::fs;
use std::path::Path;
use tracing::{info, instrument};
use utils::PathGuard;

/// Content-addressed store rooted behind a [`PathGuard`].
///
/// Storing the same text twice yields the same id and rewrites identical
/// files, so `store` is idempotent.
#[derive(Debug, Clone)]
pub struct ContextStore {
    guard: PathGuard,
    limits: ReadLimits,
}

impl ContextStore {
    pub fn new(guard: PathGuard, limits: ReadLimits) -> Self {
        Self { guard, limits }
    }

    pub fn guard(&self) -> &PathGuard {
        &self.guard
    }

    /// Copy `source` into `dir` as `<id>.txt` plus `<id>.json`.
    ///
    /// Invalid UTF-8 in the source is replaced lossily. `dir` is created if
    /// missing.
    #[instrument(skip(self, source, dir), fields(source = %source.as_ref().display()))]
    pub fn store(
        &self,
        source: impl AsRef<Path>,
        dir: impl AsRef<Path>,
    ) -> Result<ContextMeta, ContextError> {
        let text = self.read_text(source.as_ref())?;
        let dir = dir.as_ref();

        let resolved_dir = self.guard.validate(dir)?;
        fs::create_dir_all(&resolved_dir).map_err(|e| io_error(dir, &e))?;

        let ctx_id = utils::context_id(&text);
        let ctx_path = dir.join(format!("{ctx_id}.txt"));
        let meta_path = dir.join(format!("{ctx_id}.json"));

        let resolved_ctx = self.guard.validate(&ctx_path)?;
        let resolved_meta = self.guard.validate(&meta_path)?;

        let context = Context::new(ctx_path.display().to_string(), text, self.limits);
        let mut meta = context.meta();
        meta.ctx_id = Some(ctx_id.clone());

        fs::write(&resolved_ctx, context.text()).map_err(|e| io_error(&ctx_path, &e))?;
        let json = serde_json::to_string_pretty(&meta).map_err(|e| {
            ContextError::Serialization {
                reason: e.to_string(),
            }
        })?;
        fs::write(&resolved_meta, json).map_err(|e| io_error(&meta_path, &e))?;

        info!(ctx_id = %ctx_id, bytes = meta.bytes, chars = meta.chars, "stored context");
        Ok(meta)
    }

    /// Open a stored context file for bounded reads.
    pub fn open(&self, ctx_path: impl AsRef<Path>) -> Result<Context, ContextError> {
        let path = ctx_path.as_ref();
        let text = self.read_text(path)?;
        Ok(Context::new(path.display().to_string(), text, self.limits))
    }

    fn read_text(&self, path: &Path) -> Result<String, ContextError> {
        let resolved = self.guard.validate(path)?;
        let bytes = fs::read(&resolved).map_err(|e| io_error(path, &e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn io_error(path: &Path, err: &std::io::Error) -> ContextError {
    ContextError::Io {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}
