//! Prompt-file generation.
//!
//! Turns a relevance plan (or uniform chunks when no keyword matched) into
//! one prompt file per slice under `<out_dir>/subcalls/`, plus the
//! `<out_dir>/plan.json` descriptor referencing them.

use crate::relevance::RelevancePlanner;
use crate::types::{Plan, Policy, PromptFile, Slice};
use config::{AutoPlanConfig, limits};
use context::Context;
use errors::PlanError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};
use utils::{PathGuard, REDACTED, redact_secrets};

/// Keyword attached to slices produced by the chunking fallback.
pub const FALLBACK_KEYWORD: &str = "chunk";

const SUBCALL_DIR: &str = "subcalls";
const PLAN_FILE: &str = "plan.json";

/// Parameters of one auto-plan run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoPlanOptions {
    pub max_subcalls: usize,
    pub slice_max: usize,
    pub window: usize,
    pub redact: bool,
}

impl AutoPlanOptions {
    pub fn from_config(auto: &AutoPlanConfig, window: usize) -> Self {
        Self {
            max_subcalls: auto.max_subcalls,
            slice_max: auto.slice_max,
            window,
            redact: auto.redact,
        }
    }
}

/// Writes bounded, redacted prompt files for a goal.
#[derive(Debug, Clone)]
pub struct AutoPlanner {
    guard: PathGuard,
    relevance: RelevancePlanner,
}

impl AutoPlanner {
    pub fn new(guard: PathGuard, relevance: RelevancePlanner) -> Self {
        Self { guard, relevance }
    }

    /// Plan `goal` against `ctx` and write the prompt files plus `plan.json`.
    ///
    /// With redaction on, keywords come from the redacted goal so no secret
    /// fragment reaches the descriptor. Every output path is validated before
    /// the first write.
    #[instrument(skip(self, ctx, goal, out_dir, options), fields(ctx = %ctx.path()))]
    pub fn auto(
        &self,
        ctx: &Context,
        goal: &str,
        out_dir: impl AsRef<Path>,
        options: &AutoPlanOptions,
    ) -> Result<Plan, PlanError> {
        let out_dir = out_dir.as_ref();
        if options.slice_max == 0 {
            return Err(PlanError::InvalidParameter {
                field: "slice_max".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if options.max_subcalls == 0 {
            return Err(PlanError::InvalidParameter {
                field: "max_subcalls".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        let max_subcalls = if options.max_subcalls > limits::MAX_SUBCALLS {
            warn!(
                requested = options.max_subcalls,
                ceiling = limits::MAX_SUBCALLS,
                "max_subcalls lowered to ceiling"
            );
            limits::MAX_SUBCALLS
        } else {
            options.max_subcalls
        };

        let goal_text = if options.redact {
            redact_secrets(goal)
        } else {
            goal.to_string()
        };

        // The sentinel is not part of the goal's vocabulary.
        let keyword_source = goal_text.replace(REDACTED, " ");
        let relevance = self.relevance.plan(ctx, &keyword_source, options.window);
        let mut slices = if relevance.slices.is_empty() {
            warn!("no keyword hits, falling back to uniform chunks");
            ctx.chunk(options.slice_max, 0)
                .into_iter()
                .map(|span| Slice::new(span.start, span.end, FALLBACK_KEYWORD))
                .collect()
        } else {
            relevance.slices
        };

        if slices.len() > max_subcalls {
            warn!(
                slices = slices.len(),
                max_subcalls, "truncating slices to sub-call limit"
            );
            slices.truncate(max_subcalls);
        }
        for slice in &mut slices {
            if slice.end - slice.start > options.slice_max {
                slice.end = slice.start + options.slice_max;
            }
        }

        let subcall_dir = out_dir.join(SUBCALL_DIR);
        let plan_path = out_dir.join(PLAN_FILE);
        self.guard.validate(out_dir)?;
        let resolved_subcall_dir = self.guard.validate(&subcall_dir)?;
        let resolved_plan = self.guard.validate(&plan_path)?;
        let prompt_paths: Vec<PathBuf> = (1..=slices.len())
            .map(|i| subcall_dir.join(format!("subcall_{i:03}.txt")))
            .collect();
        let resolved_prompts = prompt_paths
            .iter()
            .map(|p| self.guard.validate(p))
            .collect::<Result<Vec<_>, _>>()?;

        fs::create_dir_all(&resolved_subcall_dir).map_err(|e| io_error(&subcall_dir, &e))?;

        let mut subcall_prompts = Vec::with_capacity(slices.len());
        for ((slice, path), resolved) in slices.iter().zip(&prompt_paths).zip(&resolved_prompts) {
            let body = ctx.slice(slice.span());
            let body = if options.redact {
                redact_secrets(body)
            } else {
                body.to_string()
            };
            fs::write(resolved, compose_prompt(&body, &goal_text))
                .map_err(|e| io_error(path, &e))?;
            subcall_prompts.push(PromptFile {
                file: path.display().to_string(),
                slice: slice.clone(),
            });
        }

        let plan = Plan {
            ctx: ctx.path().to_string(),
            goal: goal_text,
            keywords: relevance.keywords,
            slices,
            subcall_prompts,
            policy: Policy {
                max_subcalls,
                slice_max: options.slice_max,
                window: options.window,
                redact: options.redact,
            },
        };
        plan.save(&self.guard, &plan_path)?;
        info!(
            prompts = plan.subcall_prompts.len(),
            plan = %resolved_plan.display(),
            "auto plan written"
        );
        Ok(plan)
    }
}

fn compose_prompt(slice_text: &str, goal: &str) -> String {
    format!("{slice_text}\n\nGoal: {goal}\n")
}

fn io_error(path: &Path, err: &std::io::Error) -> PlanError {
    PlanError::Io {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}
