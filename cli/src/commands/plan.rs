use anyhow::Result;
use clap::Args;
use config::Config;
use context::{ContextStore, ReadLimits};
use planner::{AutoPlanOptions, AutoPlanner, RelevancePlanner};
use std::path::PathBuf;
use utils::PathGuard;

use crate::output;

#[derive(Args)]
pub struct PlanArgs {
    #[arg(long, help = "Path of a stored context (.txt)")]
    pub ctx: PathBuf,

    #[arg(long, help = "Goal statement to extract keywords from")]
    pub goal: String,

    #[arg(long, help = "Characters kept on each side of a hit [default: planner.window]")]
    pub window: Option<usize>,
}

#[derive(Args)]
pub struct AutoArgs {
    #[arg(long, help = "Path of a stored context (.txt)")]
    pub ctx: PathBuf,

    #[arg(long, help = "Goal statement to extract keywords from")]
    pub goal: String,

    #[arg(long, default_value = "out", help = "Directory for plan.json and subcalls/")]
    pub outdir: PathBuf,

    #[arg(long, help = "Characters kept on each side of a hit [default: planner.window]")]
    pub window: Option<usize>,

    #[arg(long, help = "Maximum prompt files [default: auto_plan.max_subcalls]")]
    pub max_subcalls: Option<usize>,

    #[arg(long, help = "Maximum characters per slice [default: auto_plan.slice_max]")]
    pub slice_max: Option<usize>,

    #[arg(long, help = "Write prompts without secret redaction")]
    pub no_redact: bool,
}

pub fn relevance(args: PlanArgs, config: &Config) -> Result<()> {
    let guard = PathGuard::current_dir()?;
    let ctx = ContextStore::new(guard, ReadLimits::from(&config.store)).open(&args.ctx)?;
    let planner = RelevancePlanner::new(config.planner.clone());
    let window = args.window.unwrap_or(config.planner.window);

    let plan = planner.plan(&ctx, &args.goal, window);
    output::json(&plan)
}

pub fn auto(args: AutoArgs, config: &Config) -> Result<()> {
    let guard = PathGuard::current_dir()?;
    let ctx = ContextStore::new(guard.clone(), ReadLimits::from(&config.store)).open(&args.ctx)?;

    let mut options = AutoPlanOptions::from_config(
        &config.auto_plan,
        args.window.unwrap_or(config.planner.window),
    );
    if let Some(max_subcalls) = args.max_subcalls {
        options.max_subcalls = max_subcalls;
    }
    if let Some(slice_max) = args.slice_max {
        options.slice_max = slice_max;
    }
    if args.no_redact {
        output::warn("Redaction disabled; prompt files may contain secrets");
        options.redact = false;
    }

    let planner = AutoPlanner::new(guard, RelevancePlanner::new(config.planner.clone()));
    let plan = planner.auto(&ctx, &args.goal, &args.outdir, &options)?;
    output::info(&format!(
        "Wrote {} prompt file(s) under {}",
        plan.subcall_prompts.len(),
        args.outdir.join("subcalls").display()
    ));
    output::json(&plan)
}
