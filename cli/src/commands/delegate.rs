use anyhow::Result;
use clap::Args;
use config::Config;
use delegation::{
    AsyncPlan, DEFAULT_PREAMBLE, ManifestLimits, ToolCallEmitter, read_preamble,
    write_spawn_manifest,
};
use planner::Plan;
use std::path::PathBuf;
use utils::PathGuard;

use crate::output;

#[derive(Args)]
pub struct AsyncPlanArgs {
    #[arg(long, help = "plan.json written by `rlm auto`")]
    pub plan: PathBuf,

    #[arg(long, default_value = "out/async_plan.json", help = "Where to write the async plan")]
    pub out: PathBuf,

    #[arg(long, help = "Prompts per batch [default: delegation.batch_size]")]
    pub batch_size: Option<usize>,
}

#[derive(Args)]
pub struct SpawnArgs {
    #[arg(long, help = "Async plan written by `rlm async-plan`")]
    pub async_plan: PathBuf,

    #[arg(long, default_value = "out/spawn.jsonl", help = "Where to write the JSONL manifest")]
    pub out: PathBuf,
}

#[derive(Args)]
pub struct EmitArgs {
    #[arg(long, help = "Spawn manifest written by `rlm spawn`")]
    pub manifest: PathBuf,

    #[arg(long, help = "File whose text replaces the default task preamble")]
    pub preamble_file: Option<PathBuf>,

    #[arg(long, help = "Emit tasks without secret redaction")]
    pub no_redact: bool,
}

pub fn async_plan(args: AsyncPlanArgs, config: &Config) -> Result<()> {
    let guard = PathGuard::current_dir()?;
    let plan = Plan::load(&guard, &args.plan)?;
    let batch_size = args.batch_size.unwrap_or(config.delegation.batch_size);

    let async_plan = AsyncPlan::build(&plan, batch_size)?;
    async_plan.save(&guard, &args.out)?;
    output::json(&async_plan)
}

pub fn spawn(args: SpawnArgs, config: &Config) -> Result<()> {
    let guard = PathGuard::current_dir()?;
    let async_plan = AsyncPlan::load(&guard, &args.async_plan)?;
    let limits = ManifestLimits::from(&config.delegation);

    let records = write_spawn_manifest(&guard, &async_plan, &args.out, &limits)?;
    output::info(&format!(
        "Wrote {} spawn record(s) to {}",
        records.len(),
        args.out.display()
    ));
    output::json(&records)
}

pub fn emit(args: EmitArgs, config: &Config) -> Result<()> {
    let guard = PathGuard::current_dir()?;
    let preamble = match &args.preamble_file {
        Some(path) => read_preamble(&guard, path)?,
        None => DEFAULT_PREAMBLE.to_string(),
    };
    let redact = config.delegation.redact && !args.no_redact;
    if !redact {
        output::warn("Redaction disabled; emitted tasks may contain secrets");
    }

    let emitter = ToolCallEmitter::new(guard, ManifestLimits::from(&config.delegation), redact);
    let batches = emitter.emit_file(&args.manifest, preamble.trim_end())?;
    output::json(&batches)
}
