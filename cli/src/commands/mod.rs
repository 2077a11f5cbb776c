pub mod completion;
pub mod context;
pub mod delegate;
pub mod plan;
pub mod trace;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "rlm",
    author,
    version,
    about = "RLM controller - bounded context storage and delegation planning",
    long_about = "Stores large documents as content-addressed contexts, reads them through \
                  bounded windows, plans goal-relevant slices and emits safelisted, batched \
                  sub-call manifests.\n\nEvery path must stay inside the working directory. \
                  Command output is JSON on stdout; diagnostics go to stderr."
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "RLM_CONFIG",
        help = "Configuration file (TOML, YAML or JSON)"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Logging level: trace, debug, info, warn or error"
    )]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Store a text file as a content-addressed context")]
    Store(context::StoreArgs),

    #[command(about = "Show metadata for a stored context")]
    Meta(context::MetaArgs),

    #[command(about = "Print a bounded window of a context")]
    Peek(context::PeekArgs),

    #[command(about = "Regex search within a context")]
    Search(context::SearchArgs),

    #[command(about = "Split a context into fixed-size windows")]
    Chunk(context::ChunkArgs),

    #[command(about = "Plan goal-relevant slices of a context")]
    Plan(plan::PlanArgs),

    #[command(about = "Write redacted sub-call prompt files and plan.json")]
    Auto(plan::AutoArgs),

    #[command(name = "async-plan", about = "Partition a plan's prompts into batches")]
    AsyncPlan(delegate::AsyncPlanArgs),

    #[command(about = "Write the spawn manifest for an async plan")]
    Spawn(delegate::SpawnArgs),

    #[command(about = "Render a spawn manifest as batched tool calls")]
    Emit(delegate::EmitArgs),

    #[command(subcommand, about = "Append to or summarize a trace log")]
    Trace(trace::TraceCommand),

    #[command(about = "Generate shell completions")]
    Completion(completion::CompletionArgs),
}
