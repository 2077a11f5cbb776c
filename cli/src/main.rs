use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod output;
mod settings;

use commands::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let guard = utils::PathGuard::current_dir()?;
    let config = settings::load(&guard, cli.config.as_deref(), cli.log_level.as_deref())?;

    // stdout carries command output; diagnostics go to stderr.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.observability.logging_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Store(args) => commands::context::store(args, &config),
        Commands::Meta(args) => commands::context::meta(args, &config),
        Commands::Peek(args) => commands::context::peek(args, &config),
        Commands::Search(args) => commands::context::search(args, &config),
        Commands::Chunk(args) => commands::context::chunk(args, &config),
        Commands::Plan(args) => commands::plan::relevance(args, &config),
        Commands::Auto(args) => commands::plan::auto(args, &config),
        Commands::AsyncPlan(args) => commands::delegate::async_plan(args, &config),
        Commands::Spawn(args) => commands::delegate::spawn(args, &config),
        Commands::Emit(args) => commands::delegate::emit(args, &config),
        Commands::Trace(cmd) => commands::trace::run(cmd),
        Commands::Completion(args) => commands::completion::run(args),
    }
}
