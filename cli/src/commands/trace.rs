use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use observability::{EntryKind, TraceLog, summarize};
use serde_json::{Map, Value, json};
use std::path::PathBuf;
use utils::PathGuard;

use crate::output;

#[derive(Subcommand)]
pub enum TraceCommand {
    #[command(about = "Record the start of a run")]
    Init(InitArgs),

    #[command(about = "Record an action")]
    Log(LogArgs),

    #[command(about = "Record the final result")]
    Final(FinalArgs),

    #[command(about = "Summarize a trace log")]
    Summary(SummaryArgs),
}

#[derive(Args)]
pub struct InitArgs {
    #[arg(long, help = "Trace log (JSONL)")]
    pub log: PathBuf,

    #[arg(long, help = "Context being processed")]
    pub ctx: String,

    #[arg(long, help = "Goal of the run")]
    pub goal: String,
}

#[derive(Args)]
pub struct LogArgs {
    #[arg(long, help = "Trace log (JSONL)")]
    pub log: PathBuf,

    #[arg(
        long = "field",
        value_name = "KEY=VALUE",
        value_parser = parse_field,
        help = "Action field; VALUE is parsed as JSON when possible (repeatable)"
    )]
    pub fields: Vec<(String, Value)>,

    #[arg(long, help = "Action fields as a JSON object")]
    pub json: Option<String>,
}

#[derive(Args)]
pub struct FinalArgs {
    #[arg(long, help = "Trace log (JSONL)")]
    pub log: PathBuf,

    #[arg(long, help = "Final result of the run")]
    pub result: String,
}

#[derive(Args)]
pub struct SummaryArgs {
    #[arg(long, help = "Trace log (JSONL)")]
    pub log: PathBuf,

    #[arg(long, value_enum, default_value = "markdown", help = "Output format")]
    pub format: SummaryFormat,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SummaryFormat {
    Markdown,
    Json,
}

pub fn run(cmd: TraceCommand) -> Result<()> {
    let guard = PathGuard::current_dir()?;
    match cmd {
        TraceCommand::Init(args) => {
            let log = TraceLog::open(&guard, &args.log)?;
            log.init(&args.ctx, &args.goal)?;
            appended(&log, EntryKind::Init)
        }
        TraceCommand::Log(args) => {
            let mut fields = match args.json.as_deref() {
                Some(raw) => match serde_json::from_str::<Value>(raw)? {
                    Value::Object(map) => map,
                    _ => anyhow::bail!("--json must be a JSON object"),
                },
                None => Map::new(),
            };
            fields.extend(args.fields);
            if fields.is_empty() {
                anyhow::bail!("An action needs at least one --field or --json");
            }
            let log = TraceLog::open(&guard, &args.log)?;
            log.append(fields)?;
            appended(&log, EntryKind::Action)
        }
        TraceCommand::Final(args) => {
            let log = TraceLog::open(&guard, &args.log)?;
            log.finalize(&args.result)?;
            appended(&log, EntryKind::Final)
        }
        TraceCommand::Summary(args) => {
            let summary = summarize(&guard, &args.log)?;
            match args.format {
                SummaryFormat::Markdown => print!("{}", summary.render()),
                SummaryFormat::Json => output::json(&summary)?,
            }
            Ok(())
        }
    }
}

fn appended(log: &TraceLog, kind: EntryKind) -> Result<()> {
    output::success(&format!("Appended {} entry to {}", kind.as_str(), log.path()));
    output::json(&json!({ "log": log.path(), "type": kind.as_str() }))
}

fn parse_field(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err("field key must not be empty".to_string());
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::from(value));
    Ok((key.to_string(), value))
}
