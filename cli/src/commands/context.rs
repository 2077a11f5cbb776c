use anyhow::Result;
use clap::Args;
use config::{Config, StoreConfig};
use context::{ContextStore, ReadLimits};
use std::path::PathBuf;
use utils::PathGuard;

use crate::output;

#[derive(Args)]
pub struct StoreArgs {
    #[arg(long, help = "Text file to store")]
    pub infile: PathBuf,

    #[arg(long, help = "Directory for stored contexts [default: store.ctx_dir]")]
    pub ctx_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct MetaArgs {
    #[arg(long, help = "Path of a stored context (.txt)")]
    pub ctx: PathBuf,
}

#[derive(Args)]
pub struct PeekArgs {
    #[arg(long, help = "Path of a stored context (.txt)")]
    pub ctx: PathBuf,

    #[arg(long, allow_negative_numbers = true, help = "Character offset; clamped into the text")]
    pub offset: i64,

    #[arg(long, allow_negative_numbers = true, help = "Characters to read; clamped to the peek limit")]
    pub length: i64,
}

#[derive(Args)]
pub struct SearchArgs {
    #[arg(long, help = "Path of a stored context (.txt)")]
    pub ctx: PathBuf,

    #[arg(long, help = "Regular expression")]
    pub pattern: String,

    #[arg(long, help = "Search deadline in milliseconds [default: store.search_timeout_ms]")]
    pub timeout_ms: Option<u64>,
}

#[derive(Args)]
pub struct ChunkArgs {
    #[arg(long, help = "Path of a stored context (.txt)")]
    pub ctx: PathBuf,

    #[arg(long, allow_negative_numbers = true, help = "Window size in characters (at least 1)")]
    pub size: i64,

    #[arg(
        long,
        default_value_t = 0,
        allow_negative_numbers = true,
        help = "Characters shared by neighbouring windows"
    )]
    pub overlap: i64,
}

fn open_store(store: &StoreConfig) -> Result<ContextStore> {
    Ok(ContextStore::new(
        PathGuard::current_dir()?,
        ReadLimits::from(store),
    ))
}

/// Negative offsets and sizes mean zero.
fn non_negative(value: i64) -> usize {
    usize::try_from(value).unwrap_or(0)
}

pub fn store(args: StoreArgs, config: &Config) -> Result<()> {
    let store = open_store(&config.store)?;
    let dir = args
        .ctx_dir
        .unwrap_or_else(|| PathBuf::from(&config.store.ctx_dir));
    let meta = store.store(&args.infile, &dir)?;
    output::json(&meta)
}

pub fn meta(args: MetaArgs, config: &Config) -> Result<()> {
    let ctx = open_store(&config.store)?.open(&args.ctx)?;
    output::json(&ctx.meta())
}

pub fn peek(args: PeekArgs, config: &Config) -> Result<()> {
    let ctx = open_store(&config.store)?.open(&args.ctx)?;
    println!("{}", ctx.peek(non_negative(args.offset), non_negative(args.length)));
    Ok(())
}

pub fn search(args: SearchArgs, config: &Config) -> Result<()> {
    let mut store_config = config.store.clone();
    if let Some(timeout_ms) = args.timeout_ms {
        store_config.search_timeout_ms = timeout_ms;
    }
    let ctx = open_store(&store_config)?.open(&args.ctx)?;
    let matches = ctx.search(&args.pattern)?;
    output::json(&matches)
}

pub fn chunk(args: ChunkArgs, config: &Config) -> Result<()> {
    let ctx = open_store(&config.store)?.open(&args.ctx)?;
    let spans = ctx.chunk(non_negative(args.size), non_negative(args.overlap));
    output::json(&spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_negative_clamps() {
        assert_eq!(non_negative(-5), 0);
        assert_eq!(non_negative(0), 0);
        assert_eq!(non_negative(42), 42);
    }
}
