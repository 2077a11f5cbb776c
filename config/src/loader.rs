//! # Environment Variable Loader
//!
//! Loads configuration from `RLM_*` environment variables. Unset variables
//! leave their field unset; a set variable that does not parse is an error.

use crate::layer::{
    AutoPlanLayer, ConfigLayer, DelegationLayer, ObservabilityLayer, PlannerLayer, StoreLayer,
};
use std::env::{self, VarError};
use std::str::FromStr;

/// Environment variable error.
#[derive(Debug, thiserror::Error)]
pub enum EnvVarError {
    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        var: String,
        value: String,
        reason: String,
    },

    #[error("{var} is not valid unicode")]
    NotUnicode { var: String },
}

/// Load the configuration layer set by environment variables.
///
/// ## Environment Variables
/// ### Store
/// - `RLM_CTX_DIR`: default context directory (default: "ctx")
/// - `RLM_MAX_PEEK_LENGTH`: peek ceiling in characters (default: 16000)
/// - `RLM_MAX_SEARCH_RESULTS`: search result ceiling (default: 200)
/// - `RLM_MAX_CHUNKS`: chunk count ceiling (default: 5000)
/// - `RLM_SEARCH_TIMEOUT_MS`: search deadline (default: 5000)
///
/// ### Planner
/// - `RLM_MAX_KEYWORDS` (default: 8)
/// - `RLM_MAX_HITS_PER_KEYWORD` (default: 20)
/// - `RLM_WINDOW` (default: 1200)
///
/// ### Auto-planner
/// - `RLM_MAX_SUBCALLS` (default: 32), also caps the delegation manifest
/// - `RLM_SLICE_MAX` (default: 16000)
/// - `RLM_REDACT`: true/false (default: true), applies to prompt files and
///   emitted tasks
///
/// ### Delegation
/// - `RLM_BATCH_SIZE` (default: 4)
/// - `RLM_MAX_BATCHES` (default: 8)
///
/// ### Observability
/// - `RLM_LOG_LEVEL`: trace/debug/info/warn/error (default: "warn")
pub fn load_from_env() -> Result<ConfigLayer, EnvVarError> {
    let max_subcalls = parse_env("RLM_MAX_SUBCALLS")?;
    let redact = parse_env("RLM_REDACT")?;

    Ok(ConfigLayer {
        store: StoreLayer {
            ctx_dir: parse_env("RLM_CTX_DIR")?,
            max_peek_length: parse_env("RLM_MAX_PEEK_LENGTH")?,
            max_search_results: parse_env("RLM_MAX_SEARCH_RESULTS")?,
            max_chunks: parse_env("RLM_MAX_CHUNKS")?,
            search_timeout_ms: parse_env("RLM_SEARCH_TIMEOUT_MS")?,
        },
        planner: PlannerLayer {
            max_keywords: parse_env("RLM_MAX_KEYWORDS")?,
            max_hits_per_keyword: parse_env("RLM_MAX_HITS_PER_KEYWORD")?,
            window: parse_env("RLM_WINDOW")?,
        },
        auto_plan: AutoPlanLayer {
            max_subcalls,
            slice_max: parse_env("RLM_SLICE_MAX")?,
            redact,
        },
        delegation: DelegationLayer {
            batch_size: parse_env("RLM_BATCH_SIZE")?,
            max_subcalls,
            max_batches: parse_env("RLM_MAX_BATCHES")?,
            redact,
        },
        observability: ObservabilityLayer {
            logging_level: parse_env("RLM_LOG_LEVEL")?,
        },
    })
}

fn parse_env<T>(key: &str) -> Result<Option<T>, EnvVarError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| EnvVarError::Invalid {
                var: key.to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            }),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(EnvVarError::NotUnicode {
            var: key.to_string(),
        }),
    }
}
