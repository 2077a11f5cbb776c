//! # Configuration Precedence
//!
//! Merges configuration from multiple sources.
//!
//! # Precedence Order
//! 1. CLI arguments (highest priority)
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values (lowest priority)
//!
//! A layer only overrides the fields its source set, so a source that
//! leaves a field untouched never masks a lower one, and an explicit value
//! equal to the default still wins.

use crate::config::{
    AutoPlanConfig, Config, DelegationConfig, ObservabilityConfig, PlannerConfig, StoreConfig,
};
use crate::layer::{
    AutoPlanLayer, ConfigLayer, DelegationLayer, ObservabilityLayer, PlannerLayer, StoreLayer,
};
use std::fmt::Debug;

/// Merge configuration sources with precedence.
///
/// ```rust,no_run
/// use config::{Config, load_from_env, load_from_file, merge_configs};
/// use std::path::Path;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let from_file = load_from_file(Path::new("rlm.toml"))?;
///     let from_env = load_from_env()?;
///
///     let _config = merge_configs(
///         Config::default(),
///         from_file,
///         "file",
///         from_env,
///         "env",
///         None,
///         "cli",
///     );
///     Ok(())
/// }
/// ```
pub fn merge_configs(
    defaults: Config,
    file_layer: ConfigLayer,
    file_source_name: &str,
    env_layer: ConfigLayer,
    env_source_name: &str,
    cli_layer: Option<ConfigLayer>,
    cli_source_name: &str,
) -> Config {
    let mut config = defaults;

    config = merge_with_logging(config, &file_layer, file_source_name);
    config = merge_with_logging(config, &env_layer, env_source_name);

    if let Some(cli) = cli_layer {
        config = merge_with_logging(config, &cli, cli_source_name);
    }

    config
}

fn merge_with_logging(mut base: Config, layer: &ConfigLayer, source_name: &str) -> Config {
    let mut changes = Vec::new();

    merge_store(&mut base.store, &layer.store, &mut changes);
    merge_planner(&mut base.planner, &layer.planner, &mut changes);
    merge_auto_plan(&mut base.auto_plan, &layer.auto_plan, &mut changes);
    merge_delegation(&mut base.delegation, &layer.delegation, &mut changes);
    merge_observability(&mut base.observability, &layer.observability, &mut changes);

    if !changes.is_empty() {
        tracing::info!("Configuration from {}: {:?}", source_name, changes);
    }

    base
}

fn merge_field<T>(base: &mut T, candidate: &Option<T>, name: &str, changes: &mut Vec<String>)
where
    T: PartialEq + Clone + Debug,
{
    let Some(value) = candidate else {
        return;
    };
    if value != base {
        changes.push(format!("{name} = {value:?}"));
        base.clone_from(value);
    }
}

fn merge_store(base: &mut StoreConfig, over: &StoreLayer, changes: &mut Vec<String>) {
    merge_field(&mut base.ctx_dir, &over.ctx_dir, "store.ctx_dir", changes);
    merge_field(
        &mut base.max_peek_length,
        &over.max_peek_length,
        "store.max_peek_length",
        changes,
    );
    merge_field(
        &mut base.max_search_results,
        &over.max_search_results,
        "store.max_search_results",
        changes,
    );
    merge_field(&mut base.max_chunks, &over.max_chunks, "store.max_chunks", changes);
    merge_field(
        &mut base.search_timeout_ms,
        &over.search_timeout_ms,
        "store.search_timeout_ms",
        changes,
    );
}

fn merge_planner(base: &mut PlannerConfig, over: &PlannerLayer, changes: &mut Vec<String>) {
    merge_field(
        &mut base.max_keywords,
        &over.max_keywords,
        "planner.max_keywords",
        changes,
    );
    merge_field(
        &mut base.max_hits_per_keyword,
        &over.max_hits_per_keyword,
        "planner.max_hits_per_keyword",
        changes,
    );
    merge_field(&mut base.window, &over.window, "planner.window", changes);
}

fn merge_auto_plan(base: &mut AutoPlanConfig, over: &AutoPlanLayer, changes: &mut Vec<String>) {
    merge_field(
        &mut base.max_subcalls,
        &over.max_subcalls,
        "auto_plan.max_subcalls",
        changes,
    );
    merge_field(&mut base.slice_max, &over.slice_max, "auto_plan.slice_max", changes);
    merge_field(&mut base.redact, &over.redact, "auto_plan.redact", changes);
}

fn merge_delegation(
    base: &mut DelegationConfig,
    over: &DelegationLayer,
    changes: &mut Vec<String>,
) {
    merge_field(
        &mut base.batch_size,
        &over.batch_size,
        "delegation.batch_size",
        changes,
    );
    merge_field(
        &mut base.max_subcalls,
        &over.max_subcalls,
        "delegation.max_subcalls",
        changes,
    );
    merge_field(
        &mut base.max_batches,
        &over.max_batches,
        "delegation.max_batches",
        changes,
    );
    merge_field(&mut base.redact, &over.redact, "delegation.redact", changes);
}

fn merge_observability(
    base: &mut ObservabilityConfig,
    over: &ObservabilityLayer,
    changes: &mut Vec<String>,
) {
    merge_field(
        &mut base.logging_level,
        &over.logging_level,
        "observability.logging_level",
        changes,
    );
}
