//! # Configuration System
//!
//! Centralized configuration for the RLM controller toolchain.
//!
//! This crate provides:
//! - Configuration structures for every component (store, planner,
//!   auto-planner, delegation, observability)
//! - The hard ceilings the configuration can lower but never raise
//! - Environment variable loading (`RLM_*`)
//! - Configuration file loading (TOML/YAML/JSON)
//! - Partial configuration layers, one per source
//! - Configuration precedence (CLI > env > file > defaults)
//! - Validation through the `validator` crate

pub mod config;
pub mod file_loader;
pub mod layer;
pub mod limits;
pub mod loader;
pub mod precedence;

pub use config::{
    AutoPlanConfig, Config, DelegationConfig, ObservabilityConfig, PlannerConfig, StoreConfig,
};
pub use file_loader::{
    ConfigFileError, load_from_file, load_from_json, load_from_toml, load_from_yaml,
};
pub use layer::{
    AutoPlanLayer, ConfigLayer, DelegationLayer, ObservabilityLayer, PlannerLayer, StoreLayer,
};
pub use loader::{EnvVarError, load_from_env};
pub use precedence::merge_configs;
pub use validator::Validate;
