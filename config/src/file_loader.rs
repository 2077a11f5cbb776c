//! # Configuration File Loading
//!
//! Loads configuration from TOML, YAML or JSON files, picking the format
//! from the file extension.

use crate::layer::ConfigLayer;
use std::path::Path;

/// Configuration file loading error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("Config file not readable: {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("Failed to parse TOML in {path}: {reason}")]
    TomlParse { path: String, reason: String },

    #[error("Failed to parse YAML in {path}: {reason}")]
    YamlParse { path: String, reason: String },

    #[error("Failed to parse JSON in {path}: {reason}")]
    JsonParse { path: String, reason: String },

    #[error("Config file has no extension: {0}")]
    NoExtension(String),

    #[error("Unsupported config file format: {0}")]
    UnsupportedFormat(String),
}

fn read(path: &Path) -> Result<String, ConfigFileError> {
    std::fs::read_to_string(path).map_err(|e| ConfigFileError::Unreadable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Load configuration from a TOML file.
///
/// Only the fields present in the file are set on the returned layer.
///
/// ```rust,no_run
/// use config::load_from_toml;
/// use std::path::Path;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let layer = load_from_toml(Path::new("rlm.toml"))?;
///     println!("batch size: {:?}", layer.delegation.batch_size);
///     Ok(())
/// }
/// ```
pub fn load_from_toml(path: &Path) -> Result<ConfigLayer, ConfigFileError> {
    let contents = read(path)?;
    toml::from_str(&contents).map_err(|e| ConfigFileError::TomlParse {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Load configuration from a YAML file.
pub fn load_from_yaml(path: &Path) -> Result<ConfigLayer, ConfigFileError> {
    let contents = read(path)?;
    serde_yaml::from_str(&contents).map_err(|e| ConfigFileError::YamlParse {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Load configuration from a JSON file.
pub fn load_from_json(path: &Path) -> Result<ConfigLayer, ConfigFileError> {
    let contents = read(path)?;
    serde_json::from_str(&contents).map_err(|e| ConfigFileError::JsonParse {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Load configuration from file with format auto-detection.
///
/// ## Supported Formats
/// - `.toml`
/// - `.yaml` / `.yml`
/// - `.json`
pub fn load_from_file(path: &Path) -> Result<ConfigLayer, ConfigFileError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| ConfigFileError::NoExtension(path.display().to_string()))?;

    match extension.to_ascii_lowercase().as_str() {
        "toml" => load_from_toml(path),
        "yaml" | "yml" => load_from_yaml(path),
        "json" => load_from_json(path),
        other => Err(ConfigFileError::UnsupportedFormat(other.to_string())),
    }
}
