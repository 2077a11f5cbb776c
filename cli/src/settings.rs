//! Configuration assembly for the `rlm` binary.
//!
//! Layers defaults, an optional `--config` file, `RLM_*` environment
//! variables and global CLI flags, in that order of increasing precedence.

use anyhow::{Context as _, Result};
use config::{Config, ConfigLayer, Validate, load_from_env, load_from_file, merge_configs};
use std::path::Path;
use utils::PathGuard;

pub fn load(guard: &PathGuard, file: Option<&Path>, log_level: Option<&str>) -> Result<Config> {
    let from_file = match file {
        Some(path) => {
            let resolved = guard.validate(path)?;
            load_from_file(&resolved)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => ConfigLayer::default(),
    };
    let from_env = load_from_env().context("Invalid RLM_* environment")?;
    let from_cli = log_level.map(ConfigLayer::with_logging_level);

    let config = merge_configs(
        Config::default(),
        from_file,
        "file",
        from_env,
        "env",
        from_cli,
        "cli",
    );
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn guard() -> PathGuard {
        PathGuard::current_dir().unwrap()
    }

    fn rooted(dir: &TempDir) -> PathGuard {
        PathGuard::new(dir.path()).unwrap()
    }

    #[test]
    #[serial]
    fn test_defaults_without_sources() {
        let config = load(&guard(), None, None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    #[serial]
    fn test_file_then_cli_flag() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rlm.toml");
        fs::write(
            &path,
            "[store]\nmax_peek_length = 100\n\n[observability]\nlogging_level = \"info\"\n",
        )
        .unwrap();

        let config = load(&rooted(&dir), Some(&path), Some("debug")).unwrap();
        assert_eq!(config.store.max_peek_length, 100);
        assert_eq!(config.observability.logging_level, "debug");
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rlm.yaml");
        fs::write(&path, "delegation:\n  batch_size: 2\n").unwrap();

        unsafe {
            std::env::set_var("RLM_BATCH_SIZE", "3");
        }
        let config = load(&rooted(&dir), Some(&path), None);
        unsafe {
            std::env::remove_var("RLM_BATCH_SIZE");
        }
        assert_eq!(config.unwrap().delegation.batch_size, 3);
    }

    #[test]
    #[serial]
    fn test_ceiling_violation_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rlm.toml");
        fs::write(&path, "[delegation]\nmax_subcalls = 64\n").unwrap();

        assert!(load(&rooted(&dir), Some(&path), None).is_err());
    }

    #[test]
    #[serial]
    fn test_bad_log_level_rejected() {
        assert!(load(&guard(), None, Some("chatty")).is_err());
    }

    #[test]
    #[serial]
    fn test_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");
        let err = load(&rooted(&dir), Some(&path), None).unwrap_err();
        assert!(err.to_string().contains("Failed to load configuration"));
    }

    #[test]
    #[serial]
    fn test_config_path_traversal_rejected() {
        let dir = TempDir::new().unwrap();
        let err = load(&rooted(&dir), Some(Path::new("../rlm.toml")), None).unwrap_err();
        assert!(err.to_string().contains("Refusing path traversal"));
    }

    #[test]
    #[serial]
    fn test_config_outside_root_rejected() {
        let root = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let path = elsewhere.path().join("rlm.toml");
        fs::write(&path, "[delegation]\nbatch_size = 2\n").unwrap();

        let err = load(&rooted(&root), Some(&path), None).unwrap_err();
        assert!(err.to_string().contains("outside the working directory"));
    }

    #[test]
    #[serial]
    fn test_env_default_value_beats_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rlm.toml");
        fs::write(&path, "[auto_plan]\nredact = false\n").unwrap();

        unsafe {
            std::env::set_var("RLM_REDACT", "true");
        }
        let config = load(&rooted(&dir), Some(&path), None);
        unsafe {
            std::env::remove_var("RLM_REDACT");
        }
        let config = config.unwrap();
        assert!(config.auto_plan.redact);
        assert!(config.delegation.redact);
    }

    #[test]
    #[serial]
    fn test_unparsable_env_is_error() {
        unsafe {
            std::env::set_var("RLM_MAX_SUBCALLS", "lots");
        }
        let result = load(&guard(), None, None);
        unsafe {
            std::env::remove_var("RLM_MAX_SUBCALLS");
        }
        let err = result.unwrap_err();
        assert!(format!("{err:#}").contains("RLM_MAX_SUBCALLS"));
    }
}
