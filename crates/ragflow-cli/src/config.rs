//! Configuration loading utilities for CLI commands

use crate::cli::Cli;
use anyhow::{Context, Result};
use ragflow_core::config::LayeredConfig;
use std::path::PathBuf;

/// File name looked up in the current directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "ragflow.toml";

/// Locate the config file: `--config`, then `RAGFLOW_CONFIG`, then `./ragflow.toml`
///
/// An explicit path is returned even when it does not exist so that loading
/// reports it; the implicit file is only used when present.
pub fn find_config_file(explicit: Option<&PathBuf>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.clone());
    }

    if let Ok(path) = std::env::var("RAGFLOW_CONFIG") {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    local.is_file().then_some(local)
}

/// Load layered configuration: defaults, file, environment, then CLI flags
pub fn load_config(cli: &Cli) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = find_config_file(cli.config.as_ref()) {
        tracing::debug!("Loading configuration from {}", path.display());
        config = config
            .load_from_file(&path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?;
    }

    let mut config = config.load_from_env();
    config.update_from_cli(cli.overrides());
    Ok(config)
}
