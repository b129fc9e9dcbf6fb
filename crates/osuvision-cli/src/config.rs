//! CLI configuration: an optional TOML file, then command-line overrides.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use osuvision::Config;
use tracing::info;

/// Load `path` as TOML, or the defaults when no file is given
pub fn load(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}

pub fn apply_overrides(config: &mut Config, signatures: Option<PathBuf>, process: Option<String>) {
    if let Some(signatures) = signatures {
        config.signatures = signatures;
    }
    if let Some(process) = process {
        config.process_name = process;
    }
}
