//! Application configuration loading for CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use snapurl_core::validate_concurrency;

/// TOML-backed file configuration for snapurl defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Default output directory for snapshots.
    pub output_dir: Option<PathBuf>,
    /// Default maximum download concurrency.
    pub max_download_concurrency: Option<i64>,
    /// Default per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Default interrupt grace period in seconds.
    pub grace_period_secs: Option<u64>,
}

impl FileConfig {
    /// Validates config values against the same constraints as the CLI.
    pub fn validate(&self) -> Result<()> {
        if let Some(value) = self.max_download_concurrency {
            validate_concurrency(value)
                .with_context(|| "Invalid config value for `max_download_concurrency`")?;
        }

        if let Some(timeout) = self.timeout_secs
            && !(1..=3600).contains(&timeout)
        {
            bail!("Invalid config value for `timeout_secs`: {timeout}. Expected range: 1..=3600");
        }

        if let Some(grace) = self.grace_period_secs
            && grace > 600
        {
            bail!("Invalid config value for `grace_period_secs`: {grace}. Expected range: 0..=600");
        }

        Ok(())
    }
}

/// Result of looking for the default config file.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path, if one could be determined.
    pub path: Option<PathBuf>,
    /// Parsed configuration, if the file exists.
    pub config: Option<FileConfig>,
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/snapurl/config.toml`
/// 2. `$HOME/.config/snapurl/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("snapurl")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("snapurl")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from the default path if present.
pub fn load_default_file_config() -> Result<LoadedConfig> {
    let path = resolve_default_config_path();
    let config = match path.as_deref() {
        Some(path_ref) if path_ref.exists() => Some(load_file_config(path_ref)?),
        _ => None,
    };
    Ok(LoadedConfig { path, config })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let config: FileConfig = toml::from_str(raw)?;
    config.validate()?;
    Ok(config)
}
