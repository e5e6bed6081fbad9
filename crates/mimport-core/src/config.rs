use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::layout::{DestinationLayout, LayoutRule, DEFAULT_FOLDER};
use crate::retry::RetryPolicy;
use crate::storage::TEMP_SUFFIX;

/// Retry policy parameters (optional `[retry]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per entry (including the first).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Base delay in seconds for linear backoff (attempt N waits N * base).
    #[serde(default = "default_base_delay_secs")]
    pub base_delay_secs: f64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_secs() -> f64 {
    1.5
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_secs: default_base_delay_secs(),
        }
    }
}

/// Importer configuration loaded from `~/.config/mimport/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImporterConfig {
    /// Per-attempt network timeout in seconds: connect timeout and stall limit.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Optional ceiling on a whole transfer in seconds (None = no ceiling).
    #[serde(default)]
    pub transfer_timeout_secs: Option<u64>,
    /// Suffix appended to the destination path for the in-flight temp file.
    #[serde(default = "default_temp_suffix")]
    pub temp_suffix: String,
    /// Folder used when no layout rule matches a file name.
    #[serde(default = "default_folder")]
    pub default_folder: String,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    /// Optional ordered layout rules replacing the built-in table.
    #[serde(default)]
    pub layout: Option<Vec<LayoutRule>>,
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_temp_suffix() -> String {
    TEMP_SUFFIX.to_string()
}

fn default_folder() -> String {
    DEFAULT_FOLDER.to_string()
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            transfer_timeout_secs: None,
            temp_suffix: default_temp_suffix(),
            default_folder: default_folder(),
            retry: None,
            layout: None,
        }
    }
}

impl ImporterConfig {
    /// Reject values that would disable a timeout or cannot be a delay.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be at least 1");
        }
        if self.transfer_timeout_secs == Some(0) {
            bail!("transfer_timeout_secs must be at least 1 when set");
        }
        self.retry_policy()?;
        Ok(())
    }

    pub fn retry_policy(&self) -> Result<RetryPolicy> {
        let retry = self.retry.clone().unwrap_or_default();
        let base_delay = Duration::try_from_secs_f64(retry.base_delay_secs).with_context(|| {
            format!(
                "retry.base_delay_secs = {} is not a usable delay",
                retry.base_delay_secs
            )
        })?;
        Ok(RetryPolicy {
            max_attempts: retry.max_attempts,
            base_delay,
        })
    }

    /// Build the destination layout table once; callers pass it down explicitly.
    pub fn destination_layout(&self) -> DestinationLayout {
        match &self.layout {
            Some(rules) => DestinationLayout::new(rules.clone(), &self.default_folder),
            None => DestinationLayout::builtin().with_default_folder(&self.default_folder),
        }
    }
}

/// Existing `config.toml` under the XDG config dirs, if any.
pub fn find_config_file() -> Result<Option<PathBuf>> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mimport")?;
    Ok(xdg_dirs.find_config_file("config.toml"))
}

/// Load configuration from `path`, or from the XDG location when `path` is None.
///
/// With no explicit path and no file in the XDG dirs, the built-in defaults are
/// used. Nothing is written to disk.
pub fn load(path: Option<&Path>) -> Result<ImporterConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match find_config_file()? {
            Some(p) => p,
            None => {
                tracing::debug!("no config file found, using defaults");
                return Ok(ImporterConfig::default());
            }
        },
    };
    let data = fs::read_to_string(&path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: ImporterConfig = toml::from_str(&data)
        .with_context(|| format!("invalid config {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    tracing::info!("loaded config from {}", path.display());
    Ok(cfg)
}
