//! Configuration management for aetl.
//!
//! Handles loading defaults from a TOML file and the environment, and holds
//! the immutable `Settings` a run is driven by once CLI flags are merged in.

use crate::error::{AetlError, Result};
use crate::query::DEFAULT_POLL_INTERVAL;
use crate::script::DEFAULT_DELIMITER;
use crate::service::OutputLocation;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure for aetl.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Athena target defaults.
    #[serde(default)]
    pub athena: AthenaConfig,

    /// Polling and script behaviour.
    #[serde(default)]
    pub execution: ExecutionConfig,
}

/// Athena target defaults; CLI flags take precedence.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AthenaConfig {
    /// AWS region (e.g., "us-east-1").
    pub region: Option<String>,

    /// Output bucket, optionally with a prefix (e.g., "my-bucket/output/").
    pub bucket: Option<String>,

    /// Database queries run against.
    pub database: Option<String>,
}

impl AthenaConfig {
    /// Lets AWS_REGION (or AWS_DEFAULT_REGION) override the configured region.
    pub fn apply_env_overrides(&mut self) {
        let env_region = std::env::var("AWS_REGION")
            .or_else(|_| std::env::var("AWS_DEFAULT_REGION"))
            .ok();
        self.override_region(env_region);
    }

    /// Replaces the region with `region` when it is set and non-blank.
    pub fn override_region(&mut self, region: Option<String>) {
        if let Some(region) = region.filter(|r| !r.trim().is_empty()) {
            self.region = Some(region);
        }
    }
}

/// Execution behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Milliseconds between status checks.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Give up on a query after this many seconds. Unset means no deadline.
    pub timeout_secs: Option<u64>,

    /// Keep running a script after a statement fails.
    #[serde(default)]
    pub continue_on_error: bool,

    /// Line that separates statements in a script.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

fn default_delimiter() -> String {
    DEFAULT_DELIMITER.to_string()
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            timeout_secs: None,
            continue_on_error: false,
            delimiter: default_delimiter(),
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("aetl")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| AetlError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            AetlError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}

/// What a run executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// A single statement given inline.
    Query(String),
    /// A script file holding delimiter-separated statements.
    Script(PathBuf),
}

/// Fully resolved, immutable settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub region: String,
    pub database: String,
    pub output_location: OutputLocation,
    pub mode: RunMode,
    pub poll_interval: Duration,
    pub timeout: Option<Duration>,
    pub continue_on_error: bool,
    pub delimiter: String,
}
