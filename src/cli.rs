//! Command-line argument parsing for aetl.
//!
//! Uses clap to parse CLI arguments and merges them with the config file
//! into the `Settings` a run is driven by.

use crate::config::{Config, RunMode, Settings};
use crate::error::{AetlError, Result};
use crate::service::OutputLocation;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Runs an Athena query given as an argument, or multiple Athena queries
/// stored in a script file and separated by lines containing the word 'go'.
#[derive(Parser, Debug)]
#[command(name = "aetl")]
#[command(version, about, long_about = None)]
#[command(arg_required_else_help = true)]
#[command(after_help = "Examples:\n  \
    aetl -r us-east-1 -b my-bucket/output/ -d mydatabase -q \"select * from trade\"\n  \
    aetl -r us-east-1 -b my-bucket/output/ -d mydatabase -s ./athena.sql")]
pub struct Cli {
    /// AWS region name
    #[arg(short = 'r', long, value_name = "REGION")]
    pub region: Option<String>,

    /// S3 bucket (and optional prefix) receiving query output
    #[arg(short = 'b', long, value_name = "BUCKET")]
    pub bucket: Option<String>,

    /// Athena database
    #[arg(short = 'd', long, value_name = "DATABASE")]
    pub database: Option<String>,

    /// Query to run
    #[arg(short = 'q', long, value_name = "SQL")]
    pub query: Option<String>,

    /// Script file with statements separated by 'go' lines
    #[arg(short = 's', long, value_name = "PATH")]
    pub script: Option<PathBuf>,

    /// Config file path
    #[arg(long, value_name = "PATH", env = "AETL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Milliseconds between status checks
    #[arg(long, value_name = "MS")]
    pub poll_interval_ms: Option<u64>,

    /// Give up on a query that has not finished after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Keep running a script after a statement fails
    #[arg(long)]
    pub continue_on_error: bool,

    /// Log to stderr instead of the log file
    #[arg(long)]
    pub log_stderr: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Merges the arguments over `config` into run settings.
    ///
    /// Flags take precedence over config values. Missing required values are
    /// reported as configuration errors.
    pub fn to_settings(&self, config: &Config) -> Result<Settings> {
        let region = require(
            self.region.as_deref().or(config.athena.region.as_deref()),
            "Region",
        )?;
        let bucket = require(
            self.bucket.as_deref().or(config.athena.bucket.as_deref()),
            "Output-bucket",
        )?;
        let database = require(
            self.database.as_deref().or(config.athena.database.as_deref()),
            "Database",
        )?;

        let mode = match (&self.query, &self.script) {
            (Some(_), Some(_)) => return Err(AetlError::config("Use either -q or -s.")),
            (Some(query), None) => RunMode::Query(require(Some(query.as_str()), "Query")?),
            (None, Some(script)) => {
                if script.as_os_str().is_empty() {
                    return Err(AetlError::config("Script has not been specified."));
                }
                RunMode::Script(script.clone())
            }
            (None, None) => {
                return Err(AetlError::config(
                    "Either a query (-q) or a script (-s) has to be specified.",
                ))
            }
        };

        let execution = &config.execution;
        if execution.delimiter.trim().is_empty() {
            return Err(AetlError::config("Script delimiter must not be empty."));
        }
        let poll_interval_ms = self.poll_interval_ms.unwrap_or(execution.poll_interval_ms);
        let timeout_secs = self.timeout_secs.or(execution.timeout_secs);

        Ok(Settings {
            region,
            output_location: OutputLocation::from_bucket(&bucket)?,
            database,
            mode,
            poll_interval: Duration::from_millis(poll_interval_ms),
            timeout: timeout_secs.map(Duration::from_secs),
            continue_on_error: self.continue_on_error || execution.continue_on_error,
            delimiter: execution.delimiter.clone(),
        })
    }
}

fn require(value: Option<&str>, name: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.to_string()),
        _ => Err(AetlError::config(format!("{name} has not been specified."))),
    }
}
