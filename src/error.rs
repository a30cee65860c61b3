//! Error types for aetl.
//!
//! Defines the main error enum used throughout the application.

use std::time::Duration;
use thiserror::Error;

/// Main error type for aetl operations.
#[derive(Error, Debug)]
pub enum AetlError {
    /// Missing or invalid flag/config values (no region, bad bucket, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Script file missing or unreadable.
    #[error("Input error: {0}")]
    Input(String),

    /// The service rejected the statement on submission.
    #[error("Submission error: {0}")]
    Submission(String),

    /// Transport errors while polling the execution status.
    #[error("Status error: {0}")]
    Status(String),

    /// The query reached the CANCELLED state.
    #[error("The Athena query was cancelled")]
    Cancelled,

    /// The query reached the FAILED state; carries the service-reported reason.
    #[error("The Athena query failed to run with error message: {0}")]
    Failed(String),

    /// The optional poll deadline elapsed before a terminal state was seen.
    #[error("The Athena query did not finish within {} s", .0.as_secs())]
    Timeout(Duration),

    /// Pagination or transport failure while retrieving results.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Writing rendered output failed.
    #[error("Output error: {0}")]
    Output(String),
}

impl AetlError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an input error with the given message.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Creates a submission error with the given message.
    pub fn submission(msg: impl Into<String>) -> Self {
        Self::Submission(msg.into())
    }

    /// Creates a status error with the given message.
    pub fn status(msg: impl Into<String>) -> Self {
        Self::Status(msg.into())
    }

    /// Creates a failed-query error carrying the service reason.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }

    /// Creates a fetch error with the given message.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Wraps an I/O error raised while writing to the output sink.
    pub fn output(err: std::io::Error) -> Self {
        Self::Output(err.to_string())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "Configuration Error",
            Self::Input(_) => "Input Error",
            Self::Submission(_) => "Submission Error",
            Self::Status(_) => "Status Error",
            Self::Cancelled => "Cancelled",
            Self::Failed(_) => "Query Failed",
            Self::Timeout(_) => "Timeout",
            Self::Fetch(_) => "Fetch Error",
            Self::Output(_) => "Output Error",
        }
    }

    /// Returns true for errors caused by the operator's invocation rather
    /// than by the service.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

/// Result type alias using AetlError.
pub type Result<T> = std::result::Result<T, AetlError>;
