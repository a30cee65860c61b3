//! Logging setup for aetl.
//!
//! Query results are written to stdout, so log output goes to a file by
//! default. It goes to stderr when requested, or when the file cannot be opened.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Routes log output to the aetl log file.
///
/// Returns the path of the opened log file. If the file cannot be opened,
/// logging falls back to stderr and `None` is returned, so callers never
/// point users at a file that was not written.
pub fn init_file_logging() -> Option<PathBuf> {
    let log_path = get_log_path();

    match open_log_file(&log_path) {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(file)
                .with_ansi(false)
                .init();
            Some(log_path)
        }
        Err(e) => {
            init_stderr_logging();
            warn!("Could not open log file {}: {}", log_path.display(), e);
            None
        }
    }
}

/// Routes log output to stderr.
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .init();
}

/// Creates (or truncates) the log file at `path` along with its directory.
pub fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    File::create(path)
}

/// Where the log file lives: `<state dir>/aetl/aetl.log`, else the config
/// dir, else the temp dir.
pub fn get_log_path() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::config_dir)
        .map(|dir| dir.join("aetl").join("aetl.log"))
        .unwrap_or_else(|| std::env::temp_dir().join("aetl.log"))
}
