//! Single-query and script runs.
//!
//! A script is read one statement at a time; each statement finishes
//! executing before the next one is read from the file.

use std::io::Write;
use std::path::Path;

use tracing::{debug, error, info};

use crate::error::{AetlError, Result};
use crate::query::{QueryExecutor, QueryOutcome};
use crate::script;

/// Counts for a finished script run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    /// Statements that completed successfully.
    pub executed: usize,
    /// Statements that failed (only non-zero with `continue_on_error`).
    pub failed: usize,
    /// Blank statements that were not submitted.
    pub skipped: usize,
}

/// Runs a single statement.
pub async fn run_query<W: Write>(
    executor: &QueryExecutor<'_>,
    sql: &str,
    out: &mut W,
) -> Result<QueryOutcome> {
    info!("SQL: {}", sql);
    executor.execute(sql, out).await
}

/// Runs every statement of the script at `path`.
///
/// The first failing statement aborts the run unless `continue_on_error` is
/// set, in which case the failure is logged and reported and the next
/// statement runs.
pub async fn run_script<W: Write>(
    executor: &QueryExecutor<'_>,
    path: &Path,
    delimiter: &str,
    continue_on_error: bool,
    out: &mut W,
) -> Result<ScriptSummary> {
    info!("SQL script: {}", path.display());
    let statements = script::open_script(path, delimiter)?;
    let mut summary = ScriptSummary::default();

    for statement in statements {
        let sql = statement.map_err(|e| {
            AetlError::input(format!("Failed to read script {}: {e}", path.display()))
        })?;

        if sql.trim().is_empty() {
            debug!("Skipping empty statement");
            summary.skipped += 1;
            continue;
        }

        writeln!(out, "Executing: {sql}").map_err(AetlError::output)?;
        match executor.execute(&sql, &mut *out).await {
            Ok(_) => summary.executed += 1,
            Err(e) if continue_on_error => {
                error!("Statement failed: {}: {}", e.category(), e);
                writeln!(out, "Error running query: {e}").map_err(AetlError::output)?;
                summary.failed += 1;
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        "Script finished: {} executed, {} failed, {} skipped",
        summary.executed, summary.failed, summary.skipped
    );
    Ok(summary)
}
