//! Script runs against the mock service.

use super::common::{location, script_bytes, script_file, trade_pages};
use aetl::error::AetlError;
use aetl::query::QueryExecutor;
use aetl::runner::{self, ScriptSummary};
use aetl::script::DEFAULT_DELIMITER;
use aetl::service::MockQueryService;
use pretty_assertions::assert_eq;
use std::path::Path;

#[tokio::test]
async fn test_script_runs_statements_in_order() {
    let script = script_file("select 1\nGO\nselect *\nfrom trade\n  go  \nselect 3");
    let service = MockQueryService::new().with_pages(trade_pages());
    let location = location();
    let executor = QueryExecutor::new(&service, "market", &location);

    let mut out = Vec::new();
    let summary = runner::run_script(&executor, script.path(), DEFAULT_DELIMITER, false, &mut out)
        .await
        .unwrap();

    assert_eq!(
        summary,
        ScriptSummary {
            executed: 3,
            failed: 0,
            skipped: 0
        }
    );

    let sql: Vec<String> = service.submitted().into_iter().map(|r| r.sql).collect();
    assert_eq!(sql, vec!["select 1\n", "select *\nfrom trade\n", "select 3\n"]);
    assert!(service.submitted().iter().all(|r| r.database == "market"));

    let output = String::from_utf8(out).unwrap();
    assert_eq!(output.matches("Executing: ").count(), 3);
    assert_eq!(output.matches("Retrieved 3 rows in ").count(), 3);
}

#[tokio::test]
async fn test_script_skips_empty_statements() {
    let script = script_file("go\nselect 1\ngo\n\ngo\nselect 2\ngo\n");
    let service = MockQueryService::new();
    let location = location();
    let executor = QueryExecutor::new(&service, "market", &location);

    let mut out = Vec::new();
    let summary = runner::run_script(&executor, script.path(), DEFAULT_DELIMITER, false, &mut out)
        .await
        .unwrap();

    assert_eq!(summary.executed, 2);
    assert_eq!(summary.skipped, 2);
    assert_eq!(service.submitted().len(), 2);
}

#[tokio::test]
async fn test_script_aborts_on_first_failure() {
    let script = script_file("select 1\ngo\nselect broken\ngo\nselect 3\n");
    let service = MockQueryService::new().fail_when("broken", "COLUMN_NOT_FOUND: broken");
    let location = location();
    let executor = QueryExecutor::new(&service, "market", &location);

    let mut out = Vec::new();
    let err = runner::run_script(&executor, script.path(), DEFAULT_DELIMITER, false, &mut out)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("COLUMN_NOT_FOUND"));
    // The third statement is never submitted.
    assert_eq!(service.submitted().len(), 2);
}

#[tokio::test]
async fn test_script_continues_after_failure_when_enabled() {
    let script = script_file("select 1\ngo\nselect broken\ngo\nselect 3\n");
    let service = MockQueryService::new().fail_when("broken", "COLUMN_NOT_FOUND: broken");
    let location = location();
    let executor = QueryExecutor::new(&service, "market", &location);

    let mut out = Vec::new();
    let summary = runner::run_script(&executor, script.path(), DEFAULT_DELIMITER, true, &mut out)
        .await
        .unwrap();

    assert_eq!(summary.executed, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(service.submitted().len(), 3);

    let output = String::from_utf8(out).unwrap();
    assert!(output.contains("Error running query: The Athena query failed to run"));
}

#[tokio::test]
async fn test_unreadable_line_stops_script_after_earlier_statements() {
    let script = script_bytes(b"select 1\ngo\n\xff\xfe\nselect 2\n");
    let service = MockQueryService::new();
    let location = location();
    let executor = QueryExecutor::new(&service, "market", &location);

    let mut out = Vec::new();
    let err = runner::run_script(&executor, script.path(), DEFAULT_DELIMITER, false, &mut out)
        .await
        .unwrap_err();

    assert!(matches!(err, AetlError::Input(_)));
    // The first statement ran to completion before the bad line was read.
    assert_eq!(service.submitted().len(), 1);
    assert_eq!(service.submitted()[0].sql, "select 1\n");
    let output = String::from_utf8(out).unwrap();
    assert!(output.contains("Executing: select 1"));
    assert!(output.contains("Retrieved 0 rows in "));
}

#[tokio::test]
async fn test_script_with_custom_delimiter() {
    let script = script_file("select 1\n/\nselect 2\n/\n");
    let service = MockQueryService::new();
    let location = location();
    let executor = QueryExecutor::new(&service, "market", &location);

    let mut out = Vec::new();
    let summary = runner::run_script(&executor, script.path(), "/", false, &mut out)
        .await
        .unwrap();

    assert_eq!(summary.executed, 2);
}

#[tokio::test]
async fn test_empty_script_runs_nothing() {
    let script = script_file("");
    let service = MockQueryService::new();
    let location = location();
    let executor = QueryExecutor::new(&service, "market", &location);

    let mut out = Vec::new();
    let summary = runner::run_script(&executor, script.path(), DEFAULT_DELIMITER, false, &mut out)
        .await
        .unwrap();

    assert_eq!(summary, ScriptSummary::default());
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_missing_script_is_input_error() {
    let service = MockQueryService::new();
    let location = location();
    let executor = QueryExecutor::new(&service, "market", &location);

    let mut out = Vec::new();
    let err = runner::run_script(
        &executor,
        Path::new("/no/such/athena.sql"),
        DEFAULT_DELIMITER,
        false,
        &mut out,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AetlError::Input(_)));
    assert!(service.submitted().is_empty());
}
