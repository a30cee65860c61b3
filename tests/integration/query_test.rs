//! Single-query runs against the mock service.

use super::common::{location, trade_pages};
use aetl::error::AetlError;
use aetl::query::QueryExecutor;
use aetl::runner;
use aetl::service::{ExecutionState, MockQueryService};
use pretty_assertions::assert_eq;
use std::time::Duration;

#[tokio::test]
async fn test_run_query_renders_all_pages() {
    let service = MockQueryService::new()
        .with_states([ExecutionState::Queued, ExecutionState::Running, ExecutionState::Succeeded])
        .with_pages(trade_pages());
    let location = location();
    let executor = QueryExecutor::new(&service, "market", &location)
        .with_poll_interval(Duration::from_millis(1));

    let mut out = Vec::new();
    let outcome = runner::run_query(&executor, "select symbol, qty from trade", &mut out)
        .await
        .unwrap();

    assert_eq!(outcome.polls, 3);
    assert_eq!(outcome.row_count, 3);
    assert_eq!(service.fetch_calls(), 2);

    let output = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "Query output will be stored in s3://etl-output/results/");
    assert_eq!(lines[1], "Waiting for the query to complete...");
    assert!(lines[2].starts_with("Query took ") && lines[2].ends_with(" ms to complete."));
    assert_eq!(&lines[3..7], &["symbol,qty", "IBM,100,", "MSFT,50,", "AAPL,75,"]);
    assert_eq!(lines[7], "");
    assert!(lines[8].starts_with("Retrieved 3 rows in "));
}

#[tokio::test]
async fn test_run_query_failure_surfaces_reason() {
    let service = MockQueryService::new()
        .with_pages(trade_pages())
        .fail_when("from trades", "syntax error: table trades does not exist");
    let location = location();
    let executor = QueryExecutor::new(&service, "market", &location);

    let mut out = Vec::new();
    let err = runner::run_query(&executor, "select * from trades", &mut out)
        .await
        .unwrap_err();

    assert!(matches!(err, AetlError::Failed(_)));
    assert!(err.to_string().contains("syntax error"));
    assert_eq!(service.fetch_calls(), 0);
}

#[tokio::test]
async fn test_single_poll_when_already_succeeded() {
    let service = MockQueryService::new();
    let location = location();
    let executor = QueryExecutor::new(&service, "market", &location);

    let handle = executor.submit("select 1").await.unwrap();
    let polls = executor.wait_for_completion(&handle).await.unwrap();

    assert_eq!(polls, 1);
    assert_eq!(service.status_calls(), 1);
}
