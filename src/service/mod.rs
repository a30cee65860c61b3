//! Query service abstraction layer for aetl.
//!
//! Provides a trait-based interface to the remote query-execution service so
//! the driver can run against Athena or an in-memory mock interchangeably.

mod athena;
mod mock;
mod types;

pub use athena::AthenaService;
pub use mock::MockQueryService;
pub use types::{
    Cell, ColumnInfo, ExecutionHandle, ExecutionState, ExecutionStatus, OutputLocation, Page,
    QueryRequest, ResultTable, Row,
};

use crate::error::Result;
use async_trait::async_trait;

/// Creates the Athena client for `region`.
///
/// Credentials are resolved by the AWS SDK default provider chain. The
/// returned client is meant to be created once and shared by every statement
/// of a run.
pub async fn connect(region: &str) -> Box<dyn QueryService> {
    Box::new(AthenaService::connect(region).await)
}

/// Trait defining the remote query-execution service contract.
///
/// All operations are async and return Results with AetlError.
#[async_trait]
pub trait QueryService: Send + Sync {
    /// Submits a statement and returns the handle used to track it.
    async fn start_query(&self, request: &QueryRequest) -> Result<ExecutionHandle>;

    /// Returns the current execution status of a submitted query.
    async fn query_status(&self, handle: &ExecutionHandle) -> Result<ExecutionStatus>;

    /// Fetches one page of results. `next_token` is `None` for the first page
    /// and the previous page's continuation token afterwards.
    async fn fetch_page(&self, handle: &ExecutionHandle, next_token: Option<&str>)
        -> Result<Page>;
}
