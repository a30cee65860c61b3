//! Amazon Athena query service.
//!
//! Implements `QueryService` on top of `aws-sdk-athena`.

use crate::error::{AetlError, Result};
use crate::service::{
    ColumnInfo, ExecutionHandle, ExecutionState, ExecutionStatus, Page, QueryRequest,
    QueryService, Row,
};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_athena::config::Region;
use aws_sdk_athena::error::DisplayErrorContext;
use aws_sdk_athena::types::{QueryExecutionContext, QueryExecutionState, ResultConfiguration};
use aws_sdk_athena::Client;
use tracing::debug;

/// Athena client.
#[derive(Debug, Clone)]
pub struct AthenaService {
    client: Client,
}

impl AthenaService {
    /// Loads the AWS configuration for `region` and builds a client.
    pub async fn connect(region: &str) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        debug!("Created Athena client for region {}", region);
        Self::from_client(Client::new(&config))
    }

    /// Wraps an existing SDK client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QueryService for AthenaService {
    async fn start_query(&self, request: &QueryRequest) -> Result<ExecutionHandle> {
        let context = QueryExecutionContext::builder()
            .database(&request.database)
            .build();
        let result_configuration = ResultConfiguration::builder()
            .output_location(request.output_location.as_str())
            .build();

        let output = self
            .client
            .start_query_execution()
            .query_string(&request.sql)
            .query_execution_context(context)
            .result_configuration(result_configuration)
            .send()
            .await
            .map_err(|e| AetlError::submission(DisplayErrorContext(&e).to_string()))?;

        output
            .query_execution_id()
            .map(ExecutionHandle::new)
            .ok_or_else(|| AetlError::submission("Athena returned no query execution id"))
    }

    async fn query_status(&self, handle: &ExecutionHandle) -> Result<ExecutionStatus> {
        let output = self
            .client
            .get_query_execution()
            .query_execution_id(handle.as_str())
            .send()
            .await
            .map_err(|e| AetlError::status(DisplayErrorContext(&e).to_string()))?;

        let Some(status) = output.query_execution().and_then(|q| q.status()) else {
            return Ok(ExecutionStatus::new(ExecutionState::Unknown(String::new())));
        };

        let state = match status.state() {
            Some(QueryExecutionState::Queued) => ExecutionState::Queued,
            Some(QueryExecutionState::Running) => ExecutionState::Running,
            Some(QueryExecutionState::Succeeded) => ExecutionState::Succeeded,
            Some(QueryExecutionState::Failed) => ExecutionState::Failed,
            Some(QueryExecutionState::Cancelled) => ExecutionState::Cancelled,
            Some(other) => ExecutionState::Unknown(other.as_str().to_string()),
            None => ExecutionState::Unknown(String::new()),
        };

        Ok(ExecutionStatus {
            state,
            reason: status.state_change_reason().map(String::from),
        })
    }

    async fn fetch_page(
        &self,
        handle: &ExecutionHandle,
        next_token: Option<&str>,
    ) -> Result<Page> {
        let output = self
            .client
            .get_query_results()
            .query_execution_id(handle.as_str())
            .set_next_token(next_token.map(String::from))
            .send()
            .await
            .map_err(|e| AetlError::fetch(DisplayErrorContext(&e).to_string()))?;

        let mut page = Page {
            next_token: output.next_token().map(String::from),
            ..Page::default()
        };

        if let Some(result_set) = output.result_set() {
            if let Some(metadata) = result_set.result_set_metadata() {
                page.columns = metadata
                    .column_info()
                    .iter()
                    .map(|c| ColumnInfo::new(c.name(), c.r#type()))
                    .collect();
            }
            page.rows = result_set
                .rows()
                .iter()
                .map(|row| {
                    row.data()
                        .iter()
                        .map(|datum| datum.var_char_value().map(String::from))
                        .collect::<Row>()
                })
                .collect();
        }

        debug!(
            "Fetched page of {} rows for {} (more: {})",
            page.rows.len(),
            handle,
            page.next_token.is_some()
        );
        Ok(page)
    }
}
