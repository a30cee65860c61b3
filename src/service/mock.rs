//! Mock query service for testing.
//!
//! Provides an in-memory service that replays a scripted sequence of
//! execution states and serves predefined result pages.

use super::{ExecutionHandle, ExecutionState, ExecutionStatus, Page, QueryRequest, QueryService};
use crate::error::{AetlError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A mock query service that returns predefined results.
///
/// Every submitted statement walks through the same state sequence, one
/// state per status call; the last state repeats once the sequence is
/// exhausted. Statements containing a registered needle fail instead, with
/// the registered reason.
pub struct MockQueryService {
    states: Vec<ExecutionState>,
    pages: Vec<Page>,
    failures: Vec<(String, String)>,
    submit_error: Option<String>,
    inner: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    submitted: Vec<QueryRequest>,
    polls: HashMap<ExecutionHandle, usize>,
    status_calls: usize,
    fetch_calls: usize,
}

impl MockQueryService {
    /// Creates a service whose queries succeed on the first poll with no rows.
    pub fn new() -> Self {
        Self {
            states: vec![ExecutionState::Succeeded],
            pages: Vec::new(),
            failures: Vec::new(),
            submit_error: None,
            inner: Mutex::new(MockState::default()),
        }
    }

    /// Sets the state sequence reported for every query.
    pub fn with_states(mut self, states: impl IntoIterator<Item = ExecutionState>) -> Self {
        self.states = states.into_iter().collect();
        self
    }

    /// Sets the result pages served for every successful query.
    pub fn with_pages(mut self, pages: Vec<Page>) -> Self {
        self.pages = pages;
        self
    }

    /// Makes statements containing `needle` end in FAILED with `reason`.
    pub fn fail_when(mut self, needle: impl Into<String>, reason: impl Into<String>) -> Self {
        self.failures.push((needle.into(), reason.into()));
        self
    }

    /// Makes every submission fail with `message`.
    pub fn reject_submissions(mut self, message: impl Into<String>) -> Self {
        self.submit_error = Some(message.into());
        self
    }

    /// Returns every request submitted so far.
    pub fn submitted(&self) -> Vec<QueryRequest> {
        self.state().submitted.clone()
    }

    /// Returns the number of status calls made so far.
    pub fn status_calls(&self) -> usize {
        self.state().status_calls
    }

    /// Returns the number of page fetches made so far.
    pub fn fetch_calls(&self) -> usize {
        self.state().fetch_calls
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn handle_index(handle: &ExecutionHandle) -> Option<usize> {
        handle
            .as_str()
            .strip_prefix("mock-query-")
            .and_then(|n| n.parse::<usize>().ok())
    }
}

impl Default for MockQueryService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueryService for MockQueryService {
    async fn start_query(&self, request: &QueryRequest) -> Result<ExecutionHandle> {
        if let Some(message) = &self.submit_error {
            return Err(AetlError::submission(message.clone()));
        }

        let mut state = self.state();
        state.submitted.push(request.clone());
        Ok(ExecutionHandle::new(format!(
            "mock-query-{}",
            state.submitted.len() - 1
        )))
    }

    async fn query_status(&self, handle: &ExecutionHandle) -> Result<ExecutionStatus> {
        let mut state = self.state();
        state.status_calls += 1;

        let sql = Self::handle_index(handle)
            .and_then(|i| state.submitted.get(i))
            .map(|r| r.sql.clone())
            .ok_or_else(|| AetlError::status(format!("Unknown query execution id {handle}")))?;

        if let Some((_, reason)) = self.failures.iter().find(|(needle, _)| sql.contains(needle)) {
            return Ok(ExecutionStatus::new(ExecutionState::Failed).with_reason(reason.clone()));
        }

        let poll = state.polls.entry(handle.clone()).or_insert(0);
        let index = (*poll).min(self.states.len().saturating_sub(1));
        *poll += 1;

        let current = self
            .states
            .get(index)
            .cloned()
            .unwrap_or(ExecutionState::Succeeded);
        Ok(ExecutionStatus::new(current))
    }

    async fn fetch_page(
        &self,
        _handle: &ExecutionHandle,
        next_token: Option<&str>,
    ) -> Result<Page> {
        self.state().fetch_calls += 1;

        let index = match next_token {
            None => 0,
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| AetlError::fetch(format!("Invalid pagination token {token}")))?,
        };

        if self.pages.is_empty() && index == 0 {
            return Ok(Page::default());
        }

        let mut page = self
            .pages
            .get(index)
            .cloned()
            .ok_or_else(|| AetlError::fetch(format!("No page at index {index}")))?;
        page.next_token = (index + 1 < self.pages.len()).then(|| (index + 1).to_string());
        Ok(page)
    }
}
