//! Statement execution against the query service.
//!
//! Submits a statement, polls until it reaches a terminal state, then pages
//! through the results. Only one statement is in flight per executor call.

use std::io::Write;
use std::time::{Duration, Instant};

use futures::stream::{self, Stream, TryStreamExt};
use tracing::{debug, info, trace};

use crate::error::{AetlError, Result};
use crate::query::render::DelimitedWriter;
use crate::service::{
    ExecutionHandle, ExecutionState, OutputLocation, Page, QueryRequest, QueryService,
    ResultTable,
};

/// Delay between two status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Runs statements against a query service.
pub struct QueryExecutor<'a> {
    service: &'a dyn QueryService,
    database: &'a str,
    output_location: &'a OutputLocation,
    poll_interval: Duration,
    timeout: Option<Duration>,
}

impl<'a> QueryExecutor<'a> {
    /// Creates a new executor with the default poll interval and no deadline.
    pub fn new(
        service: &'a dyn QueryService,
        database: &'a str,
        output_location: &'a OutputLocation,
    ) -> Self {
        Self {
            service,
            database,
            output_location,
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: None,
        }
    }

    /// Sets the delay between status checks.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Bounds how long a query may stay non-terminal. `None` polls forever.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Submits, waits for and renders one statement.
    ///
    /// Progress lines, the delimited result table and the timing summary are
    /// written to `out`.
    pub async fn execute<W: Write>(&self, sql: &str, out: &mut W) -> Result<QueryOutcome> {
        writeln!(out, "Query output will be stored in {}", self.output_location)
            .map_err(AetlError::output)?;

        let started = Instant::now();
        let handle = self.submit(sql).await?;

        writeln!(out, "Waiting for the query to complete...").map_err(AetlError::output)?;
        let polls = self.wait_for_completion(&handle).await?;
        let execution_time = started.elapsed();
        writeln!(
            out,
            "Query took {} ms to complete.",
            execution_time.as_millis()
        )
        .map_err(AetlError::output)?;

        let fetch_started = Instant::now();
        let row_count = self.render_results(&handle, &mut *out).await?;
        let fetch_time = fetch_started.elapsed();
        writeln!(
            out,
            "\nRetrieved {} rows in {} ms.",
            row_count,
            fetch_time.as_millis()
        )
        .map_err(AetlError::output)?;

        info!(
            "Query {} finished: {} rows, {:?} execution, {:?} fetch",
            handle, row_count, execution_time, fetch_time
        );

        Ok(QueryOutcome {
            handle,
            polls,
            execution_time,
            fetch_time,
            row_count,
        })
    }

    /// Submits a statement. Submission is attempted once.
    pub async fn submit(&self, sql: &str) -> Result<ExecutionHandle> {
        let request = QueryRequest {
            sql: sql.to_string(),
            database: self.database.to_string(),
            output_location: self.output_location.clone(),
        };
        let handle = self.service.start_query(&request).await?;
        info!("Submitted query {} to database {}", handle, self.database);
        Ok(handle)
    }

    /// Polls until the query reaches a terminal state.
    ///
    /// Returns the number of status checks made when the query succeeded.
    pub async fn wait_for_completion(&self, handle: &ExecutionHandle) -> Result<usize> {
        let started = Instant::now();
        let mut polls = 0;

        loop {
            let status = self.service.query_status(handle).await?;
            polls += 1;

            match status.state {
                ExecutionState::Succeeded => {
                    debug!("Query {} succeeded after {} polls", handle, polls);
                    return Ok(polls);
                }
                ExecutionState::Cancelled => return Err(AetlError::Cancelled),
                ExecutionState::Failed => {
                    return Err(AetlError::failed(status.reason.unwrap_or_default()))
                }
                state => trace!("Query {} is {}", handle, state),
            }

            if let Some(timeout) = self.timeout {
                if started.elapsed() >= timeout {
                    return Err(AetlError::Timeout(timeout));
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Fetches every result page and assembles them into one table.
    pub async fn fetch_results(&self, handle: &ExecutionHandle) -> Result<ResultTable> {
        let pages = result_pages(self.service, handle);
        futures::pin_mut!(pages);

        let mut table = ResultTable::default();
        while let Some(page) = pages.try_next().await? {
            table.push_page(page);
        }
        debug!(
            "Fetched {} rows in {} pages for {}",
            table.row_count(),
            table.page_count,
            handle
        );
        Ok(table)
    }

    /// Streams result pages to `out` as they arrive and returns the number of
    /// data rows written.
    async fn render_results<W: Write>(
        &self,
        handle: &ExecutionHandle,
        out: &mut W,
    ) -> Result<usize> {
        let pages = result_pages(self.service, handle);
        futures::pin_mut!(pages);

        let mut writer = DelimitedWriter::new(out);
        while let Some(page) = pages.try_next().await? {
            writer.write_page(&page).map_err(AetlError::output)?;
        }
        debug!("Rendered {} pages for {}", writer.page_count(), handle);
        Ok(writer.row_count())
    }
}

/// Successful statement execution outcome.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    /// Handle the service assigned to the statement.
    pub handle: ExecutionHandle,
    /// Number of status checks until the query succeeded.
    pub polls: usize,
    /// Submission to terminal state.
    pub execution_time: Duration,
    /// Fetch start to last page rendered.
    pub fetch_time: Duration,
    /// Data rows rendered, header row excluded.
    pub row_count: usize,
}

enum Cursor {
    Start,
    Next(String),
    Done,
}

/// Lazily pages through the results of `handle`, following continuation
/// tokens until the service reports no more pages.
pub fn result_pages<'s>(
    service: &'s dyn QueryService,
    handle: &'s ExecutionHandle,
) -> impl Stream<Item = Result<Page>> + 's {
    stream::try_unfold(Cursor::Start, move |cursor| {
        next_page(service, handle, cursor)
    })
}

async fn next_page(
    service: &dyn QueryService,
    handle: &ExecutionHandle,
    cursor: Cursor,
) -> Result<Option<(Page, Cursor)>> {
    let token = match cursor {
        Cursor::Start => None,
        Cursor::Next(token) => Some(token),
        Cursor::Done => return Ok(None),
    };

    let page = service.fetch_page(handle, token.as_deref()).await?;
    let next = match &page.next_token {
        Some(token) => Cursor::Next(token.clone()),
        None => Cursor::Done,
    };
    Ok(Some((page, next)))
}
