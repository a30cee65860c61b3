//! Types exchanged with the query service.
//!
//! Defines submission requests, execution handles and states, and the
//! paginated result structures returned by the service.

use crate::error::{AetlError, Result};
use std::fmt;
use url::Url;

/// Destination URI the service writes query output to.
///
/// Holds the `s3://` string exactly as given; it is parsed only to check it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLocation(String);

impl OutputLocation {
    /// Builds an `s3://` location from a bucket name.
    ///
    /// Accepts `bucket`, `bucket/prefix/` or an already qualified
    /// `s3://bucket/prefix/`.
    pub fn from_bucket(bucket: &str) -> Result<Self> {
        let bucket = bucket.trim();
        let uri = if bucket.contains("://") {
            bucket.to_string()
        } else {
            format!("s3://{bucket}")
        };

        let url = Url::parse(&uri)
            .map_err(|e| AetlError::config(format!("Invalid output bucket '{bucket}': {e}")))?;

        if url.scheme() != "s3" || url.host_str().map_or(true, str::is_empty) {
            return Err(AetlError::config(format!(
                "Invalid output bucket '{bucket}'. Expected a bucket name or s3://bucket/prefix"
            )));
        }

        Ok(Self(uri))
    }

    /// Returns the location as a URI string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OutputLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A statement submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub sql: String,
    pub database: String,
    pub output_location: OutputLocation,
}

/// Opaque identifier returned by the service for a submitted query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExecutionHandle(String);

impl ExecutionHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExecutionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle state of a submitted query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionState {
    Queued,
    Running,
    Succeeded,
    Failed,
    Cancelled,
    /// Any state the service reports that this client does not know about.
    Unknown(String),
}

impl ExecutionState {
    /// Returns true if no further transition can occur.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued => f.write_str("QUEUED"),
            Self::Running => f.write_str("RUNNING"),
            Self::Succeeded => f.write_str("SUCCEEDED"),
            Self::Failed => f.write_str("FAILED"),
            Self::Cancelled => f.write_str("CANCELLED"),
            Self::Unknown(s) => write!(f, "UNKNOWN({s})"),
        }
    }
}

/// Current state of a query plus the service's explanation, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionStatus {
    pub state: ExecutionState,
    pub reason: Option<String>,
}

impl ExecutionStatus {
    pub fn new(state: ExecutionState) -> Self {
        Self {
            state,
            reason: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Metadata about a column in a result set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,

    /// Column data type as reported by the service.
    pub data_type: String,
}

impl ColumnInfo {
    /// Creates a new column info with the given name and type.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// A single cell; `None` when the service sent no value.
pub type Cell = Option<String>;

/// A row of cells.
pub type Row = Vec<Cell>;

/// One batch of a paginated result fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub columns: Vec<ColumnInfo>,
    pub rows: Vec<Row>,
    /// Continuation token for the next page, `None` on the last page.
    pub next_token: Option<String>,
}

impl Page {
    pub fn new(columns: Vec<ColumnInfo>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            rows,
            next_token: None,
        }
    }

    pub fn with_next_token(mut self, token: impl Into<String>) -> Self {
        self.next_token = Some(token.into());
        self
    }

    /// Returns the data rows of this page.
    ///
    /// The first page of a result set starts with a header row holding the
    /// column names; it is not data. Later pages carry data rows only.
    pub fn data_rows(&self, first_page: bool) -> &[Row] {
        if first_page {
            self.rows.get(1..).unwrap_or(&[])
        } else {
            &self.rows
        }
    }
}

/// All pages of one query assembled into a single table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    pub columns: Vec<ColumnInfo>,
    pub rows: Vec<Row>,
    pub page_count: usize,
}

impl ResultTable {
    /// Appends a page. Columns are taken from the first page only since
    /// they do not change between pages of the same query.
    pub fn push_page(&mut self, page: Page) {
        let first_page = self.page_count == 0;
        self.rows.extend_from_slice(page.data_rows(first_page));
        if first_page {
            self.columns = page.columns;
        }
        self.page_count += 1;
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|c| Some(c.to_string())).collect()
    }

    #[test]
    fn test_output_location_from_bucket() {
        let location = OutputLocation::from_bucket("my-bucket/output/").unwrap();
        assert_eq!(location.as_str(), "s3://my-bucket/output/");
        assert_eq!(location.to_string(), "s3://my-bucket/output/");
    }

    #[test]
    fn test_output_location_already_qualified() {
        let location = OutputLocation::from_bucket("s3://my-bucket/results/").unwrap();
        assert_eq!(location.as_str(), "s3://my-bucket/results/");
    }

    #[test]
    fn test_output_location_rejects_empty() {
        let err = OutputLocation::from_bucket("  ").unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_output_location_keeps_prefix_verbatim() {
        let location = OutputLocation::from_bucket("my-bucket/daily output/").unwrap();
        assert_eq!(location.as_str(), "s3://my-bucket/daily output/");
    }

    #[test]
    fn test_output_location_rejects_empty_host() {
        assert!(OutputLocation::from_bucket("s3://").is_err());
    }

    #[test]
    fn test_output_location_rejects_other_scheme() {
        let err = OutputLocation::from_bucket("http://bucket").unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_terminal_states() {
        assert!(ExecutionState::Succeeded.is_terminal());
        assert!(ExecutionState::Failed.is_terminal());
        assert!(ExecutionState::Cancelled.is_terminal());
        assert!(!ExecutionState::Queued.is_terminal());
        assert!(!ExecutionState::Running.is_terminal());
        assert!(!ExecutionState::Unknown("SUBMITTED".into()).is_terminal());
    }

    #[test]
    fn test_first_page_skips_header_row() {
        let page = Page::new(
            vec![ColumnInfo::new("id", "integer")],
            vec![row(&["id"]), row(&["1"]), row(&["2"])],
        );
        assert_eq!(page.data_rows(true), &[row(&["1"]), row(&["2"])]);
        assert_eq!(page.data_rows(false).len(), 3);
    }

    #[test]
    fn test_empty_first_page_has_no_data_rows() {
        let page = Page::default();
        assert!(page.data_rows(true).is_empty());
    }

    #[test]
    fn test_result_table_assembles_pages() {
        let columns = vec![ColumnInfo::new("id", "integer"), ColumnInfo::new("name", "varchar")];
        let mut table = ResultTable::default();
        table.push_page(
            Page::new(
                columns.clone(),
                vec![row(&["id", "name"]), row(&["1", "alice"]), row(&["2", "bob"])],
            )
            .with_next_token("t1"),
        );
        table.push_page(Page::new(columns, vec![row(&["3", "carol"])]));

        assert_eq!(table.page_count, 2);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_names().collect::<Vec<_>>(), vec!["id", "name"]);
        assert_eq!(table.rows[2], row(&["3", "carol"]));
    }
}
