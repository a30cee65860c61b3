//! Common test utilities.

use aetl::service::{ColumnInfo, OutputLocation, Page, Row};
use std::io::Write;
use tempfile::NamedTempFile;

pub fn location() -> OutputLocation {
    OutputLocation::from_bucket("etl-output/results/").unwrap()
}

pub fn row(cells: &[&str]) -> Row {
    cells.iter().map(|c| Some(c.to_string())).collect()
}

/// A two-page result set: a header row plus two data rows, then one more
/// data row.
pub fn trade_pages() -> Vec<Page> {
    let columns = vec![
        ColumnInfo::new("symbol", "varchar"),
        ColumnInfo::new("qty", "integer"),
    ];
    vec![
        Page::new(
            columns.clone(),
            vec![row(&["symbol", "qty"]), row(&["IBM", "100"]), row(&["MSFT", "50"])],
        ),
        Page::new(columns, vec![row(&["AAPL", "75"])]),
    ]
}

/// Writes `contents` to a temporary script file.
pub fn script_file(contents: &str) -> NamedTempFile {
    script_bytes(contents.as_bytes())
}

/// Writes raw bytes, which need not be valid UTF-8, to a temporary script file.
pub fn script_bytes(contents: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents).unwrap();
    file.flush().unwrap();
    file
}
