//! Delimited-text rendering of result pages.

use crate::service::{ColumnInfo, Page, Row};
use std::io::{self, Write};

/// Writes result pages as comma-delimited text.
///
/// The header line joins the column names with commas. Data rows write every
/// cell followed by a comma, the last one included. Missing cells render as
/// empty strings.
pub struct DelimitedWriter<'w, W: Write> {
    out: &'w mut W,
    pages: usize,
    rows: usize,
}

impl<'w, W: Write> DelimitedWriter<'w, W> {
    pub fn new(out: &'w mut W) -> Self {
        Self {
            out,
            pages: 0,
            rows: 0,
        }
    }

    /// Writes one page and returns the number of data rows written.
    ///
    /// The header line is written once, from the first page's columns; the
    /// header row contained in the first page is skipped.
    pub fn write_page(&mut self, page: &Page) -> io::Result<usize> {
        let first_page = self.pages == 0;
        if first_page {
            write_header(&mut *self.out, &page.columns)?;
        }

        let rows = page.data_rows(first_page);
        for row in rows {
            write_row(&mut *self.out, row)?;
        }

        self.pages += 1;
        self.rows += rows.len();
        Ok(rows.len())
    }

    /// Total data rows written so far.
    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn page_count(&self) -> usize {
        self.pages
    }
}

/// Writes the column names joined by commas. Nothing is written when there
/// are no columns.
pub fn write_header<W: Write + ?Sized>(out: &mut W, columns: &[ColumnInfo]) -> io::Result<()> {
    if columns.is_empty() {
        return Ok(());
    }
    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    writeln!(out, "{}", names.join(","))
}

/// Writes one data row, each cell followed by a comma.
pub fn write_row<W: Write + ?Sized>(out: &mut W, row: &Row) -> io::Result<()> {
    for cell in row {
        write!(out, "{},", cell.as_deref().unwrap_or(""))?;
    }
    writeln!(out)
}
