//! SQL script segmentation.
//!
//! Splits a multi-statement script into individual statements. Statements
//! are separated by a line whose trimmed content equals the delimiter,
//! ignoring case (`go` by default). The final statement does not need a
//! trailing delimiter line.

use crate::error::{AetlError, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::path::Path;

/// Delimiter used when none is configured.
pub const DEFAULT_DELIMITER: &str = "go";

/// Lazy sequence of statements read from a line-oriented source.
///
/// Lines are pulled from the reader only as statements are requested, so a
/// caller can finish executing one statement before the next one is read.
/// The underlying reader is released when the iterator is dropped.
pub struct Statements<R> {
    lines: Lines<R>,
    delimiter: String,
    buffer: String,
    finished: bool,
}

impl<R: BufRead> Statements<R> {
    /// Creates a segmenter using the default `go` delimiter.
    pub fn new(reader: R) -> Self {
        Self::with_delimiter(reader, DEFAULT_DELIMITER)
    }

    /// Creates a segmenter with a custom delimiter.
    pub fn with_delimiter(reader: R, delimiter: impl Into<String>) -> Self {
        Self {
            lines: reader.lines(),
            delimiter: delimiter.into().trim().to_string(),
            buffer: String::new(),
            finished: false,
        }
    }

    fn is_delimiter(&self, line: &str) -> bool {
        line.eq_ignore_ascii_case(&self.delimiter)
    }
}

impl<R: BufRead> Iterator for Statements<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            match self.lines.next() {
                Some(Ok(line)) => {
                    let line = line.trim();
                    if self.is_delimiter(line) {
                        // Emitted even when empty; consumers skip blank statements.
                        return Some(Ok(std::mem::take(&mut self.buffer)));
                    }
                    self.buffer.push_str(line);
                    self.buffer.push('\n');
                }
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(e));
                }
                None => {
                    self.finished = true;
                    if self.buffer.is_empty() {
                        return None;
                    }
                    return Some(Ok(std::mem::take(&mut self.buffer)));
                }
            }
        }
    }
}

/// Segments `reader` into statements separated by `delimiter` lines.
pub fn segment<R: BufRead>(reader: R, delimiter: &str) -> Statements<R> {
    Statements::with_delimiter(reader, delimiter)
}

/// Opens a script file for segmentation.
pub fn open_script(path: &Path, delimiter: &str) -> Result<Statements<BufReader<File>>> {
    let file = File::open(path).map_err(|e| {
        AetlError::input(format!("Cannot open script {}: {e}", path.display()))
    })?;
    Ok(segment(BufReader::new(file), delimiter))
}
