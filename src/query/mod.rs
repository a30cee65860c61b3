//! Query execution and result rendering for aetl.
//!
//! This module isolates the submit/poll/fetch cycle and the delimited-text
//! output from the orchestrator.

pub mod executor;
pub mod render;

pub use executor::{result_pages, QueryExecutor, QueryOutcome, DEFAULT_POLL_INTERVAL};
pub use render::DelimitedWriter;
