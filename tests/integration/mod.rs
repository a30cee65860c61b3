//! Integration tests for aetl.
//!
//! Drive the runner and executor end to end against `MockQueryService`.

pub mod common;
pub mod query_test;
pub mod script_test;
