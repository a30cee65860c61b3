//! Integration tests for aetl.
//!
//! These run against the in-memory mock service; no AWS access is needed.
//!
//! Run with: `cargo test --test integration_tests`

mod integration;
