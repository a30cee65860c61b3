//! aetl - Runs Athena queries and SQL scripts from the command line.
//!
//! This library exposes the core modules for use in integration tests.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod query;
pub mod runner;
pub mod script;
pub mod service;
