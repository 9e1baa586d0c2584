//! pgbrowse - browse PostgreSQL databases and run ad-hoc queries.
//!
//! This library exposes the core modules for use in integration tests.

pub mod app;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod session;
pub mod tui;
