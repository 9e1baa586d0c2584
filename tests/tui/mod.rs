//! End-to-end interface tests.
//!
//! Drive the TUI state machine with scripted key and mouse events against
//! the in-memory server, and render through ratatui's `TestBackend`.

pub mod common;
pub mod workflow_test;
