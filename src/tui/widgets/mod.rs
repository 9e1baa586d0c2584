//! TUI widgets for pgbrowse.
//!
//! Contains the screen components and popups.

pub mod context_menu;
pub mod credentials;
pub mod database_list;
pub mod error_dialog;
pub mod header;
pub mod query_dialog;
pub mod table;
