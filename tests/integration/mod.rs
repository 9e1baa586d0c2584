//! Live database tests for pgbrowse.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL environment variable to run them.

pub mod connection_test;
pub mod query_test;

use pgbrowse::session::{Credentials, Session};

/// Helper to get a session from the DATABASE_URL environment variable.
pub fn test_session() -> Option<Session> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let credentials = Credentials::from_connection_string(&url).ok()?;
    let mut session = Session::new();
    session.capture(credentials);
    Some(session)
}

/// Returns the database named in DATABASE_URL, or `postgres`.
pub fn test_database() -> String {
    std::env::var("DATABASE_URL")
        .ok()
        .and_then(|url| url::Url::parse(&url).ok())
        .map(|url| url.path().trim_start_matches('/').to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "postgres".to_string())
}
