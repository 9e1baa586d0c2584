//! Error types for pgbrowse.
//!
//! Defines the main error enum used throughout the application and the
//! labels under which failures are shown to the user.

use thiserror::Error;

/// Main error type for pgbrowse operations.
///
/// Every variant carries the underlying fault description verbatim; nothing is
/// reworded on the way to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// The server could not be reached or refused the credentials.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The statement was rejected by the server or produced no result set.
    #[error("Statement error: {0}")]
    Statement(String),

    /// Invalid configuration file or command-line arguments.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (terminal setup, unexpected UI state).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a statement error with the given message.
    pub fn statement(msg: impl Into<String>) -> Self {
        Self::Statement(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for log output.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::Statement(_) => "Statement Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }

    /// Returns the fault description without the category prefix.
    pub fn detail(&self) -> &str {
        match self {
            Self::Connection(msg)
            | Self::Statement(msg)
            | Self::Config(msg)
            | Self::Internal(msg) => msg,
        }
    }

    /// Formats the message shown in the error dialog for a failed action.
    pub fn report(&self, action: Action) -> String {
        format!("{}:\n{}", action.failure_label(), self.detail())
    }
}

/// User-triggered actions that can fail.
///
/// The label shown to the user depends on what was attempted, not on where
/// inside the action the fault happened: a connection failure while executing
/// a query is still reported as "Error executing query".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Listing databases after credentials were submitted (or on refresh).
    ListDatabases,
    /// Executing a statement from a query dialog.
    ExecuteQuery,
    /// Resolving which list entry a right-click landed on.
    OpenContextMenu,
}

impl Action {
    /// Returns the fixed label that prefixes the fault description.
    pub fn failure_label(self) -> &'static str {
        match self {
            Self::ListDatabases => "Error connecting to the database",
            Self::ExecuteQuery => "Error executing query",
            Self::OpenContextMenu => "Error handling right-click",
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(_) | sqlx::Error::ColumnDecode { .. } => {
                Self::Statement(err.to_string())
            }
            other => Self::Connection(other.to_string()),
        }
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;
