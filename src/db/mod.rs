//! Database access for pgbrowse.
//!
//! Two traits separate the UI from the driver: a [`Connector`] opens one
//! connection per action, and the [`DatabaseClient`] it returns runs the
//! catalog query or a user statement on that connection before being closed.

mod mock;
mod postgres;
mod types;

pub use mock::{ExecutedStatement, MockDatabase, MockServer};
pub use postgres::{PostgresClient, PostgresConnector, NO_RESULTS};
pub use types::{ColumnInfo, QueryResult, Row, Value};

use crate::error::Result;
use crate::session::Credentials;
use async_trait::async_trait;

/// Lists every database that is not a template, in server order.
pub const CATALOG_QUERY: &str = "SELECT datname::text FROM pg_database WHERE datistemplate = false";

/// Opens connections to a database server.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Authenticates with the given credentials.
    ///
    /// With `database` set to `None` the server picks its default database
    /// for the user, which is enough to read the catalog.
    async fn connect(
        &self,
        credentials: &Credentials,
        database: Option<&str>,
    ) -> Result<Box<dyn DatabaseClient>>;
}

/// A single open connection.
#[async_trait]
pub trait DatabaseClient: Send {
    /// Runs [`CATALOG_QUERY`] and returns the database names.
    async fn list_databases(&mut self) -> Result<Vec<String>>;

    /// Executes `sql` verbatim as one statement and fetches every row.
    ///
    /// A statement whose descriptor has no columns fails with
    /// "no results to fetch".
    async fn execute_query(&mut self, sql: &str) -> Result<QueryResult>;

    /// Closes the connection.
    async fn close(&mut self) -> Result<()>;
}
