//! Connection lifecycle for pgbrowse.
//!
//! The [`Controller`] owns the session and the connector. Each action opens
//! its own connection, uses it once and closes it before returning.

use crate::db::{Connector, DatabaseClient, QueryResult};
use crate::error::Result;
use crate::session::{Credentials, Session};
use tracing::{debug, info, warn};

/// Runs user actions against the database server.
pub struct Controller {
    connector: Box<dyn Connector>,
    session: Session,
}

impl Controller {
    /// Creates a controller with an empty session.
    pub fn new(connector: Box<dyn Connector>) -> Self {
        Self {
            connector,
            session: Session::new(),
        }
    }

    /// Returns the current session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Stores submitted credentials and lists databases with them.
    ///
    /// The credentials are kept even if listing fails.
    pub async fn submit_credentials(&mut self, credentials: Credentials) -> Result<Vec<String>> {
        info!("Credentials submitted for {}", credentials.display_string());
        self.session.capture(credentials);
        self.list_databases().await
    }

    /// Lists databases using the current session.
    pub async fn list_databases(&self) -> Result<Vec<String>> {
        list_databases(self.connector.as_ref(), &self.session).await
    }

    /// Executes `text` against `database` using the current session.
    pub async fn execute_query(&self, database: &str, text: &str) -> Result<QueryResult> {
        run_query(self.connector.as_ref(), &self.session, database, text).await
    }
}

/// Connects without a target database and reads the catalog.
pub async fn list_databases(connector: &dyn Connector, session: &Session) -> Result<Vec<String>> {
    let credentials = session.credentials()?;
    let mut client = connector.connect(credentials, None).await?;

    let result = client.list_databases().await;
    close(client.as_mut()).await;

    match &result {
        Ok(names) => info!("Listed {} databases", names.len()),
        Err(e) => warn!("{}: {}", e.category(), e),
    }
    result
}

/// Connects to `database` and runs the trimmed statement text.
///
/// The text is not inspected: an empty statement is sent like any other and
/// fails on the server.
pub async fn run_query(
    connector: &dyn Connector,
    session: &Session,
    database: &str,
    text: &str,
) -> Result<QueryResult> {
    let sql = text.trim();
    let credentials = session.credentials()?;
    let mut client = connector.connect(credentials, Some(database)).await?;

    let result = client.execute_query(sql).await;
    close(client.as_mut()).await;

    match &result {
        Ok(r) => info!(
            "Query on {} returned {} rows in {}ms",
            database,
            r.row_count(),
            r.execution_time.as_millis()
        ),
        Err(e) => warn!("{} on {}: {}", e.category(), database, e),
    }
    result
}

async fn close(client: &mut dyn DatabaseClient) {
    if let Err(e) = client.close().await {
        warn!("Error closing connection: {}", e);
    } else {
        debug!("Connection closed");
    }
}
