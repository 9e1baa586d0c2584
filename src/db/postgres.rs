//! PostgreSQL client implementation.
//!
//! Provides the `PostgresConnector` and `PostgresClient` types that implement
//! the database traits on top of a single sqlx `PgConnection`.

use crate::db::{ColumnInfo, Connector, DatabaseClient, QueryResult, Row, Value, CATALOG_QUERY};
use crate::error::{AppError, Result};
use crate::session::Credentials;
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgRow};
use sqlx::{
    Column as SqlxColumn, ConnectOptions, Connection, Executor, Row as SqlxRow, Statement,
    TypeInfo, ValueRef,
};
use std::time::Instant;
use tracing::{debug, warn};

/// Reported when a statement has no result descriptor.
pub const NO_RESULTS: &str = "no results to fetch";

/// Opens one `PgConnection` per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresConnector;

impl PostgresConnector {
    /// Creates a new connector.
    pub fn new() -> Self {
        Self
    }

    /// Builds connect options from the typed-in credentials.
    ///
    /// Blank fields are left unset so the driver falls back to its defaults,
    /// mirroring how libpq treats empty connection parameters.
    pub fn connect_options(
        credentials: &Credentials,
        database: Option<&str>,
    ) -> Result<PgConnectOptions> {
        let mut options = PgConnectOptions::new();

        if !credentials.host.is_empty() {
            options = options.host(&credentials.host);
        }
        if let Some(port) = credentials.port_number()? {
            options = options.port(port);
        }
        if !credentials.user.is_empty() {
            options = options.username(&credentials.user);
        }
        if !credentials.password.is_empty() {
            options = options.password(&credentials.password);
        }
        if let Some(database) = database {
            options = options.database(database);
        }

        // Statements are logged by us at debug level instead.
        Ok(options.disable_statement_logging())
    }
}

#[async_trait]
impl Connector for PostgresConnector {
    async fn connect(
        &self,
        credentials: &Credentials,
        database: Option<&str>,
    ) -> Result<Box<dyn DatabaseClient>> {
        let options = Self::connect_options(credentials, database)?;

        debug!(
            server = %credentials.display_string(),
            database = database.unwrap_or("<default>"),
            "Opening connection"
        );

        let conn = options
            .connect()
            .await
            .map_err(|e| AppError::connection(e.to_string()))?;

        Ok(Box::new(PostgresClient::new(conn)))
    }
}

/// PostgreSQL client wrapping one open connection.
#[derive(Debug)]
pub struct PostgresClient {
    conn: Option<PgConnection>,
}

impl PostgresClient {
    /// Wraps an already-established connection.
    pub fn new(conn: PgConnection) -> Self {
        Self { conn: Some(conn) }
    }

    fn conn(&mut self) -> Result<&mut PgConnection> {
        self.conn
            .as_mut()
            .ok_or_else(|| AppError::internal("connection is already closed"))
    }
}

#[async_trait]
impl DatabaseClient for PostgresClient {
    async fn list_databases(&mut self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let names: Vec<String> = sqlx::query_scalar(CATALOG_QUERY)
            .fetch_all(conn)
            .await
            .map_err(|e| AppError::connection(e.to_string()))?;

        debug!("Catalog returned {} databases", names.len());
        Ok(names)
    }

    async fn execute_query(&mut self, sql: &str) -> Result<QueryResult> {
        let conn = self.conn()?;
        let start = Instant::now();

        debug!(sql, "Executing statement");

        // Nothing the statement changes is ever committed.
        let mut tx = conn.begin().await.map_err(AppError::from)?;

        // Preparing first gives us the descriptor even when no rows come back.
        let statement = (&mut *tx).prepare(sql).await.map_err(AppError::from)?;

        if statement.columns().is_empty() {
            return Err(AppError::statement(NO_RESULTS));
        }

        let columns: Vec<ColumnInfo> = statement
            .columns()
            .iter()
            .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
            .collect();

        // Without bind arguments the statement goes over the simple query
        // protocol, so cells arrive in the server's text format.
        let fetched: Vec<PgRow> = (&mut *tx).fetch_all(sql).await.map_err(AppError::from)?;

        let rows: Vec<Row> = fetched.iter().map(convert_row).collect();
        let execution_time = start.elapsed();

        tx.rollback().await.map_err(AppError::from)?;

        Ok(QueryResult::with_data(columns, rows).with_execution_time(execution_time))
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close()
                .await
                .map_err(|e| AppError::connection(e.to_string()))?;
        }
        Ok(())
    }
}

/// Converts a PostgreSQL row to our Row type.
fn convert_row(row: &PgRow) -> Row {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| convert_value(row, i, col.type_info().name()))
        .collect()
}

/// Converts a single column value.
///
/// Integers, booleans and bytea get native variants; every other type keeps
/// the server's own text rendering so nothing is lost or reformatted.
fn convert_value(row: &PgRow, index: usize, type_name: &str) -> Value {
    let raw = match row.try_get_raw(index) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(raw) => raw,
        Err(e) => {
            warn!("Failed to read column {}: {}", index, e);
            return Value::Opaque(type_name.to_string());
        }
    };

    let decoded = match type_name {
        "BOOL" => row.try_get::<bool, _>(index).map(Value::Bool),
        "INT2" => row.try_get::<i16, _>(index).map(|v| Value::Int(v.into())),
        "INT4" => row.try_get::<i32, _>(index).map(|v| Value::Int(v.into())),
        "INT8" => row.try_get::<i64, _>(index).map(Value::Int),
        "BYTEA" => row.try_get::<Vec<u8>, _>(index).map(Value::Bytes),
        _ => return raw
            .as_str()
            .map(|text| Value::String(text.to_string()))
            .unwrap_or_else(|e| {
                warn!("Column {} is not valid text: {}", index, e);
                Value::Opaque(type_name.to_string())
            }),
    };

    decoded.unwrap_or_else(|e| {
        warn!("Failed to decode column {} as {}: {}", index, type_name, e);
        Value::Opaque(type_name.to_string())
    })
}
