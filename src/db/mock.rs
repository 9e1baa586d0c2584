//! In-memory database server for testing.
//!
//! `MockServer` behaves like a small PostgreSQL server: it checks
//! credentials, knows a list of databases (some of them templates), and
//! answers statements from canned results. Every statement that reaches it is
//! recorded together with the database it ran against.

use super::postgres::NO_RESULTS;
use super::{ColumnInfo, Connector, DatabaseClient, QueryResult, Value};
use crate::error::{AppError, Result};
use crate::session::Credentials;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};

/// A database known to the mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockDatabase {
    pub name: String,
    pub is_template: bool,
}

/// A statement that reached the mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutedStatement {
    /// Database the connection was scoped to (`None` for the default one).
    pub database: Option<String>,
    pub sql: String,
}

#[derive(Debug, Clone)]
struct CannedResult {
    database: Option<String>,
    sql: String,
    result: QueryResult,
}

/// A fake server shared between the connector and the test that built it.
#[derive(Debug, Clone)]
pub struct MockServer {
    user: String,
    password: String,
    databases: Vec<MockDatabase>,
    results: Vec<CannedResult>,
    executed: Arc<Mutex<Vec<ExecutedStatement>>>,
    connections: Arc<Mutex<usize>>,
}

impl MockServer {
    /// Creates a server that accepts exactly this user and password.
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
            databases: vec![
                MockDatabase {
                    name: "template0".to_string(),
                    is_template: true,
                },
                MockDatabase {
                    name: "template1".to_string(),
                    is_template: true,
                },
            ],
            results: Vec::new(),
            executed: Arc::new(Mutex::new(Vec::new())),
            connections: Arc::new(Mutex::new(0)),
        }
    }

    /// Adds a regular database.
    pub fn with_database(mut self, name: impl Into<String>) -> Self {
        self.databases.push(MockDatabase {
            name: name.into(),
            is_template: false,
        });
        self
    }

    /// Adds a template database, which the catalog query must skip.
    pub fn with_template(mut self, name: impl Into<String>) -> Self {
        self.databases.push(MockDatabase {
            name: name.into(),
            is_template: true,
        });
        self
    }

    /// Answers `sql` with `result` in every database.
    pub fn with_result(mut self, sql: impl Into<String>, result: QueryResult) -> Self {
        self.results.push(CannedResult {
            database: None,
            sql: sql.into(),
            result,
        });
        self
    }

    /// Answers `sql` with `result` only in `database`.
    pub fn with_database_result(
        mut self,
        database: impl Into<String>,
        sql: impl Into<String>,
        result: QueryResult,
    ) -> Self {
        self.results.push(CannedResult {
            database: Some(database.into()),
            sql: sql.into(),
            result,
        });
        self
    }

    /// Returns every statement received so far, oldest first.
    pub fn executed(&self) -> Vec<ExecutedStatement> {
        self.executed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of connections that are currently open.
    pub fn open_connections(&self) -> usize {
        *self
            .connections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn authenticate(&self, credentials: &Credentials, database: Option<&str>) -> Result<()> {
        credentials.port_number()?;

        if credentials.user != self.user || credentials.password != self.password {
            return Err(AppError::connection(format!(
                "password authentication failed for user \"{}\"",
                credentials.user
            )));
        }

        if let Some(database) = database {
            if !self.databases.iter().any(|db| db.name == database) {
                return Err(AppError::connection(format!(
                    "database \"{database}\" does not exist"
                )));
            }
        }

        Ok(())
    }

    fn answer(&self, database: Option<&str>, sql: &str) -> Result<QueryResult> {
        if sql.is_empty() {
            return Err(AppError::statement(NO_RESULTS));
        }

        if sql.eq_ignore_ascii_case("SELECT current_database()") {
            let name = database.unwrap_or(&self.user).to_string();
            return Ok(QueryResult::with_data(
                vec![ColumnInfo::new("current_database", "NAME")],
                vec![vec![Value::String(name)]],
            ));
        }

        let scoped = self
            .results
            .iter()
            .find(|c| c.sql == sql && c.database.is_some() && c.database.as_deref() == database);
        let global = || {
            self.results
                .iter()
                .find(|c| c.sql == sql && c.database.is_none())
        };

        match scoped.or_else(global) {
            Some(canned) if canned.result.columns.is_empty() => {
                Err(AppError::statement(NO_RESULTS))
            }
            Some(canned) => Ok(canned.result.clone()),
            None => {
                let token = sql.split_whitespace().next().unwrap_or(sql);
                Err(AppError::statement(format!(
                    "syntax error at or near \"{token}\""
                )))
            }
        }
    }
}

#[async_trait]
impl Connector for MockServer {
    async fn connect(
        &self,
        credentials: &Credentials,
        database: Option<&str>,
    ) -> Result<Box<dyn DatabaseClient>> {
        self.authenticate(credentials, database)?;
        *self
            .connections
            .lock()
            .unwrap_or_else(PoisonError::into_inner) += 1;

        Ok(Box::new(MockClient {
            server: self.clone(),
            database: database.map(String::from),
            open: true,
        }))
    }
}

/// A connection to the mock server.
struct MockClient {
    server: MockServer,
    database: Option<String>,
    open: bool,
}

impl MockClient {
    fn ensure_open(&self) -> Result<()> {
        if self.open {
            Ok(())
        } else {
            Err(AppError::internal("connection is already closed"))
        }
    }
}

#[async_trait]
impl DatabaseClient for MockClient {
    async fn list_databases(&mut self) -> Result<Vec<String>> {
        self.ensure_open()?;
        Ok(self
            .server
            .databases
            .iter()
            .filter(|db| !db.is_template)
            .map(|db| db.name.clone())
            .collect())
    }

    async fn execute_query(&mut self, sql: &str) -> Result<QueryResult> {
        self.ensure_open()?;
        self.server
            .executed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ExecutedStatement {
                database: self.database.clone(),
                sql: sql.to_string(),
            });

        self.server.answer(self.database.as_deref(), sql)
    }

    async fn close(&mut self) -> Result<()> {
        if self.open {
            self.open = false;
            let mut open = self
                .server
                .connections
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            *open = open.saturating_sub(1);
        }
        Ok(())
    }
}
