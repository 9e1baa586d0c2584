//! Command-line argument parsing for pgbrowse.
//!
//! Every flag only pre-fills the connect dialog; nothing connects until the
//! dialog is submitted.

use crate::config::{Config, FormDefaults};
use crate::error::Result;
use crate::session::Credentials;
use clap::Parser;
use std::path::PathBuf;

/// Browse PostgreSQL databases and run ad-hoc queries.
#[derive(Parser, Debug)]
#[command(name = "pgbrowse")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Connection string used to pre-fill the connect dialog
    /// (e.g., postgres://user@host:port)
    #[arg(value_name = "CONNECTION_STRING")]
    pub connection_string: Option<String>,

    /// Pre-filled database host
    #[arg(short = 'H', long, value_name = "HOST")]
    pub host: Option<String>,

    /// Pre-filled database port
    #[arg(short = 'p', long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Pre-filled database user
    #[arg(short = 'U', long, value_name = "USER")]
    pub user: Option<String>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Resolves connect dialog pre-fill values.
    ///
    /// Precedence: explicit flags, then the connection string, then the
    /// config file. Passwords in the connection string are ignored.
    pub fn form_defaults(&self, config: &Config) -> Result<FormDefaults> {
        let mut defaults = config.defaults.clone();

        if let Some(conn_str) = &self.connection_string {
            let parsed = Credentials::from_connection_string(conn_str)?;
            let port = parsed.port_number()?;
            if !parsed.host.is_empty() {
                defaults.host = parsed.host;
            }
            if !parsed.user.is_empty() {
                defaults.user = parsed.user;
            }
            if let Some(port) = port {
                defaults.port = port;
            }
        }

        if let Some(host) = &self.host {
            defaults.host = host.clone();
        }
        if let Some(port) = self.port {
            defaults.port = port;
        }
        if let Some(user) = &self.user {
            defaults.user = user.clone();
        }

        Ok(defaults)
    }
}
