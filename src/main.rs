//! pgbrowse - browse PostgreSQL databases and run ad-hoc queries.

use pgbrowse::app::Controller;
use pgbrowse::cli::Cli;
use pgbrowse::config::Config;
use pgbrowse::db::PostgresConnector;
use pgbrowse::error::Result;
use pgbrowse::logging::{get_log_path, init_file_logging};
use pgbrowse::tui::{self, App};
use ratatui::layout::Rect;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // The terminal belongs to the UI, so logs go to a file
    init_file_logging();

    if let Err(e) = run().await {
        error!("{}: {}", e.category(), e);
        eprintln!("Error: {e}");
        eprintln!("Log file: {}", get_log_path().display());
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;

    // Flags, then the connection string, then the config file
    let defaults = cli.form_defaults(&config)?;
    info!(
        "Connect dialog defaults: {}:{} user={:?}",
        defaults.host, defaults.port, defaults.user
    );

    let mut controller = Controller::new(Box::new(PostgresConnector::new()));
    let mut app = App::new(&config, defaults, Rect::default());

    tui::run(&mut controller, &mut app).await?;

    info!("pgbrowse exiting");
    Ok(())
}
