//! Terminal User Interface for pgbrowse.
//!
//! Provides the main TUI application loop using ratatui and crossterm.

pub mod app;
mod editor;
mod events;
pub mod ui;
pub mod widgets;

pub use app::{App, Command, DialogId};
pub use editor::{LineInput, TextArea};
pub use events::{Event, EventHandler};

use crate::app::Controller;
use crate::error::{AppError, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;
use tracing::{debug, info};

/// The main TUI application runner.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_handler: EventHandler,
}

impl Tui {
    /// Creates a new TUI instance, initializing the terminal.
    pub fn new() -> Result<Self> {
        let terminal = Self::setup_terminal()?;
        Ok(Self {
            terminal,
            event_handler: EventHandler::new(),
        })
    }

    /// Sets up the terminal for TUI rendering.
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()
            .map_err(|e| AppError::internal(format!("Failed to enable raw mode: {e}")))?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .map_err(|e| AppError::internal(format!("Failed to enter alternate screen: {e}")))?;

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)
            .map_err(|e| AppError::internal(format!("Failed to create terminal: {e}")))?;

        Ok(terminal)
    }

    /// Restores the terminal to its original state.
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()
            .map_err(|e| AppError::internal(format!("Failed to disable raw mode: {e}")))?;

        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .map_err(|e| AppError::internal(format!("Failed to leave alternate screen: {e}")))?;

        self.terminal
            .show_cursor()
            .map_err(|e| AppError::internal(format!("Failed to show cursor: {e}")))?;

        Ok(())
    }

    /// Runs the main event loop until the user quits.
    ///
    /// Commands are awaited inline, so no input is read while a connection
    /// is in flight.
    pub async fn run(&mut self, controller: &mut Controller, app: &mut App) -> Result<()> {
        // Set up panic hook to restore terminal on panic
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            original_hook(panic_info);
        }));

        let result = self.event_loop(controller, app).await;

        // Restore panic hook
        let _ = panic::take_hook();

        result
    }

    async fn event_loop(&mut self, controller: &mut Controller, app: &mut App) -> Result<()> {
        while app.running {
            draw(&mut self.terminal, app)?;

            let event = self.event_handler.next()?;
            if let Some(command) = app.handle_event(event) {
                app.status = Some(command_status(&command));
                draw(&mut self.terminal, app)?;
                dispatch(controller, app, command).await;
            }
        }
        info!("Event loop finished");
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}

/// Draws one frame, recording the frame size for mouse hit testing.
pub fn draw<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    terminal
        .draw(|frame| {
            app.screen = frame.area();
            ui::render(frame, app);
        })
        .map_err(|e| AppError::internal(format!("Failed to draw: {e}")))?;
    Ok(())
}

/// Returns the status line shown while a command runs.
fn command_status(command: &Command) -> String {
    match command {
        Command::SubmitCredentials(credentials) => {
            format!(" Connecting to {}...", credentials.display_string())
        }
        Command::RefreshDatabases => " Listing databases...".to_string(),
        Command::ExecuteQuery { database, .. } => format!(" Executing on {database}..."),
    }
}

/// Performs a command and applies its outcome to the UI state.
pub async fn dispatch(controller: &mut Controller, app: &mut App, command: Command) {
    debug!("Dispatching {:?}", command);
    match command {
        Command::SubmitCredentials(credentials) => {
            app.set_session_info(&credentials);
            let outcome = controller.submit_credentials(credentials).await;
            app.apply_database_listing(outcome);
        }
        Command::RefreshDatabases => {
            let outcome = controller.list_databases().await;
            app.apply_database_listing(outcome);
        }
        Command::ExecuteQuery {
            dialog,
            database,
            sql,
        } => {
            let outcome = controller.execute_query(&database, &sql).await;
            app.apply_query_outcome(dialog, outcome);
        }
    }
    app.status = None;
}

/// Runs the TUI application until the user quits.
pub async fn run(controller: &mut Controller, app: &mut App) -> Result<()> {
    let mut tui = Tui::new()?;
    tui.run(controller, app).await
}
