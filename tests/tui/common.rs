//! Common test utilities for TUI tests.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use pgbrowse::app::Controller;
use pgbrowse::config::{Config, FormDefaults};
use pgbrowse::db::{ColumnInfo, MockServer, QueryResult, Value};
use pgbrowse::tui::{dispatch, draw, App, Event};
use ratatui::backend::TestBackend;
use ratatui::Terminal;

/// Screen size used by every test.
pub const WIDTH: u16 = 100;
pub const HEIGHT: u16 = 30;

/// A server with two regular databases, one template and a few answers.
pub fn scenario_server() -> MockServer {
    MockServer::new("alice", "x")
        .with_database("app")
        .with_template("template_postgis")
        .with_database("metrics")
        .with_result(
            "SELECT 1 AS one",
            QueryResult::with_data(
                vec![ColumnInfo::new("one", "INT4")],
                vec![vec![Value::Int(1)]],
            ),
        )
        .with_database_result(
            "app",
            "SELECT current_user",
            QueryResult::with_data(
                vec![ColumnInfo::new("current_user", "NAME")],
                vec![vec![Value::from("alice")]],
            ),
        )
}

/// The interface wired to a mock server, rendered into a test terminal.
pub struct Harness {
    pub app: App,
    pub controller: Controller,
    pub terminal: Terminal<TestBackend>,
}

impl Harness {
    pub fn new(server: MockServer) -> Self {
        let mut terminal = Terminal::new(TestBackend::new(WIDTH, HEIGHT)).unwrap();
        let mut app = App::new(
            &Config::default(),
            FormDefaults::default(),
            terminal.get_frame().area(),
        );
        draw(&mut terminal, &mut app).unwrap();
        Self {
            app,
            controller: Controller::new(Box::new(server)),
            terminal,
        }
    }

    /// Feeds one event, runs any resulting command, and redraws.
    pub async fn send(&mut self, event: Event) {
        if let Some(command) = self.app.handle_event(event) {
            dispatch(&mut self.controller, &mut self.app, command).await;
        }
        draw(&mut self.terminal, &mut self.app).unwrap();
    }

    pub async fn key(&mut self, code: KeyCode) {
        self.send(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
            .await;
    }

    pub async fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.key(KeyCode::Char(c)).await;
        }
    }

    pub async fn click(&mut self, button: MouseButton, column: u16, row: u16) {
        self.send(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(button),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }))
        .await;
    }

    /// Opens the credentials dialog and submits the given user and password
    /// with the pre-filled host and port.
    pub async fn connect(&mut self, user: &str, password: &str) {
        self.key(KeyCode::Char('c')).await;
        self.key(KeyCode::Tab).await;
        self.type_text(user).await;
        self.key(KeyCode::Tab).await;
        self.type_text(password).await;
        self.key(KeyCode::Enter).await;
    }

    /// Returns the rendered screen, one string per row.
    pub fn screen(&self) -> Vec<String> {
        let buffer = self.terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect()
            })
            .collect()
    }

    /// Returns true if any screen row contains `text`.
    pub fn screen_contains(&self, text: &str) -> bool {
        self.screen().iter().any(|row| row.contains(text))
    }
}
