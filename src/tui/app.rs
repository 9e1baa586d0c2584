//! Application state for the TUI.
//!
//! `App` holds everything on screen and turns input events into
//! [`Command`]s. It never talks to the database itself: the runner executes a
//! command and feeds the outcome back through `apply_*`.

use super::editor::{LineInput, TextArea};
use super::events::Event;
use super::ui;
use crate::config::{Config, FormDefaults};
use crate::db::QueryResult;
use crate::error::{Action, AppError, Result};
use crate::session::Credentials;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use tracing::debug;

/// Identifies an open query dialog.
pub type DialogId = u64;

/// Work the runner must perform on behalf of the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Store credentials in the session, then list databases.
    SubmitCredentials(Credentials),
    /// List databases with the current session.
    RefreshDatabases,
    /// Run `sql` on `database` for the given dialog.
    ExecuteQuery {
        dialog: DialogId,
        database: String,
        sql: String,
    },
}

/// One of the four connect dialog fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialField {
    Host,
    User,
    Password,
    Port,
}

impl CredentialField {
    /// All fields in display order.
    pub const ALL: [CredentialField; 4] = [Self::Host, Self::User, Self::Password, Self::Port];

    pub fn label(self) -> &'static str {
        match self {
            Self::Host => "Host:",
            Self::User => "User:",
            Self::Password => "Password:",
            Self::Port => "Port:",
        }
    }

    /// Returns true if the field content is drawn masked.
    pub fn is_masked(self) -> bool {
        self == Self::Password
    }
}

/// State of the connect dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialsForm {
    /// Inputs indexed like [`CredentialField::ALL`].
    pub inputs: [LineInput; 4],
    /// Index of the focused field.
    pub focused: usize,
}

impl CredentialsForm {
    /// Creates the form pre-filled from config/CLI defaults.
    pub fn new(defaults: &FormDefaults) -> Self {
        Self {
            inputs: [
                LineInput::with_text(defaults.host.clone()),
                LineInput::with_text(defaults.user.clone()),
                LineInput::default(),
                LineInput::with_text(defaults.port.to_string()),
            ],
            focused: 0,
        }
    }

    pub fn input(&self, field: CredentialField) -> &LineInput {
        &self.inputs[field as usize]
    }

    pub fn focused_field(&self) -> CredentialField {
        CredentialField::ALL[self.focused]
    }

    fn focused_input(&mut self) -> &mut LineInput {
        &mut self.inputs[self.focused]
    }

    pub fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % self.inputs.len();
    }

    pub fn focus_prev(&mut self) {
        self.focused = (self.focused + self.inputs.len() - 1) % self.inputs.len();
    }

    /// Collects the four values exactly as typed.
    pub fn to_credentials(&self) -> Credentials {
        Credentials::new(
            self.input(CredentialField::Host).text.clone(),
            self.input(CredentialField::User).text.clone(),
            self.input(CredentialField::Password).text.clone(),
            self.input(CredentialField::Port).text.clone(),
        )
    }
}

/// The right-click menu on a list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextMenu {
    /// Database the menu was opened for.
    pub database: String,
    /// Screen position the menu is anchored at.
    pub anchor: Position,
}

impl ContextMenu {
    /// Entries offered by the menu.
    pub const ITEMS: [&'static str; 1] = ["New Query"];
}

/// Which part of a query dialog receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogFocus {
    #[default]
    Editor,
    Results,
}

impl DialogFocus {
    pub fn toggle(self) -> Self {
        match self {
            Self::Editor => Self::Results,
            Self::Results => Self::Editor,
        }
    }
}

/// An open query dialog bound to one database.
#[derive(Debug, Clone)]
pub struct QueryDialog {
    pub id: DialogId,
    /// Database captured when the dialog was opened.
    pub database: String,
    pub editor: TextArea,
    /// Last successful result; kept when a later execution fails.
    pub result: Option<QueryResult>,
    pub focus: DialogFocus,
    /// First visible result row.
    pub row_offset: usize,
    /// First visible result column.
    pub column_offset: usize,
}

impl QueryDialog {
    fn new(id: DialogId, database: String) -> Self {
        Self {
            id,
            database,
            editor: TextArea::new(),
            result: None,
            focus: DialogFocus::default(),
            row_offset: 0,
            column_offset: 0,
        }
    }

    pub fn title(&self) -> String {
        format!("New Query - {}", self.database)
    }

    /// Builds the execute command from this dialog's own database.
    pub fn execute_command(&self) -> Command {
        Command::ExecuteQuery {
            dialog: self.id,
            database: self.database.clone(),
            sql: self.editor.text(),
        }
    }

    /// Replaces the displayed result wholesale.
    fn set_result(&mut self, result: QueryResult) {
        self.result = Some(result);
        self.row_offset = 0;
        self.column_offset = 0;
    }

    fn scroll_rows(&mut self, delta: isize) {
        let max = self
            .result
            .as_ref()
            .map(|r| r.row_count().saturating_sub(1))
            .unwrap_or(0);
        self.row_offset = self.row_offset.saturating_add_signed(delta).min(max);
    }

    fn scroll_columns(&mut self, delta: isize) {
        let max = self
            .result
            .as_ref()
            .map(|r| r.columns.len().saturating_sub(1))
            .unwrap_or(0);
        self.column_offset = self.column_offset.saturating_add_signed(delta).min(max);
    }
}

/// A modal error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDialog {
    pub message: String,
    /// First visible line of the wrapped message.
    pub scroll: usize,
}

impl ErrorDialog {
    pub fn new(action: Action, error: &AppError) -> Self {
        Self {
            message: error.report(action),
            scroll: 0,
        }
    }
}

/// Main application state.
pub struct App {
    /// Whether the application is still running.
    pub running: bool,
    /// Last known terminal size, used for mouse hit testing.
    pub screen: Rect,
    /// Database names in catalog order.
    pub databases: Vec<String>,
    /// Selected list index.
    pub selected: Option<usize>,
    /// First visible list index.
    pub list_offset: usize,
    /// Password-free description of the session, for the header.
    pub session_info: Option<String>,
    pub credentials_form: Option<CredentialsForm>,
    pub context_menu: Option<ContextMenu>,
    /// Open query dialogs in creation order.
    pub dialogs: Vec<QueryDialog>,
    /// Dialog shown on top of the main screen, if any.
    pub active_dialog: Option<DialogId>,
    pub error: Option<ErrorDialog>,
    /// Transient status line text (e.g. while connecting).
    pub status: Option<String>,
    /// Fixed width of every result column.
    pub column_width: u16,
    form_defaults: FormDefaults,
    next_dialog_id: DialogId,
}

impl App {
    /// Creates a new App instance.
    pub fn new(config: &Config, form_defaults: FormDefaults, screen: Rect) -> Self {
        Self {
            running: true,
            screen,
            databases: Vec::new(),
            selected: None,
            list_offset: 0,
            session_info: None,
            credentials_form: None,
            context_menu: None,
            dialogs: Vec::new(),
            active_dialog: None,
            error: None,
            status: None,
            column_width: config.display.effective_column_width(),
            form_defaults,
            next_dialog_id: 1,
        }
    }

    /// Returns the dialog currently shown, if any.
    pub fn active_dialog(&self) -> Option<&QueryDialog> {
        let id = self.active_dialog?;
        self.dialogs.iter().find(|d| d.id == id)
    }

    fn active_dialog_mut(&mut self) -> Option<&mut QueryDialog> {
        let id = self.active_dialog?;
        self.dialogs.iter_mut().find(|d| d.id == id)
    }

    /// Returns the dialog with the given id.
    pub fn dialog(&self, id: DialogId) -> Option<&QueryDialog> {
        self.dialogs.iter().find(|d| d.id == id)
    }

    /// Opens the connect dialog with pre-filled defaults.
    pub fn open_credentials_form(&mut self) {
        self.context_menu = None;
        self.credentials_form = Some(CredentialsForm::new(&self.form_defaults));
    }

    /// Opens a new query dialog for `database` and brings it to the front.
    pub fn open_query_dialog(&mut self, database: String) -> DialogId {
        let id = self.next_dialog_id;
        self.next_dialog_id += 1;
        debug!("Opening query dialog {} for {}", id, database);
        self.dialogs.push(QueryDialog::new(id, database));
        self.active_dialog = Some(id);
        self.context_menu = None;
        id
    }

    /// Closes the dialog on top, returning to the main screen.
    pub fn close_active_dialog(&mut self) {
        if let Some(id) = self.active_dialog.take() {
            self.dialogs.retain(|d| d.id != id);
        }
    }

    /// Cycles main screen → first dialog → … → last dialog → main screen.
    pub fn cycle_dialogs(&mut self) {
        let position = self
            .active_dialog
            .and_then(|id| self.dialogs.iter().position(|d| d.id == id));
        self.active_dialog = match position {
            None => self.dialogs.first().map(|d| d.id),
            Some(i) => self.dialogs.get(i + 1).map(|d| d.id),
        };
    }

    /// Records which credentials the session now holds.
    pub fn set_session_info(&mut self, credentials: &Credentials) {
        self.session_info = Some(credentials.display_string());
    }

    /// Shows an error for a failed action.
    pub fn show_error(&mut self, action: Action, error: &AppError) {
        self.error = Some(ErrorDialog::new(action, error));
    }

    /// Applies the outcome of a listing; failures leave the list as it was.
    pub fn apply_database_listing(&mut self, outcome: Result<Vec<String>>) {
        match outcome {
            Ok(names) => {
                self.selected = if names.is_empty() { None } else { Some(0) };
                self.databases = names;
                self.list_offset = 0;
            }
            Err(e) => self.show_error(Action::ListDatabases, &e),
        }
    }

    /// Applies the outcome of an execution to its dialog; failures leave the
    /// table as it was.
    pub fn apply_query_outcome(&mut self, dialog: DialogId, outcome: Result<QueryResult>) {
        match outcome {
            Ok(result) => {
                if let Some(d) = self.dialogs.iter_mut().find(|d| d.id == dialog) {
                    d.set_result(result);
                }
            }
            Err(e) => self.show_error(Action::ExecuteQuery, &e),
        }
    }

    /// Handles an event and updates application state.
    pub fn handle_event(&mut self, event: Event) -> Option<Command> {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => {
                self.screen = Rect::new(0, 0, width, height);
                self.ensure_selection_visible();
                None
            }
            Event::Tick => None,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
            self.running = false;
            return None;
        }

        if self.error.is_some() {
            match key.code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => self.error = None,
                KeyCode::Up | KeyCode::Char('k') => self.scroll_error(-1),
                KeyCode::Down | KeyCode::Char('j') => self.scroll_error(1),
                KeyCode::PageUp => self.scroll_error(-10),
                KeyCode::PageDown => self.scroll_error(10),
                _ => {}
            }
            return None;
        }

        if self.credentials_form.is_some() {
            return self.handle_form_key(key);
        }

        if self.context_menu.is_some() {
            match key.code {
                KeyCode::Enter => return self.activate_context_menu(),
                KeyCode::Esc => self.context_menu = None,
                _ => {}
            }
            return None;
        }

        if key.code == KeyCode::F(6) {
            self.cycle_dialogs();
            return None;
        }

        if self.active_dialog.is_some() {
            return self.handle_dialog_key(key);
        }

        self.handle_main_key(key)
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<Command> {
        let form = self.credentials_form.as_mut()?;
        match key.code {
            KeyCode::Esc => self.credentials_form = None,
            KeyCode::Enter => return self.submit_credentials_form(),
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
            KeyCode::Char(c) => form.focused_input().insert(c),
            KeyCode::Backspace => form.focused_input().backspace(),
            KeyCode::Delete => form.focused_input().delete(),
            KeyCode::Left => form.focused_input().move_left(),
            KeyCode::Right => form.focused_input().move_right(),
            KeyCode::Home => form.focused_input().move_home(),
            KeyCode::End => form.focused_input().move_end(),
            _ => {}
        }
        None
    }

    fn submit_credentials_form(&mut self) -> Option<Command> {
        let form = self.credentials_form.take()?;
        Some(Command::SubmitCredentials(form.to_credentials()))
    }

    fn handle_dialog_key(&mut self, key: KeyEvent) -> Option<Command> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if key.code == KeyCode::Esc {
            self.close_active_dialog();
            return None;
        }

        let dialog = self.active_dialog_mut()?;
        if key.code == KeyCode::F(5) || (ctrl && key.code == KeyCode::Char('e')) {
            return Some(dialog.execute_command());
        }

        match (dialog.focus, key.code) {
            (_, KeyCode::Tab) => dialog.focus = dialog.focus.toggle(),
            (DialogFocus::Editor, code) => match code {
                KeyCode::Char(c) => dialog.editor.insert(c),
                KeyCode::Enter => dialog.editor.newline(),
                KeyCode::Backspace => dialog.editor.backspace(),
                KeyCode::Delete => dialog.editor.delete(),
                KeyCode::Left => dialog.editor.move_left(),
                KeyCode::Right => dialog.editor.move_right(),
                KeyCode::Up => dialog.editor.move_up(),
                KeyCode::Down => dialog.editor.move_down(),
                KeyCode::Home => dialog.editor.move_home(),
                KeyCode::End => dialog.editor.move_end(),
                _ => {}
            },
            (DialogFocus::Results, code) => match code {
                KeyCode::Up | KeyCode::Char('k') => dialog.scroll_rows(-1),
                KeyCode::Down | KeyCode::Char('j') => dialog.scroll_rows(1),
                KeyCode::PageUp => dialog.scroll_rows(-10),
                KeyCode::PageDown => dialog.scroll_rows(10),
                KeyCode::Left | KeyCode::Char('h') => dialog.scroll_columns(-1),
                KeyCode::Right | KeyCode::Char('l') => dialog.scroll_columns(1),
                _ => {}
            },
        }
        None
    }

    fn handle_main_key(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('c') => self.open_credentials_form(),
            KeyCode::Char('r') => return Some(Command::RefreshDatabases),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-10),
            KeyCode::PageDown => self.move_selection(10),
            KeyCode::Home => self.select(0),
            KeyCode::End => self.select(self.databases.len().saturating_sub(1)),
            KeyCode::Enter | KeyCode::Char('m') | KeyCode::Menu => {
                if let Some(index) = self.selected {
                    let layout = ui::main_layout(self.screen);
                    let row = index.saturating_sub(self.list_offset) as u16;
                    let anchor = Position::new(
                        layout.list_inner.x + 2,
                        layout.list_inner.y.saturating_add(row).saturating_add(1),
                    );
                    self.open_context_menu(index, anchor);
                }
            }
            _ => {}
        }
        None
    }

    fn scroll_error(&mut self, delta: isize) {
        let screen = self.screen;
        if let Some(error) = self.error.as_mut() {
            let max = ui::error_layout(&error.message, screen).max_scroll();
            error.scroll = error.scroll.saturating_add_signed(delta).min(max);
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Option<Command> {
        let position = Position::new(mouse.column, mouse.row);

        if let Some(error) = &self.error {
            let layout = ui::error_layout(&error.message, self.screen);
            match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) if layout.ok_button.contains(position) => {
                    self.error = None
                }
                MouseEventKind::ScrollDown => self.scroll_error(1),
                MouseEventKind::ScrollUp => self.scroll_error(-1),
                _ => {}
            }
            return None;
        }

        if self.credentials_form.is_some() {
            return self.handle_form_mouse(mouse, position);
        }

        if let Some(menu) = &self.context_menu {
            if let MouseEventKind::Down(_) = mouse.kind {
                let inner = ui::menu_inner(ui::menu_rect(menu.anchor, self.screen));
                let left = mouse.kind == MouseEventKind::Down(MouseButton::Left);
                if left && inner.contains(position) {
                    return self.activate_context_menu();
                }
                self.context_menu = None;
            }
            return None;
        }

        if self.active_dialog.is_some() {
            return self.handle_dialog_mouse(mouse, position);
        }

        self.handle_main_mouse(mouse, position)
    }

    fn handle_form_mouse(&mut self, mouse: MouseEvent, position: Position) -> Option<Command> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return None;
        }
        let layout = ui::credentials_layout(self.screen);
        if layout.submit.contains(position) {
            return self.submit_credentials_form();
        }
        if let Some(index) = layout.rows.iter().position(|r| r.contains(position)) {
            if let Some(form) = self.credentials_form.as_mut() {
                form.focused = index;
            }
        }
        None
    }

    fn handle_dialog_mouse(&mut self, mouse: MouseEvent, position: Position) -> Option<Command> {
        let layout = ui::query_layout(self.screen);
        let dialog = self.active_dialog_mut()?;

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if layout.execute_button.contains(position) {
                    return Some(dialog.execute_command());
                }
                if layout.editor.contains(position) {
                    dialog.focus = DialogFocus::Editor;
                } else if layout.results.contains(position) {
                    dialog.focus = DialogFocus::Results;
                }
            }
            MouseEventKind::ScrollDown if layout.results.contains(position) => {
                dialog.scroll_rows(1)
            }
            MouseEventKind::ScrollUp if layout.results.contains(position) => {
                dialog.scroll_rows(-1)
            }
            _ => {}
        }
        None
    }

    fn handle_main_mouse(&mut self, mouse: MouseEvent, position: Position) -> Option<Command> {
        let layout = ui::main_layout(self.screen);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if layout.connect_button.contains(position) {
                    self.open_credentials_form();
                } else if layout.list_inner.contains(position) {
                    if let Some(index) = self.entry_at(position.y) {
                        self.select(index);
                    }
                }
            }
            MouseEventKind::Down(MouseButton::Right) if layout.list_inner.contains(position) => {
                match self.nearest_entry(position.y) {
                    Ok(index) => {
                        self.select(index);
                        self.open_context_menu(index, position);
                    }
                    Err(e) => self.show_error(Action::OpenContextMenu, &e),
                }
            }
            MouseEventKind::ScrollDown if layout.list.contains(position) => {
                self.move_selection(1)
            }
            MouseEventKind::ScrollUp if layout.list.contains(position) => self.move_selection(-1),
            _ => {}
        }
        None
    }

    /// Returns the entry drawn on screen row `y`, if there is one.
    fn entry_at(&self, y: u16) -> Option<usize> {
        let inner = ui::main_layout(self.screen).list_inner;
        let index = self.list_offset + y.checked_sub(inner.y)? as usize;
        (index < self.databases.len()).then_some(index)
    }

    /// Resolves a click to the closest entry, like a listbox's `nearest`:
    /// clicks below the last entry pick the last one.
    fn nearest_entry(&self, y: u16) -> Result<usize> {
        if self.databases.is_empty() {
            return Err(AppError::internal("the database list is empty"));
        }
        let inner = ui::main_layout(self.screen).list_inner;
        let row = y.saturating_sub(inner.y) as usize;
        Ok((self.list_offset + row).min(self.databases.len() - 1))
    }

    fn open_context_menu(&mut self, index: usize, anchor: Position) {
        if let Some(database) = self.databases.get(index) {
            self.context_menu = Some(ContextMenu {
                database: database.clone(),
                anchor,
            });
        }
    }

    fn activate_context_menu(&mut self) -> Option<Command> {
        let menu = self.context_menu.take()?;
        self.open_query_dialog(menu.database);
        None
    }

    /// Selects the entry at `index`, clamped to the list.
    pub fn select(&mut self, index: usize) {
        if self.databases.is_empty() {
            self.selected = None;
            return;
        }
        self.selected = Some(index.min(self.databases.len() - 1));
        self.ensure_selection_visible();
    }

    fn move_selection(&mut self, delta: isize) {
        let current = self.selected.unwrap_or(0);
        self.select(current.saturating_add_signed(delta));
    }

    /// Adjusts the list offset so the selection stays on screen.
    fn ensure_selection_visible(&mut self) {
        let Some(selected) = self.selected else {
            self.list_offset = 0;
            return;
        };
        let visible = (ui::main_layout(self.screen).list_inner.height as usize).max(1);
        if selected < self.list_offset {
            self.list_offset = selected;
        } else if selected >= self.list_offset + visible {
            self.list_offset = selected + 1 - visible;
        }
    }
}
