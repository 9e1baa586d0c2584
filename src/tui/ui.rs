//! UI rendering for the TUI.
//!
//! Layout is computed by pure functions so that rendering and mouse hit
//! testing agree on where everything is.

use super::app::{App, CredentialField, DialogFocus};
use super::widgets::{
    context_menu::ContextMenuPopup,
    credentials::{field_scroll, CredentialsDialog},
    database_list::DatabaseList,
    error_dialog::{wrap_text, ErrorPopup},
    header::Header,
    query_dialog::{editor_scroll, QueryDialogView},
};
use ratatui::{
    layout::{Constraint, Direction, Flex, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Label of the button that opens the credentials dialog.
pub const CONNECT_LABEL: &str = "Connect to PostgreSQL";

/// Width of the credential field labels, including padding.
const FIELD_LABEL_WIDTH: u16 = 11;

/// Regions of the main screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MainLayout {
    pub header: Rect,
    pub connect_button: Rect,
    /// The bordered list block.
    pub list: Rect,
    /// Rows inside the list border, one per entry.
    pub list_inner: Rect,
    pub status: Rect,
}

/// Computes the main screen layout.
pub fn main_layout(area: Rect) -> MainLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(3), // Toolbar
            Constraint::Min(3),    // Database list
            Constraint::Length(1), // Status line
        ])
        .split(area);

    let button_width = (CONNECT_LABEL.len() as u16 + 4).min(rows[1].width);
    let connect_button = Rect::new(rows[1].x + 1, rows[1].y, button_width, rows[1].height)
        .intersection(rows[1]);

    MainLayout {
        header: rows[0],
        connect_button,
        list: rows[2],
        list_inner: shrink(rows[2], 1),
        status: rows[3],
    }
}

/// Regions of the credentials dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialsLayout {
    pub dialog: Rect,
    /// One full-width row per field, in [`CredentialField::ALL`] order.
    pub rows: [Rect; 4],
    pub submit: Rect,
}

impl CredentialsLayout {
    /// Returns the editable part of a field row.
    pub fn input(&self, index: usize) -> Rect {
        let row = self.rows[index];
        let offset = FIELD_LABEL_WIDTH.min(row.width);
        Rect::new(row.x + offset, row.y, row.width - offset, row.height)
    }
}

/// Computes the credentials dialog layout.
pub fn credentials_layout(area: Rect) -> CredentialsLayout {
    // Borders (2) + fields (4) + spacing (1) + button (1)
    let dialog = center_rect(50u16.min(area.width), 8u16.min(area.height), area);
    let inner = shrink(dialog, 1);

    let row = |i: u16| Rect::new(inner.x + 1, inner.y + i, inner.width.saturating_sub(2), 1);
    let rows = [row(0), row(1), row(2), row(3)].map(|r| r.intersection(inner));

    let submit_width = 10;
    let submit = Rect::new(
        inner.x + inner.width.saturating_sub(submit_width) / 2,
        inner.y + 5,
        submit_width,
        1,
    )
    .intersection(inner);

    CredentialsLayout {
        dialog,
        rows,
        submit,
    }
}

/// Regions of a query dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryLayout {
    pub dialog: Rect,
    /// One line listing every open dialog.
    pub tabs: Rect,
    /// The bordered editor block.
    pub editor: Rect,
    pub execute_button: Rect,
    /// The bordered result block.
    pub results: Rect,
}

/// Computes the query dialog layout.
pub fn query_layout(area: Rect) -> QueryLayout {
    let dialog = shrink_xy(area, 2, 1);
    let inner = shrink(dialog, 1);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tabs
            Constraint::Length(7), // Editor
            Constraint::Length(1), // Execute button
            Constraint::Min(4),    // Results
        ])
        .split(inner);

    let execute_button = Rect::new(rows[2].x, rows[2].y, 11, rows[2].height).intersection(rows[2]);

    QueryLayout {
        dialog,
        tabs: rows[0],
        editor: rows[1],
        execute_button,
        results: rows[3],
    }
}

/// Places the context menu at `anchor`, kept inside `area`.
pub fn menu_rect(anchor: Position, area: Rect) -> Rect {
    let width = 14u16.min(area.width);
    let height = 3u16.min(area.height);
    let x = anchor.x.min(area.right().saturating_sub(width));
    let y = anchor.y.min(area.bottom().saturating_sub(height));
    Rect::new(x, y, width, height)
}

/// Returns the area holding the menu entries.
pub fn menu_inner(menu: Rect) -> Rect {
    shrink(menu, 1)
}

/// Regions of the error dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorLayout {
    pub dialog: Rect,
    pub text: Rect,
    pub ok_button: Rect,
    /// Number of wrapped message lines, which may exceed `text.height`.
    pub lines: usize,
}

impl ErrorLayout {
    /// Returns the largest useful scroll offset for the message.
    pub fn max_scroll(&self) -> usize {
        self.lines.saturating_sub(self.text.height as usize)
    }
}

/// Computes the error dialog layout; its height follows the wrapped message
/// until the screen is full, after which the text scrolls.
pub fn error_layout(message: &str, area: Rect) -> ErrorLayout {
    let width = area.width.saturating_sub(4).min(70);
    let lines = wrap_text(message, width.saturating_sub(4) as usize).len();
    // Borders (2) + text + spacing (1) + button (1)
    let height = (lines as u16).saturating_add(4).min(area.height);

    let dialog = center_rect(width, height, area);
    let inner = shrink_xy(dialog, 2, 1);
    let text = Rect::new(inner.x, inner.y, inner.width, inner.height.saturating_sub(2));
    let ok_button = Rect::new(
        inner.x + inner.width.saturating_sub(6) / 2,
        inner.bottom().saturating_sub(1),
        6,
        1,
    )
    .intersection(inner);

    ErrorLayout {
        dialog,
        text,
        ok_button,
        lines,
    }
}

/// Centers a rectangle of the given size within the parent area.
pub fn center_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([Constraint::Length(width)]).flex(Flex::Center);
    let vertical = Layout::vertical([Constraint::Length(height)]).flex(Flex::Center);

    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

/// Returns `area` with `margin` cells removed on every side.
pub fn shrink(area: Rect, margin: u16) -> Rect {
    shrink_xy(area, margin, margin)
}

fn shrink_xy(area: Rect, horizontal: u16, vertical: u16) -> Rect {
    if area.width < horizontal * 2 || area.height < vertical * 2 {
        return Rect::new(area.x, area.y, 0, 0);
    }
    Rect::new(
        area.x + horizontal,
        area.y + vertical,
        area.width - horizontal * 2,
        area.height - vertical * 2,
    )
}

/// Renders the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let layout = main_layout(area);

    render_main(frame, &layout, app);

    if let Some(dialog) = app.active_dialog() {
        let query = query_layout(area);
        let titles: Vec<(String, bool)> = app
            .dialogs
            .iter()
            .map(|d| (d.database.clone(), d.id == dialog.id))
            .collect();
        frame.render_widget(
            QueryDialogView::new(dialog, &titles, &query, app.column_width),
            area,
        );
        if dialog.focus == DialogFocus::Editor && !blocked_by_popup(app) {
            let (row, col) = dialog.editor.cursor();
            let editor = shrink(query.editor, 1);
            let (top, left) = editor_scroll((row, col), editor);
            if editor.width > 0 && editor.height > 0 {
                frame.set_cursor_position((
                    editor.x + (col - left) as u16,
                    editor.y + (row - top) as u16,
                ));
            }
        }
    }

    if let Some(menu) = &app.context_menu {
        frame.render_widget(ContextMenuPopup::new(menu), menu_rect(menu.anchor, area));
    }

    if let Some(form) = &app.credentials_form {
        let credentials = credentials_layout(area);
        frame.render_widget(CredentialsDialog::new(form, &credentials), area);
        if app.error.is_none() {
            let input = credentials.input(form.focused);
            let field = form.focused_field();
            let cursor = form.input(field).cursor;
            let column = cursor - field_scroll(cursor, input.width);
            if input.width > 0 {
                frame.set_cursor_position((input.x + column as u16, input.y));
            }
        }
    }

    if let Some(error) = &app.error {
        let layout = error_layout(&error.message, area);
        frame.render_widget(
            ErrorPopup::new(&error.message, &layout).scroll(error.scroll),
            area,
        );
    }
}

fn blocked_by_popup(app: &App) -> bool {
    app.error.is_some() || app.credentials_form.is_some() || app.context_menu.is_some()
}

/// Renders the header, toolbar, list and status line.
fn render_main(frame: &mut Frame, layout: &MainLayout, app: &App) {
    frame.render_widget(Header::new(app.session_info.as_deref()), layout.header);

    let button = Paragraph::new(Line::from(Span::styled(
        format!("[ {} ]", CONNECT_LABEL),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )));
    let button_line = Rect::new(
        layout.connect_button.x,
        layout.connect_button.y + 1,
        layout.connect_button.width,
        1,
    )
    .intersection(layout.connect_button);
    frame.render_widget(button, button_line);

    let list = DatabaseList::new(&app.databases, app.selected, app.list_offset)
        .focused(app.active_dialog.is_none() && !blocked_by_popup(app));
    frame.render_widget(list, layout.list);

    let status = match &app.status {
        Some(text) => Line::from(Span::styled(
            text.clone(),
            Style::default().fg(Color::Yellow),
        )),
        None => Line::from(Span::styled(status_hints(app), Style::default().fg(Color::DarkGray))),
    };
    frame.render_widget(Paragraph::new(status), layout.status);
}

/// Returns the key hints for the current screen.
fn status_hints(app: &App) -> &'static str {
    if let Some(error) = &app.error {
        if error_layout(&error.message, app.screen).max_scroll() > 0 {
            " Enter: dismiss  Up/Down: scroll"
        } else {
            " Enter: dismiss"
        }
    } else if let Some(form) = &app.credentials_form {
        if form.focused_field() == CredentialField::Password {
            " Tab: next field  Enter: submit  Esc: cancel  (password is not stored)"
        } else {
            " Tab: next field  Enter: submit  Esc: cancel"
        }
    } else if app.context_menu.is_some() {
        " Enter: open  Esc: close"
    } else if app.active_dialog.is_some() {
        " F5: execute  Tab: editor/results  F6: switch dialog  Esc: close"
    } else {
        " c: connect  r: refresh  Enter/right-click: menu  F6: dialogs  q: quit"
    }
}
