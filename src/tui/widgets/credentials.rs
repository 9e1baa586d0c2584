//! Credentials dialog widget.
//!
//! Four labelled fields and a submit button. The password is drawn as `*`.
//! Text wider than its field scrolls so the cursor stays visible.

use crate::tui::app::{CredentialField, CredentialsForm};
use crate::tui::ui::CredentialsLayout;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

/// Returns the first visible character of a field whose cursor is at
/// `cursor`, given `width` visible cells.
pub fn field_scroll(cursor: usize, width: u16) -> usize {
    let width = (width as usize).max(1);
    cursor.saturating_sub(width - 1)
}

/// Modal dialog for entering connection credentials.
pub struct CredentialsDialog<'a> {
    form: &'a CredentialsForm,
    layout: &'a CredentialsLayout,
}

impl<'a> CredentialsDialog<'a> {
    pub fn new(form: &'a CredentialsForm, layout: &'a CredentialsLayout) -> Self {
        Self { form, layout }
    }

    /// Returns the visible part of a field's text.
    fn display_value(&self, field: CredentialField, width: u16) -> String {
        let input = self.form.input(field);
        let skip = field_scroll(input.cursor, width);
        if field.is_masked() {
            "*".repeat(input.len().saturating_sub(skip))
        } else {
            input.text.chars().skip(skip).collect()
        }
    }
}

impl Widget for CredentialsDialog<'_> {
    fn render(self, _area: Rect, buf: &mut Buffer) {
        let dialog = self.layout.dialog;
        Clear.render(dialog, buf);

        Block::default()
            .title(" Connect to PostgreSQL ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .style(Style::default().bg(Color::Black))
            .render(dialog, buf);

        for (index, field) in CredentialField::ALL.iter().enumerate() {
            let row = self.layout.rows[index];
            let focused = self.form.focused == index;

            let label_style = if focused {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            buf.set_span(row.x, row.y, &Span::styled(field.label(), label_style), row.width);

            let input = self.layout.input(index);
            let input_style = if focused {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else {
                Style::default().fg(Color::White)
            };
            for x in input.left()..input.right() {
                buf[(x, input.y)].set_style(input_style);
            }
            buf.set_stringn(
                input.x,
                input.y,
                self.display_value(*field, input.width),
                input.width as usize,
                input_style,
            );
        }

        let submit = Line::from(Span::styled(
            "[ Submit ]",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ));
        buf.set_line(
            self.layout.submit.x,
            self.layout.submit.y,
            &submit,
            self.layout.submit.width,
        );
    }
}
