//! Query dialog widget.
//!
//! A tab strip of open dialogs, the statement editor, the Execute button and
//! the result table.

use super::table::ResultTable;
use crate::tui::app::{DialogFocus, QueryDialog};
use crate::tui::ui::{shrink, QueryLayout};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

/// Returns the first visible (row, column) of the editor so the cursor at
/// `cursor` stays inside `area`.
pub fn editor_scroll(cursor: (usize, usize), area: Rect) -> (usize, usize) {
    let (row, col) = cursor;
    let height = (area.height as usize).max(1);
    let width = (area.width as usize).max(1);
    (
        row.saturating_sub(height - 1),
        col.saturating_sub(width - 1),
    )
}

/// Renders one query dialog over the main screen.
pub struct QueryDialogView<'a> {
    dialog: &'a QueryDialog,
    /// Database of every open dialog, flagged when it is this one.
    tabs: &'a [(String, bool)],
    layout: &'a QueryLayout,
    column_width: u16,
}

impl<'a> QueryDialogView<'a> {
    pub fn new(
        dialog: &'a QueryDialog,
        tabs: &'a [(String, bool)],
        layout: &'a QueryLayout,
        column_width: u16,
    ) -> Self {
        Self {
            dialog,
            tabs,
            layout,
            column_width,
        }
    }

    fn border_style(&self, focus: DialogFocus) -> Style {
        if self.dialog.focus == focus {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    }

    fn render_tabs(&self, buf: &mut Buffer) {
        let mut spans = Vec::new();
        for (database, active) in self.tabs {
            let style = if *active {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(format!(" {database} "), style));
            spans.push(Span::raw(" "));
        }
        let area = self.layout.tabs;
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }

    fn render_editor(&self, buf: &mut Buffer) {
        let area = self.layout.editor;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.border_style(DialogFocus::Editor))
            .title(" SQL ");

        let inner = shrink(area, 1);
        let (top, left) = editor_scroll(self.dialog.editor.cursor(), inner);
        let lines: Vec<Line> = self
            .dialog
            .editor
            .lines()
            .iter()
            .skip(top)
            .map(|line| Line::from(line.chars().skip(left).collect::<String>()))
            .collect();

        Paragraph::new(lines).block(block).render(area, buf);
    }

    fn render_results(&self, buf: &mut Buffer) {
        let area = self.layout.results;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.border_style(DialogFocus::Results))
            .title(" Results ");
        let inner = block.inner(area);
        block.render(area, buf);

        match &self.dialog.result {
            Some(result) => ResultTable::new(result, self.column_width)
                .offset(self.dialog.row_offset, self.dialog.column_offset)
                .render(inner, buf),
            None => Paragraph::new(Line::from(Span::styled(
                "Press F5 or click Execute to run the statement",
                Style::default().fg(Color::DarkGray),
            )))
            .render(inner, buf),
        }
    }
}

impl Widget for QueryDialogView<'_> {
    fn render(self, _area: Rect, buf: &mut Buffer) {
        let dialog = self.layout.dialog;
        Clear.render(dialog, buf);

        Block::default()
            .title(format!(" {} ", self.dialog.title()))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .style(Style::default().bg(Color::Black))
            .render(dialog, buf);

        self.render_tabs(buf);
        self.render_editor(buf);

        let button = self.layout.execute_button;
        let execute = Line::from(Span::styled(
            "[ Execute ]",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ));
        buf.set_line(button.x, button.y, &execute, button.width);

        self.render_results(buf);
    }
}
