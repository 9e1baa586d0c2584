//! Database list widget for the TUI.
//!
//! Displays the catalog's database names with the current selection.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Scrollable list of database names.
pub struct DatabaseList<'a> {
    names: &'a [String],
    selected: Option<usize>,
    offset: usize,
    focused: bool,
}

impl<'a> DatabaseList<'a> {
    /// Creates a list showing `names` from `offset` onwards.
    pub fn new(names: &'a [String], selected: Option<usize>, offset: usize) -> Self {
        Self {
            names,
            selected,
            offset,
            focused: true,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for DatabaseList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let title = if self.names.is_empty() {
            " Databases ".to_string()
        } else {
            format!(" Databases ({}) ", self.names.len())
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title);

        let lines: Vec<Line> = if self.names.is_empty() {
            vec![Line::from(Span::styled(
                "Press c or click the button to connect",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            let visible = block.inner(area).height as usize;
            self.names
                .iter()
                .enumerate()
                .skip(self.offset)
                .take(visible)
                .map(|(i, name)| {
                    if Some(i) == self.selected {
                        Line::from(Span::styled(
                            format!("▸ {name}"),
                            Style::default()
                                .fg(Color::Black)
                                .bg(Color::Cyan)
                                .add_modifier(Modifier::BOLD),
                        ))
                    } else {
                        Line::from(format!("  {name}"))
                    }
                })
                .collect()
        };

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
