//! Context menu popup for database list entries.
//!
//! The border title names the database the menu acts on.

use crate::tui::app::ContextMenu;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

/// Renders the menu into the rectangle computed by `ui::menu_rect`.
pub struct ContextMenuPopup<'a> {
    menu: &'a ContextMenu,
}

impl<'a> ContextMenuPopup<'a> {
    pub fn new(menu: &'a ContextMenu) -> Self {
        Self { menu }
    }
}

impl Widget for ContextMenuPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(Span::styled(
                self.menu.database.as_str(),
                Style::default().fg(Color::DarkGray),
            ))
            .style(Style::default().bg(Color::Black));

        let lines: Vec<Line> = ContextMenu::ITEMS
            .iter()
            .map(|item| {
                Line::from(Span::styled(
                    *item,
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ))
            })
            .collect();

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
