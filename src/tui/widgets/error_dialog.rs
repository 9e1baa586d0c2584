//! Modal error dialog widget.
//!
//! Shows the failure label and the fault description verbatim, with an OK
//! button. Everything else is blocked until it is dismissed. Messages taller
//! than the screen scroll.

use crate::tui::ui::ErrorLayout;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

/// Error popup drawn over everything else.
pub struct ErrorPopup<'a> {
    message: &'a str,
    layout: &'a ErrorLayout,
    scroll: usize,
}

impl<'a> ErrorPopup<'a> {
    pub fn new(message: &'a str, layout: &'a ErrorLayout) -> Self {
        Self {
            message,
            layout,
            scroll: 0,
        }
    }

    /// Sets the first visible message line.
    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll.min(self.layout.max_scroll());
        self
    }
}

impl Widget for ErrorPopup<'_> {
    fn render(self, _area: Rect, buf: &mut Buffer) {
        let dialog = self.layout.dialog;
        Clear.render(dialog, buf);

        let mut block = Block::default()
            .title(" Error ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .style(Style::default().bg(Color::Black));
        if self.layout.max_scroll() > 0 {
            block = block.title_bottom(
                Line::from(format!(
                    " {}/{} ",
                    self.scroll + self.layout.text.height as usize,
                    self.layout.lines
                ))
                .right_aligned(),
            );
        }
        block.render(dialog, buf);

        let text = self.layout.text;
        let mut lines: Vec<Line> = Vec::new();
        for (i, line) in wrap_text(self.message, text.width as usize)
            .into_iter()
            .enumerate()
            .skip(self.scroll)
        {
            // First line is the action label
            let style = if i == 0 {
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            lines.push(Line::from(Span::styled(line, style)));
        }
        Paragraph::new(lines).render(text, buf);

        let ok = Line::from(Span::styled(
            "[ OK ]",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ));
        let button = self.layout.ok_button;
        buf.set_line(button.x, button.y, &ok, button.width);
    }
}

/// Wraps text to fit within the given width.
///
/// Explicit newlines are kept, words longer than the width are split.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut lines = Vec::new();

    for line in text.lines() {
        if line.chars().count() <= max_width {
            lines.push(line.to_string());
            continue;
        }

        let mut current_line = String::new();
        for word in line.split_whitespace() {
            let mut word = word.to_string();
            while word.chars().count() > max_width {
                if !current_line.is_empty() {
                    lines.push(std::mem::take(&mut current_line));
                }
                let head: String = word.chars().take(max_width).collect();
                word = word.chars().skip(max_width).collect();
                lines.push(head);
            }

            if current_line.is_empty() {
                current_line = word;
            } else if current_line.chars().count() + 1 + word.chars().count() <= max_width {
                current_line.push(' ');
                current_line.push_str(&word);
            } else {
                lines.push(current_line);
                current_line = word;
            }
        }
        if !current_line.is_empty() {
            lines.push(current_line);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}
