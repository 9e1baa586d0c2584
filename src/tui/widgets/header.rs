//! Header widget for the TUI.
//!
//! Displays the application name, version, and the session the list was
//! loaded with.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Widget,
};

/// Header bar widget.
pub struct Header<'a> {
    session_info: Option<&'a str>,
}

impl<'a> Header<'a> {
    /// Creates a new header widget.
    pub fn new(session_info: Option<&'a str>) -> Self {
        Self { session_info }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        // Fill background
        let style = Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        for x in area.left()..area.right() {
            buf[(x, area.y)].set_style(style);
        }

        let left_text = format!(" pgbrowse v{}", env!("CARGO_PKG_VERSION"));
        let left_span = Span::styled(left_text, style);
        buf.set_span(area.x, area.y, &left_span, area.width);

        // Right side: connection status indicator and session
        let (dot, dot_color, info) = match self.session_info {
            Some(info) => ("●", Color::Green, info),
            None => ("○", Color::Gray, "not connected"),
        };
        let right_text = format!(" {} [{}] ", dot, info);
        let right_width = right_text.chars().count() as u16;
        if right_width < area.width {
            let right_x = area.right().saturating_sub(right_width);
            buf.set_string(right_x, area.y, " ", style);
            buf.set_string(
                right_x + 1,
                area.y,
                dot,
                Style::default().bg(Color::Blue).fg(dot_color),
            );
            buf.set_string(right_x + 2, area.y, format!(" [{}] ", info), style);
        }
    }
}
