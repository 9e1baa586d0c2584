//! Result table widget for the TUI.
//!
//! Renders query results with column headers, a fixed width for every
//! column, and styled NULL values. Rows and columns scroll by offset.

use crate::db::{QueryResult, Value};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Stands in for cells missing from a short row.
static MISSING: Value = Value::Null;

/// Widget for rendering a query result as a table.
pub struct ResultTable<'a> {
    result: &'a QueryResult,
    column_width: usize,
    row_offset: usize,
    column_offset: usize,
}

impl<'a> ResultTable<'a> {
    /// Creates a new result table widget.
    pub fn new(result: &'a QueryResult, column_width: u16) -> Self {
        Self {
            result,
            column_width: column_width as usize,
            row_offset: 0,
            column_offset: 0,
        }
    }

    /// Sets the first visible row and column.
    pub fn offset(mut self, row: usize, column: usize) -> Self {
        self.row_offset = row;
        self.column_offset = column;
        self
    }

    /// Truncates a string to fit within the given width, adding ellipsis if needed.
    fn truncate(s: &str, max_width: usize) -> String {
        if s.chars().count() <= max_width {
            s.to_string()
        } else if max_width <= 3 {
            s.chars().take(max_width).collect()
        } else {
            let head: String = s.chars().take(max_width - 3).collect();
            format!("{}...", head)
        }
    }

    /// Returns how many columns fit from the column offset onwards.
    fn visible_columns(&self, available_width: usize) -> usize {
        // Each column takes its width plus one separator
        let per_column = self.column_width + 1;
        let remaining = self
            .result
            .columns
            .len()
            .saturating_sub(self.column_offset);
        (available_width.saturating_sub(1) / per_column)
            .max(1)
            .min(remaining)
    }

    /// Renders the table to a vector of Lines for embedding in other widgets.
    pub fn render_to_lines(&self, available_width: usize, height: usize) -> Vec<Line<'a>> {
        let mut lines = Vec::new();

        if self.result.columns.is_empty() {
            lines.push(Line::from(Span::styled(
                "(no columns)",
                Style::default().fg(Color::DarkGray),
            )));
            return lines;
        }

        let range = self.column_offset..self.column_offset + self.visible_columns(available_width);

        lines.push(self.render_header_row(range.clone()));
        lines.push(self.render_separator(range.len()));

        // Header, separator and footer take three lines
        let body = height.saturating_sub(3);
        for row in self.result.rows.iter().skip(self.row_offset).take(body) {
            lines.push(self.render_data_row(row, range.clone()));
        }

        lines.push(Line::from(Span::styled(
            self.footer(range),
            Style::default().fg(Color::DarkGray),
        )));

        lines
    }

    /// Builds the row count / position summary.
    fn footer(&self, columns: std::ops::Range<usize>) -> String {
        let rows = self.result.row_count();
        let mut footer = format!(
            "{} row{} ({}ms)",
            rows,
            if rows == 1 { "" } else { "s" },
            self.result.execution_time.as_millis()
        );
        if rows > 0 && self.row_offset > 0 {
            footer.push_str(&format!("  from row {}", self.row_offset + 1));
        }
        if columns.len() < self.result.columns.len() {
            footer.push_str(&format!(
                "  columns {}-{} of {}",
                columns.start + 1,
                columns.end,
                self.result.columns.len()
            ));
        }
        footer
    }

    fn render_separator(&self, columns: usize) -> Line<'a> {
        let mut border = String::new();
        for i in 0..columns {
            if i > 0 {
                border.push('┼');
            }
            border.push_str(&"─".repeat(self.column_width));
        }
        Line::from(Span::styled(border, Style::default().fg(Color::DarkGray)))
    }

    /// Renders the header row with column names.
    fn render_header_row(&self, columns: std::ops::Range<usize>) -> Line<'a> {
        let mut spans = Vec::new();

        for (i, col) in self.result.columns[columns].iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
            }
            let name = Self::truncate(&col.name, self.column_width);
            spans.push(Span::styled(
                format!("{:width$}", name, width = self.column_width),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        Line::from(spans)
    }

    /// Renders a data row.
    fn render_data_row(&self, row: &[Value], columns: std::ops::Range<usize>) -> Line<'a> {
        let mut spans = Vec::new();

        for (i, index) in columns.enumerate() {
            if i > 0 {
                spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
            }
            let value = row.get(index).unwrap_or(&MISSING);
            let display = Self::truncate(&value.to_display_string(), self.column_width);

            let style = if value.is_null() {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC)
            } else {
                Style::default()
            };

            spans.push(Span::styled(
                format!("{:width$}", display, width = self.column_width),
                style,
            ));
        }

        Line::from(spans)
    }
}

impl Widget for ResultTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = self.render_to_lines(area.width as usize, area.height as usize);

        for (i, line) in lines.iter().enumerate() {
            if i >= area.height as usize {
                break;
            }
            let y = area.y + i as u16;
            buf.set_line(area.x, y, line, area.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ColumnInfo;
    use std::time::Duration;

    fn sample_result() -> QueryResult {
        QueryResult::with_data(
            vec![
                ColumnInfo::new("id", "INT4"),
                ColumnInfo::new("name", "TEXT"),
                ColumnInfo::new("email", "TEXT"),
            ],
            vec![
                vec![
                    Value::Int(1),
                    Value::String("Alice".to_string()),
                    Value::String("alice@example.com".to_string()),
                ],
                vec![Value::Int(2), Value::String("Bob".to_string()), Value::Null],
            ],
        )
        .with_execution_time(Duration::from_millis(23))
    }

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_truncate() {
        assert_eq!(ResultTable::truncate("hello", 10), "hello");
        assert_eq!(ResultTable::truncate("hello world", 8), "hello...");
        assert_eq!(ResultTable::truncate("hi", 2), "hi");
        assert_eq!(ResultTable::truncate("hello", 3), "hel");
        assert_eq!(ResultTable::truncate("größenwahn", 6), "grö...");
    }

    #[test]
    fn test_fixed_column_width() {
        let result = sample_result();
        let lines = ResultTable::new(&result, 14).render_to_lines(80, 20);

        // header, separator, 2 rows, footer
        assert_eq!(lines.len(), 5);
        let cell = |s: &str| format!("{:14}", s);
        assert_eq!(
            text(&lines[0]),
            [cell("id"), cell("name"), cell("email")].join("│")
        );
        assert_eq!(
            text(&lines[2]),
            [cell("1"), cell("Alice"), cell("alice@examp...")].join("│")
        );
        assert_eq!(
            text(&lines[3]),
            [cell("2"), cell("Bob"), cell("NULL")].join("│")
        );
        assert_eq!(text(&lines[4]), "2 rows (23ms)");
    }

    #[test]
    fn test_column_offset_and_narrow_area() {
        let result = sample_result();
        let lines = ResultTable::new(&result, 14)
            .offset(0, 1)
            .render_to_lines(20, 20);

        assert_eq!(text(&lines[0]).trim_end(), "name");
        assert!(text(lines.last().unwrap()).contains("columns 2-2 of 3"));
    }

    #[test]
    fn test_row_offset_and_height() {
        let result = sample_result();
        let lines = ResultTable::new(&result, 8)
            .offset(1, 0)
            .render_to_lines(80, 4);

        assert_eq!(lines.len(), 4);
        assert!(text(&lines[2]).starts_with(&format!("{:8}│", "2")));
        assert!(text(&lines[3]).contains("from row 2"));
    }

    #[test]
    fn test_no_columns() {
        let result = QueryResult::new();
        let lines = ResultTable::new(&result, 14).render_to_lines(80, 10);

        assert_eq!(lines.len(), 1);
    }
}
