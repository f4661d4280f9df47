//! Result table widget for the TUI.
//!
//! Renders one page of a result as a formatted table with column headers,
//! auto-sized columns and a pagination footer.

use crate::db::Row;
use crate::pagination::PaginatedView;
use crate::tui::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};
use std::time::Duration;

/// Maximum width for any column.
const MAX_COLUMN_WIDTH: usize = 40;

/// Minimum width for any column.
const MIN_COLUMN_WIDTH: usize = 4;

/// Widget for rendering a page of results as a table.
pub struct ResultTable<'a> {
    view: PaginatedView<'a>,
    execution_time: Option<Duration>,
    theme: Theme,
}

impl<'a> ResultTable<'a> {
    /// Creates a new result table widget.
    pub fn new(view: PaginatedView<'a>, theme: Theme) -> Self {
        Self {
            view,
            execution_time: None,
            theme,
        }
    }

    /// Shows the execution time in the footer.
    pub fn execution_time(mut self, execution_time: Duration) -> Self {
        self.execution_time = Some(execution_time);
        self
    }

    fn cell_text(row: &Row, column: &str) -> String {
        row.get(column)
            .map(|v| v.to_display_string())
            .unwrap_or_default()
    }

    /// Calculates the optimal width for each column from the visible rows.
    fn calculate_column_widths(&self) -> Vec<usize> {
        self.view
            .columns
            .iter()
            .map(|col| {
                self.view
                    .rows
                    .iter()
                    .map(|row| Self::cell_text(row, col).chars().count())
                    .fold(col.chars().count().max(MIN_COLUMN_WIDTH), usize::max)
                    .min(MAX_COLUMN_WIDTH)
            })
            .collect()
    }

    /// Truncates a string to fit within the given width, adding ellipsis if needed.
    fn truncate(s: &str, max_width: usize) -> String {
        if s.chars().count() <= max_width {
            s.to_string()
        } else if max_width <= 3 {
            s.chars().take(max_width).collect()
        } else {
            let kept: String = s.chars().take(max_width - 3).collect();
            format!("{kept}...")
        }
    }

    /// Renders the table to a vector of Lines.
    pub fn render_to_lines(&self, available_width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        let border_style = Style::default().fg(self.theme.border);

        if self.view.columns.is_empty() {
            lines.push(Line::from(Span::styled("(empty result)", self.theme.muted())));
            return lines;
        }

        let widths = self.calculate_column_widths();

        // Shrink proportionally when the table is wider than the panel.
        let total_width: usize = widths.iter().sum::<usize>() + widths.len() * 3 + 1;
        let scale_factor = if total_width > available_width && available_width > 0 {
            available_width as f64 / total_width as f64
        } else {
            1.0
        };

        let adjusted_widths: Vec<usize> = widths
            .iter()
            .map(|&w| ((w as f64 * scale_factor) as usize).max(MIN_COLUMN_WIDTH))
            .collect();

        lines.push(Self::render_border(&adjusted_widths, '┌', '┬', '┐', border_style));
        lines.push(self.render_header_row(&adjusted_widths, border_style));
        lines.push(Self::render_border(&adjusted_widths, '├', '┼', '┤', border_style));

        for row in self.view.rows {
            lines.push(self.render_data_row(row, &adjusted_widths, border_style));
        }

        lines.push(Self::render_border(&adjusted_widths, '└', '┴', '┘', border_style));
        lines.push(self.render_footer());

        lines
    }

    fn render_border(
        widths: &[usize],
        left: char,
        mid: char,
        right: char,
        style: Style,
    ) -> Line<'static> {
        let mut border = String::new();
        border.push(left);

        for (i, &width) in widths.iter().enumerate() {
            border.push_str(&"─".repeat(width + 2));
            if i < widths.len() - 1 {
                border.push(mid);
            }
        }

        border.push(right);
        Line::from(Span::styled(border, style))
    }

    fn render_header_row(&self, widths: &[usize], border_style: Style) -> Line<'static> {
        let mut spans = vec![Span::styled("│", border_style)];

        for (i, col) in self.view.columns.iter().enumerate() {
            let width = widths.get(i).copied().unwrap_or(MIN_COLUMN_WIDTH);
            let name = Self::truncate(col, width);
            spans.push(Span::styled(
                format!(" {:width$} ", name, width = width),
                self.theme.heading(),
            ));
            spans.push(Span::styled("│", border_style));
        }

        Line::from(spans)
    }

    fn render_data_row(&self, row: &Row, widths: &[usize], border_style: Style) -> Line<'static> {
        let mut spans = vec![Span::styled("│", border_style)];

        for (i, col) in self.view.columns.iter().enumerate() {
            let width = widths.get(i).copied().unwrap_or(MIN_COLUMN_WIDTH);
            let truncated = Self::truncate(&Self::cell_text(row, col), width);
            spans.push(Span::styled(
                format!(" {:width$} ", truncated, width = width),
                Style::default().fg(self.theme.text),
            ));
            spans.push(Span::styled("│", border_style));
        }

        Line::from(spans)
    }

    /// Previous/next controls and the page status.
    fn render_footer(&self) -> Line<'static> {
        let enabled = Style::default()
            .fg(self.theme.accent)
            .add_modifier(Modifier::BOLD);
        let disabled = self.theme.muted();

        let mut spans = vec![
            Span::styled(
                "◀ Prev [PgUp]",
                if self.view.has_previous() { enabled } else { disabled },
            ),
            Span::raw("  "),
            Span::styled(self.view.status_line(), Style::default().fg(self.theme.text)),
            Span::raw("  "),
            Span::styled(
                "[PgDn] Next ▶",
                if self.view.has_next() { enabled } else { disabled },
            ),
        ];

        if let Some(elapsed) = self.execution_time {
            spans.push(Span::styled(
                format!("  ({}ms)", elapsed.as_millis()),
                self.theme.muted(),
            ));
        }

        Line::from(spans)
    }
}

impl Widget for ResultTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = self.render_to_lines(area.width as usize);

        for (i, line) in lines.iter().enumerate() {
            if i >= area.height as usize {
                break;
            }
            let y = area.y + i as u16;
            buf.set_line(area.x, y, line, area.width);
        }
    }
}
