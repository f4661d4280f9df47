//! Toast notification widget for the TUI.
//!
//! Displays temporary messages that auto-dismiss.

use crate::tui::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

/// Toast notification widget.
pub struct Toast<'a> {
    message: &'a str,
    theme: Theme,
}

impl<'a> Toast<'a> {
    /// Creates a new toast widget.
    pub fn new(message: &'a str, theme: Theme) -> Self {
        Self { message, theme }
    }

    /// Calculates the area for the toast (bottom-right corner).
    pub fn area(screen: Rect) -> Rect {
        let width = 44.min(screen.width.saturating_sub(4));
        let height = 3.min(screen.height);
        let x = screen.width.saturating_sub(width + 2);
        let y = screen.height.saturating_sub(height + 2);
        Rect::new(x, y, width, height)
    }
}

impl Widget for Toast<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.success))
            .style(self.theme.base());

        let inner = block.inner(area);
        block.render(area, buf);

        let max_len = inner.width as usize;
        let display_msg = if self.message.chars().count() > max_len {
            let kept: String = self
                .message
                .chars()
                .take(max_len.saturating_sub(1))
                .collect();
            format!("{kept}…")
        } else {
            self.message.to_string()
        };

        let line = Line::from(vec![Span::styled(
            display_msg,
            Style::default()
                .fg(self.theme.text)
                .add_modifier(Modifier::BOLD),
        )]);

        Paragraph::new(line).render(inner, buf);
    }
}
