//! Header widget for the TUI.
//!
//! Displays the application title, the execution spinner and the theme
//! toggle state.

use super::spinner::Spinner;
use crate::tui::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::Widget,
};

/// Header bar widget.
pub struct Header<'a> {
    spinner: Option<&'a Spinner>,
    dark_mode: bool,
    theme: Theme,
}

impl<'a> Header<'a> {
    /// Creates a new header widget.
    pub fn new(spinner: Option<&'a Spinner>, dark_mode: bool, theme: Theme) -> Self {
        Self {
            spinner,
            dark_mode,
            theme,
        }
    }

    /// Right-hand theme indicator.
    fn theme_label(&self) -> &'static str {
        if self.dark_mode {
            " ☾ Dark [Ctrl+T] "
        } else {
            " ☀ Light [Ctrl+T] "
        }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        let style = Style::default()
            .bg(self.theme.header_bg)
            .fg(self.theme.header_fg)
            .add_modifier(Modifier::BOLD);

        for x in area.left()..area.right() {
            buf[(x, area.y)].set_style(style);
        }

        let left_span = Span::styled(" SQL Query Runner", style);
        buf.set_span(area.x, area.y, &left_span, area.width);

        if let Some(spinner) = self.spinner {
            let spinner_text = spinner.display();
            let spinner_width = spinner_text.chars().count() as u16;
            let spinner_x = area.x + (area.width.saturating_sub(spinner_width)) / 2;
            buf.set_string(spinner_x, area.y, &spinner_text, style);
        }

        let right_text = self.theme_label();
        let right_width = right_text.chars().count() as u16;
        if right_width < area.width {
            let right_x = area.right().saturating_sub(right_width);
            buf.set_string(right_x, area.y, right_text, style);
        }
    }
}
