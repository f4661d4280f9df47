//! Key hint bar shown at the bottom of the screen.

use crate::tui::app::Tab;
use crate::tui::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

/// One-line list of the shortcuts available on the current tab.
pub struct HelpBar {
    tab: Tab,
    theme: Theme,
}

impl HelpBar {
    pub fn new(tab: Tab, theme: Theme) -> Self {
        Self { tab, theme }
    }

    fn shortcuts(&self) -> Vec<(&'static str, &'static str)> {
        let mut shortcuts = vec![("Tab", "Panel"), ("F1-F5", "Predefined")];
        match self.tab {
            Tab::Editor => shortcuts.push(("F6-F8", "Sample")),
            Tab::Saved | Tab::History => shortcuts.push(("↑/↓", "Select")),
            Tab::Upload => {}
        }
        shortcuts.extend([
            ("PgUp/PgDn", "Page"),
            ("Ctrl+T", "Theme"),
            ("Ctrl+Q", "Quit"),
        ]);
        shortcuts
    }

    fn line(&self) -> Line<'static> {
        let key_style = self.theme.heading();
        let desc_style = Style::default().fg(self.theme.text);
        let spans = self
            .shortcuts()
            .into_iter()
            .flat_map(|(key, desc)| {
                [
                    Span::styled(format!(" {key} "), key_style),
                    Span::styled(format!("{desc} "), desc_style),
                ]
            })
            .collect::<Vec<_>>();
        Line::from(spans)
    }
}

impl Widget for HelpBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        buf.set_line(area.x, area.y, &self.line(), area.width);
    }
}
