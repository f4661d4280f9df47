//! Tab bar for the left-hand panels.

use crate::tui::app::Tab;
use crate::tui::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Line,
    widgets::{Tabs, Widget},
};

pub struct TabBar {
    selected: Tab,
    saved_count: usize,
    history_count: usize,
    theme: Theme,
}

impl TabBar {
    pub fn new(selected: Tab, saved_count: usize, history_count: usize, theme: Theme) -> Self {
        Self {
            selected,
            saved_count,
            history_count,
            theme,
        }
    }

    /// Tab titles, with counts on the list tabs.
    fn titles(&self) -> Vec<String> {
        Tab::ALL
            .iter()
            .map(|tab| match tab {
                Tab::Saved => format!("{} ({})", tab.title(), self.saved_count),
                Tab::History => format!("{} ({})", tab.title(), self.history_count),
                _ => tab.title().to_string(),
            })
            .collect()
    }
}

impl Widget for TabBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let titles: Vec<Line> = self.titles().into_iter().map(Line::from).collect();
        Tabs::new(titles)
            .select(self.selected.index())
            .style(self.theme.muted())
            .highlight_style(self.theme.selected())
            .divider("|")
            .render(area, buf);
    }
}
