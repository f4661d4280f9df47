//! Recent query history panel.

use crate::persistence::{format_timestamp, QueryHistory};
use crate::tui::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};

pub struct HistoryList<'a> {
    history: &'a QueryHistory,
    selected: usize,
    theme: Theme,
}

impl<'a> HistoryList<'a> {
    pub fn new(history: &'a QueryHistory, selected: usize, theme: Theme) -> Self {
        Self {
            history,
            selected,
            theme,
        }
    }
}

impl Widget for HistoryList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [list_area, hint_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border(false))
            .title(format!(
                " Recent Queries (last {}) ",
                self.history.limit()
            ));

        if self.history.is_empty() {
            Paragraph::new(Span::styled("No queries executed yet", self.theme.muted()))
                .block(block)
                .render(list_area, buf);
        } else {
            let items: Vec<ListItem> = self
                .history
                .iter()
                .map(|entry| {
                    ListItem::new(vec![
                        Line::from(Span::styled(
                            format_timestamp(&entry.timestamp),
                            self.theme.muted(),
                        )),
                        Line::from(Span::styled(
                            format!("  {}", entry.query),
                            Style::default().fg(self.theme.text),
                        )),
                    ])
                })
                .collect();

            let mut state = ListState::default().with_selected(Some(self.selected));
            let list = List::new(items)
                .block(block)
                .highlight_style(self.theme.selected());
            StatefulWidget::render(list, list_area, buf, &mut state);
        }

        let hint = Line::from(Span::styled("[Enter] Load into editor", self.theme.muted()));
        if hint_area.height > 0 {
            buf.set_line(hint_area.x, hint_area.y, &hint, hint_area.width);
        }
    }
}
