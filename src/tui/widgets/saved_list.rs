//! Saved queries panel with search.

use crate::persistence::{format_timestamp, SavedQuery};
use crate::tui::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};

pub struct SavedList<'a> {
    /// Entries matching the search, with their underlying index.
    entries: &'a [(usize, &'a SavedQuery)],
    search: &'a str,
    selected: usize,
    total: usize,
    theme: Theme,
}

impl<'a> SavedList<'a> {
    pub fn new(
        entries: &'a [(usize, &'a SavedQuery)],
        search: &'a str,
        selected: usize,
        total: usize,
        theme: Theme,
    ) -> Self {
        Self {
            entries,
            search,
            selected,
            total,
            theme,
        }
    }

    /// Splits the panel into search box, list and hint line.
    pub fn layout(area: Rect) -> [Rect; 3] {
        Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(area)
    }

    fn empty_message(&self) -> String {
        if self.total == 0 {
            "No saved queries yet. Press Ctrl+S in the editor to save one.".to_string()
        } else {
            format!("No saved queries match \"{}\"", self.search)
        }
    }
}

impl Widget for SavedList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [search_area, list_area, hint_area] = Self::layout(area);

        Paragraph::new(Line::from(vec![
            Span::styled("Search: ", self.theme.heading()),
            Span::styled(self.search, Style::default().fg(self.theme.text)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(self.theme.border(true)),
        )
        .render(search_area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border(false))
            .title(" Saved Queries ");

        if self.entries.is_empty() {
            Paragraph::new(Span::styled(self.empty_message(), self.theme.muted()))
                .block(block)
                .render(list_area, buf);
        } else {
            let items: Vec<ListItem> = self
                .entries
                .iter()
                .map(|(_, query)| {
                    ListItem::new(vec![
                        Line::from(vec![
                            Span::styled(query.name.clone(), self.theme.heading()),
                            Span::styled(
                                format!("  {}", format_timestamp(&query.timestamp)),
                                self.theme.muted(),
                            ),
                        ]),
                        Line::from(Span::styled(
                            format!("  {}", query.query),
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

        let hint = Line::from(Span::styled(
            "[Enter] Load  [Del] Delete  [Esc] Clear search",
            self.theme.muted(),
        ));
        if hint_area.height > 0 {
            buf.set_line(hint_area.x, hint_area.y, &hint, hint_area.width);
        }
    }
}
