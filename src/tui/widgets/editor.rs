//! Query editor panel.
//!
//! Stacks the predefined-query picker, the SQL editor, the sample snippets
//! and the action hints.

use crate::catalog::{PREDEFINED_QUERIES, SAMPLE_QUERIES};
use crate::tui::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// Rows taken by the picker, including borders.
const PICKER_HEIGHT: u16 = PREDEFINED_QUERIES.len() as u16 + 2;

/// Rows taken by the samples box, including borders.
const SAMPLES_HEIGHT: u16 = SAMPLE_QUERIES.len() as u16 + 2;

pub struct EditorPanel<'a> {
    query: &'a str,
    predefined_selected: Option<usize>,
    loading: bool,
    theme: Theme,
}

impl<'a> EditorPanel<'a> {
    pub fn new(
        query: &'a str,
        predefined_selected: Option<usize>,
        loading: bool,
        theme: Theme,
    ) -> Self {
        Self {
            query,
            predefined_selected,
            loading,
            theme,
        }
    }

    /// Splits the panel into picker, editor, samples and actions areas.
    pub fn layout(area: Rect) -> [Rect; 4] {
        Layout::vertical([
            Constraint::Length(PICKER_HEIGHT),
            Constraint::Min(3),
            Constraint::Length(SAMPLES_HEIGHT),
            Constraint::Length(1),
        ])
        .areas(area)
    }

    /// Inner area of the SQL editor box, used to place the cursor.
    pub fn editor_inner(area: Rect) -> Rect {
        let [_, editor, _, _] = Self::layout(area);
        Block::default().borders(Borders::ALL).inner(editor)
    }

    fn render_picker(&self, area: Rect, buf: &mut Buffer) {
        let lines: Vec<Line> = PREDEFINED_QUERIES
            .iter()
            .enumerate()
            .map(|(i, query)| {
                let style = if self.predefined_selected == Some(i) {
                    self.theme.selected()
                } else {
                    Style::default().fg(self.theme.text)
                };
                Line::from(vec![
                    Span::styled(format!("F{} ", i + 1), self.theme.heading()),
                    Span::styled(query.label(), style),
                ])
            })
            .collect();

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.border(false))
                    .title(" Predefined Queries "),
            )
            .render(area, buf);
    }

    fn render_editor(&self, area: Rect, buf: &mut Buffer) {
        let text_style = if self.loading {
            self.theme.muted()
        } else {
            Style::default().fg(self.theme.text)
        };

        let content = if self.query.is_empty() {
            Line::from(Span::styled(
                "Type a SQL query, then press Enter",
                self.theme.muted().add_modifier(Modifier::ITALIC),
            ))
        } else {
            Line::from(Span::styled(self.query, text_style))
        };

        Paragraph::new(content)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.border(!self.loading))
                    .title(" SQL Query "),
            )
            .render(area, buf);
    }

    fn render_samples(&self, area: Rect, buf: &mut Buffer) {
        let lines: Vec<Line> = SAMPLE_QUERIES
            .iter()
            .enumerate()
            .map(|(i, sample)| {
                Line::from(vec![
                    Span::styled(format!("F{} ", i + 6), self.theme.heading()),
                    Span::styled(*sample, self.theme.muted()),
                ])
            })
            .collect();

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.border(false))
                    .title(" Sample Queries "),
            )
            .render(area, buf);
    }

    fn render_actions(&self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let key_style = if self.loading {
            self.theme.muted()
        } else {
            self.theme.heading()
        };
        let execute = if self.loading { "Executing..." } else { "Execute" };

        let line = Line::from(vec![
            Span::styled("[Enter] ", key_style),
            Span::styled(execute, Style::default().fg(self.theme.text)),
            Span::raw("  "),
            Span::styled("[Ctrl+S] ", key_style),
            Span::styled("Save", Style::default().fg(self.theme.text)),
            Span::raw("  "),
            Span::styled("[Ctrl+L] ", key_style),
            Span::styled("Clear", Style::default().fg(self.theme.text)),
        ]);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

impl Widget for EditorPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [picker, editor, samples, actions] = Self::layout(area);
        self.render_picker(picker, buf);
        self.render_editor(editor, buf);
        self.render_samples(samples, buf);
        self.render_actions(actions, buf);
    }
}
