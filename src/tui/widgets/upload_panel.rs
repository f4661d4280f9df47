//! CSV upload panel.

use crate::tui::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

pub struct UploadPanel<'a> {
    path: &'a str,
    error: Option<&'a str>,
    loaded_file: Option<&'a str>,
    theme: Theme,
}

impl<'a> UploadPanel<'a> {
    pub fn new(
        path: &'a str,
        error: Option<&'a str>,
        loaded_file: Option<&'a str>,
        theme: Theme,
    ) -> Self {
        Self {
            path,
            error,
            loaded_file,
            theme,
        }
    }

    /// Splits the panel into instructions, path input and status areas.
    pub fn layout(area: Rect) -> [Rect; 3] {
        Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .areas(area)
    }

    /// Inner area of the path input, used to place the cursor.
    pub fn input_inner(area: Rect) -> Rect {
        let [_, input, _] = Self::layout(area);
        Block::default().borders(Borders::ALL).inner(input)
    }
}

impl Widget for UploadPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [intro_area, input_area, status_area] = Self::layout(area);

        Paragraph::new(vec![
            Line::from(Span::styled("Upload a CSV file", self.theme.heading())),
            Line::from(Span::styled(
                "The first row is used as column names.",
                self.theme.muted(),
            )),
        ])
        .render(intro_area, buf);

        Paragraph::new(Span::styled(self.path, Style::default().fg(self.theme.text)))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.border(true))
                    .title(" File path "),
            )
            .render(input_area, buf);

        let mut status = vec![Line::from(Span::styled(
            "[Enter] Upload  [Esc] Clear",
            self.theme.muted(),
        ))];
        if let Some(error) = self.error {
            status.push(Line::from(Span::styled(
                error.to_string(),
                Style::default().fg(self.theme.error),
            )));
        }
        if let Some(file) = self.loaded_file {
            status.push(Line::from(Span::styled(
                format!("Showing data from {file}"),
                Style::default().fg(self.theme.success),
            )));
        }

        Paragraph::new(status)
            .wrap(Wrap { trim: true })
            .render(status_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shows_error_line() {
        let area = Rect::new(0, 0, 60, 10);
        let mut buf = Buffer::empty(area);
        UploadPanel::new("notes.txt", Some("Please upload a CSV file"), None, Theme::LIGHT)
            .render(area, &mut buf);

        let text: String = (0..10)
            .map(|y| (0..60).map(|x| buf[(x, y)].symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        assert!(text.contains("notes.txt"));
        assert!(text.contains("Please upload a CSV file"));
    }
}
