//! Name prompt shown when saving a query.
//!
//! Displays a modal dialog with the query being saved and a name field.

use crate::tui::theme::Theme;
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Most query lines shown in the dialog before eliding.
const MAX_QUERY_LINES: usize = 4;

/// Renders the save dialog and places the cursor in the name field.
pub fn render_save_prompt(frame: &mut Frame, name: &str, cursor: usize, query: &str, theme: Theme) {
    let area = frame.area();

    let dialog_width = (area.width as f32 * 0.6).clamp(30.0, 80.0) as u16;
    let dialog_width = dialog_width.min(area.width);
    let query_lines = wrap_sql(query, dialog_width.saturating_sub(6) as usize);
    let shown = query_lines.len().min(MAX_QUERY_LINES);
    // title spacing + query + spacing + name + spacing + hints + borders
    let dialog_height = ((1 + shown + 1 + 1 + 1 + 1 + 2) as u16).min(area.height);

    let dialog_area = center_rect(dialog_width, dialog_height, area);
    frame.render_widget(Clear, dialog_area);

    let mut lines = vec![Line::from(Span::styled(
        "Save this query as:",
        theme.heading(),
    ))];
    for sql_line in query_lines.iter().take(MAX_QUERY_LINES) {
        lines.push(Line::from(Span::styled(
            format!("  {sql_line}"),
            theme.muted().add_modifier(Modifier::ITALIC),
        )));
    }
    lines.push(Line::from(""));

    let name_line_index = lines.len();
    lines.push(Line::from(vec![
        Span::styled("Name: ", theme.heading()),
        Span::styled(name.to_string(), Style::default().fg(theme.text)),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("[Enter]", theme.heading()),
        Span::raw(" Save  "),
        Span::styled("[Esc]", Style::default().fg(theme.error).add_modifier(Modifier::BOLD)),
        Span::raw(" Cancel"),
    ]));

    let block = Block::default()
        .title(" Save Query ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(theme.border(true))
        .style(theme.base());

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, dialog_area);

    // Border (1) + "Name: " (6)
    let cursor_x = dialog_area.x + 1 + 6 + cursor as u16;
    let cursor_y = dialog_area.y + 1 + name_line_index as u16;
    if cursor_x < dialog_area.right() && cursor_y < dialog_area.bottom() {
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

/// Wraps SQL text to fit within the given width.
fn wrap_sql(sql: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let sql = sql.trim();

    for line in sql.lines() {
        if line.chars().count() <= max_width {
            lines.push(line.to_string());
            continue;
        }
        let mut current_line = String::new();
        for word in line.split_whitespace() {
            if current_line.is_empty() {
                current_line = word.to_string();
            } else if current_line.chars().count() + 1 + word.chars().count() <= max_width {
                current_line.push(' ');
                current_line.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current_line));
                current_line = word.to_string();
            }
        }
        if !current_line.is_empty() {
            lines.push(current_line);
        }
    }

    if lines.is_empty() {
        lines.push(sql.to_string());
    }

    lines
}

/// Centers a rectangle of the given size within the parent area.
pub fn center_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([Constraint::Length(width)]).flex(Flex::Center);
    let vertical = Layout::vertical([Constraint::Length(height)]).flex(Flex::Center);

    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn test_wrap_sql_short() {
        let sql = "SELECT * FROM users";
        assert_eq!(wrap_sql(sql, 50), vec![sql.to_string()]);
    }

    #[test]
    fn test_wrap_sql_long() {
        let sql = "SELECT id, name, email, created_at FROM users WHERE active = true";
        assert!(wrap_sql(sql, 30).len() > 1);
    }

    #[test]
    fn test_center_rect() {
        let centered = center_rect(40, 10, Rect::new(0, 0, 100, 50));
        assert!(centered.x >= 25 && centered.x <= 35);
        assert!(centered.y >= 15 && centered.y <= 25);
        assert_eq!(centered.width, 40);
        assert_eq!(centered.height, 10);
    }

    #[test]
    fn test_renders_name_field() {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal
            .draw(|frame| {
                render_save_prompt(frame, "Monthly", 7, "SELECT * FROM orders", Theme::LIGHT)
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = (0..24)
            .map(|y| (0..80).map(|x| buffer[(x, y)].symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        assert!(text.contains("Save Query"));
        assert!(text.contains("Name: Monthly"));
        assert!(text.contains("SELECT * FROM orders"));
    }
}
