//! UI rendering for the TUI.
//!
//! Defines the layout and renders all UI components.

use super::app::{App, Tab};
use super::theme::Theme;
use super::widgets::{
    editor::EditorPanel, header::Header, help::HelpBar, history_list::HistoryList, prompt,
    saved_list::SavedList, spinner::EXECUTING_LABEL, table::ResultTable, tabs::TabBar,
    toast::Toast, upload_panel::UploadPanel,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Empty-state text of the results panel.
pub const EMPTY_RESULTS: &str = "Run a query to see results here";

/// Renders the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    let theme = Theme::for_mode(app.dark_mode);
    let area = frame.area();

    frame.render_widget(Block::default().style(theme.base()), area);

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(1), // Tabs
            Constraint::Min(3),    // Content
            Constraint::Length(1), // Key hints
        ])
        .split(area);

    let content_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(main_layout[2]);

    frame.render_widget(
        Header::new(app.spinner.as_ref(), app.dark_mode, theme),
        main_layout[0],
    );
    frame.render_widget(
        TabBar::new(app.tab, app.saved_queries.len(), app.history.len(), theme),
        main_layout[1],
    );
    render_left_panel(frame, content_layout[0], app, theme);
    render_results(frame, content_layout[1], app, theme);
    frame.render_widget(HelpBar::new(app.tab, theme), main_layout[3]);

    if let Some(message) = app.toast_message() {
        frame.render_widget(Toast::new(message, theme), Toast::area(area));
    }

    if let Some(name) = &app.save_prompt {
        prompt::render_save_prompt(frame, &name.text, name.cursor, &app.query.text, theme);
    }
}

/// Renders the panel of the active tab and positions the cursor.
fn render_left_panel(frame: &mut Frame, area: Rect, app: &App, theme: Theme) {
    match app.tab {
        Tab::Editor => {
            frame.render_widget(
                EditorPanel::new(
                    &app.query.text,
                    app.predefined_selected,
                    app.loading,
                    theme,
                ),
                area,
            );
            if !app.loading && app.save_prompt.is_none() {
                let inner = EditorPanel::editor_inner(area);
                if let Some(position) = wrapped_cursor(inner, app.query.cursor) {
                    frame.set_cursor_position(position);
                }
            }
        }
        Tab::Saved => {
            let entries = app.filtered_saved();
            frame.render_widget(
                SavedList::new(
                    &entries,
                    &app.saved_search.text,
                    app.saved_selected,
                    app.saved_queries.len(),
                    theme,
                ),
                area,
            );
        }
        Tab::History => {
            frame.render_widget(
                HistoryList::new(&app.history, app.history_selected, theme),
                area,
            );
        }
        Tab::Upload => {
            frame.render_widget(
                UploadPanel::new(
                    &app.upload.path.text,
                    app.upload.error.as_deref(),
                    app.upload.loaded_file.as_deref(),
                    theme,
                ),
                area,
            );
            if app.save_prompt.is_none() {
                let inner = UploadPanel::input_inner(area);
                if let Some(position) = wrapped_cursor(inner, app.upload.path.cursor) {
                    frame.set_cursor_position(position);
                }
            }
        }
    }
}

/// Cursor position inside a wrapped text box, if it is visible.
fn wrapped_cursor(inner: Rect, cursor: usize) -> Option<(u16, u16)> {
    if inner.width == 0 || inner.height == 0 {
        return None;
    }
    let width = inner.width as usize;
    let row = cursor / width;
    let col = cursor % width;
    if row >= inner.height as usize {
        return None;
    }
    Some((inner.x + col as u16, inner.y + row as u16))
}

/// Renders the results panel: busy text, empty state or the current page.
fn render_results(frame: &mut Frame, area: Rect, app: &App, theme: Theme) {
    let title = match &app.upload.loaded_file {
        Some(file) => format!(" Results: {file} "),
        None => " Results ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border(false))
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.loading {
        let busy = Paragraph::new(Line::from(Span::styled(
            EXECUTING_LABEL,
            theme.heading().add_modifier(Modifier::ITALIC),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(busy, centered_line(inner));
        return;
    }

    match (&app.result, app.current_view()) {
        (Some(result), Some(view)) if !result.is_empty() => {
            frame.render_widget(
                ResultTable::new(view, theme).execution_time(result.execution_time),
                inner,
            );
        }
        (Some(_), _) => {
            let empty = Paragraph::new(Span::styled("No rows returned", theme.muted()))
                .alignment(Alignment::Center);
            frame.render_widget(empty, centered_line(inner));
        }
        (None, _) => {
            let empty = Paragraph::new(Span::styled(EMPTY_RESULTS, theme.muted()))
                .alignment(Alignment::Center);
            frame.render_widget(empty, centered_line(inner));
        }
    }
}

/// The middle row of `area`.
fn centered_line(area: Rect) -> Rect {
    Rect::new(area.x, area.y + area.height / 2, area.width, area.height.min(1))
}
