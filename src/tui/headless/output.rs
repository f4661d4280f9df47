//! Output formatting for headless mode.

use super::{HeadlessResult, HeadlessState};
use ratatui::buffer::Buffer;
use serde::Serialize;

/// Output format for headless mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// The final screen as plain text.
    #[default]
    Text,
    /// Screen, state snapshot and assertion summary as JSON.
    Json,
    /// Every captured frame, one per executed event.
    Frames,
}

/// Renders a ratatui buffer to a string.
pub struct ScreenRenderer;

impl ScreenRenderer {
    /// Renders a buffer to text with trailing blanks and empty bottom rows removed.
    pub fn render(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut lines: Vec<String> = (area.top()..area.bottom())
            .map(|y| {
                let line: String = (area.left()..area.right())
                    .map(|x| buffer[(x, y)].symbol())
                    .collect();
                line.trim_end().to_string()
            })
            .collect();

        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }

        format!("{}\n", lines.join("\n"))
    }
}

#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    screen: &'a str,
    screen_lines: Vec<&'a str>,
    events_executed: usize,
    duration_ms: u64,
    assertions: AssertionSummary<'a>,
    state: &'a HeadlessState,
}

#[derive(Debug, Serialize)]
struct AssertionSummary<'a> {
    passed: usize,
    failed: usize,
    failures: &'a [String],
}

/// Formats headless execution results.
pub struct HeadlessOutput {
    format: OutputFormat,
}

impl HeadlessOutput {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the result according to the configured format.
    pub fn format(&self, result: &HeadlessResult) -> String {
        match self.format {
            OutputFormat::Text => Self::format_text(result),
            OutputFormat::Json => Self::format_json(result),
            OutputFormat::Frames => Self::format_frames(result),
        }
    }

    fn format_text(result: &HeadlessResult) -> String {
        format!(
            "{}\nEvents: {} executed in {}ms{}\n{}",
            result.screen,
            result.events_executed,
            result.duration.as_millis(),
            Self::assertion_suffix(result),
            Self::failure_lines(result),
        )
    }

    fn format_json(result: &HeadlessResult) -> String {
        let output = JsonOutput {
            screen: &result.screen,
            screen_lines: result.screen.lines().collect(),
            events_executed: result.events_executed,
            duration_ms: result.duration.as_millis() as u64,
            assertions: AssertionSummary {
                passed: result.assertions_passed,
                failed: result.failures.len(),
                failures: &result.failures,
            },
            state: &result.state,
        };

        serde_json::to_string_pretty(&output)
            .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize: {e}\"}}"))
    }

    fn format_frames(result: &HeadlessResult) -> String {
        let frames: String = result
            .frames
            .iter()
            .map(|frame| {
                format!(
                    "=== FRAME {} ({}) ===\n{}\n",
                    frame.number,
                    frame.event.as_deref().unwrap_or("initial"),
                    frame.screen
                )
            })
            .collect();

        format!(
            "{frames}Total: {} frames, {} events executed in {}ms{}\n{}",
            result.frames.len(),
            result.events_executed,
            result.duration.as_millis(),
            Self::assertion_suffix(result),
            Self::failure_lines(result),
        )
    }

    fn assertion_suffix(result: &HeadlessResult) -> String {
        if result.assertions_passed == 0 && result.failures.is_empty() {
            return String::new();
        }
        format!(
            " | Assertions: {} passed, {} failed",
            result.assertions_passed,
            result.failures.len()
        )
    }

    fn failure_lines(result: &HeadlessResult) -> String {
        result
            .failures
            .iter()
            .map(|failure| format!("FAILED {failure}\n"))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::headless::Frame;
    use ratatui::layout::Rect;
    use std::time::Duration;

    fn make_test_result() -> HeadlessResult {
        HeadlessResult {
            screen: "SQL Query Runner\nPage 1 of 3\n".to_string(),
            events_executed: 3,
            duration: Duration::from_millis(150),
            assertions_passed: 2,
            failures: vec!["assert:contains:Orders".to_string()],
            state: HeadlessState {
                tab: "Editor".to_string(),
                query_text: "SELECT 1".to_string(),
                page: 1,
                total_pages: 3,
                row_count: 25,
                history_count: 1,
                ..HeadlessState::default()
            },
            frames: vec![
                Frame {
                    number: 0,
                    event: None,
                    screen: "Initial\n".to_string(),
                },
                Frame {
                    number: 1,
                    event: Some("key:f1".to_string()),
                    screen: "After F1\n".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_render_trims_blank_cells() {
        let mut buffer = Buffer::empty(Rect::new(0, 0, 8, 3));
        buffer.set_string(0, 0, "Page 1", ratatui::style::Style::default());
        assert_eq!(ScreenRenderer::render(&buffer), "Page 1\n");
    }

    #[test]
    fn test_text_output() {
        let text = HeadlessOutput::new(OutputFormat::Text).format(&make_test_result());
        assert!(text.contains("Page 1 of 3"));
        assert!(text.contains("Events: 3 executed"));
        assert!(text.contains("Assertions: 2 passed, 1 failed"));
        assert!(text.contains("FAILED assert:contains:Orders"));
    }

    #[test]
    fn test_json_output() {
        let json = HeadlessOutput::new(OutputFormat::Json).format(&make_test_result());
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["events_executed"], 3);
        assert_eq!(parsed["state"]["tab"], "Editor");
        assert_eq!(parsed["state"]["total_pages"], 3);
        assert_eq!(parsed["assertions"]["failed"], 1);
        assert_eq!(parsed["screen_lines"][1], "Page 1 of 3");
    }

    #[test]
    fn test_frames_output() {
        let frames = HeadlessOutput::new(OutputFormat::Frames).format(&make_test_result());
        assert!(frames.contains("=== FRAME 0 (initial) ==="));
        assert!(frames.contains("=== FRAME 1 (key:f1) ==="));
        assert!(frames.contains("Total: 2 frames"));
    }
}
