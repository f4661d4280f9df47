//! Spinner shown while a query executes.

use std::time::Instant;

/// Braille spinner frames.
const BRAILLE_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Animation speed in milliseconds per frame.
const FRAME_DURATION_MS: u128 = 100;

/// Busy text shown while an execution is in flight.
pub const EXECUTING_LABEL: &str = "Executing query...";

/// Spinner state for animated indicators.
#[derive(Debug, Clone)]
pub struct Spinner {
    /// When the spinner started.
    start_time: Instant,
    /// Label to display with the spinner.
    label: String,
}

impl Spinner {
    /// Creates a new spinner with the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            start_time: Instant::now(),
            label: label.into(),
        }
    }

    /// Creates a new query execution spinner.
    pub fn executing() -> Self {
        Self::new(EXECUTING_LABEL)
    }

    /// Returns the current frame of the animation.
    pub fn frame(&self) -> &'static str {
        let elapsed_ms = self.start_time.elapsed().as_millis();
        let frame_index = (elapsed_ms / FRAME_DURATION_MS) as usize;
        BRAILLE_FRAMES[frame_index % BRAILLE_FRAMES.len()]
    }

    /// Returns the display string for the spinner.
    pub fn display(&self) -> String {
        format!("{} {}", self.frame(), self.label)
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}
