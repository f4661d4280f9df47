//! Headless mode for scripted testing and automation.
//!
//! Runs the UI against an off-screen terminal, feeding it scripted events
//! and capturing the rendered screen for verification.

mod events;
mod output;

pub use events::{parse_size, Assertion, Event, EventParser};
pub use output::{HeadlessOutput, OutputFormat, ScreenRenderer};

use crate::app::Session;
use crate::cli::Cli;
use crate::config::Config;
use crate::error::{PlaygroundError, Result};
use crate::persistence::{FileStore, KeyValueStore, MemoryStore};
use crate::tui::app::App;
use crate::tui::ui;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Configuration for headless mode execution.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    pub width: u16,
    pub height: u16,
    pub output_format: OutputFormat,
    /// Stop at the first failed assertion.
    pub fail_fast: bool,
    /// Path to write output (None = stdout).
    pub output_file: Option<PathBuf>,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            width: 120,
            height: 40,
            output_format: OutputFormat::Text,
            fail_fast: false,
            output_file: None,
        }
    }
}

impl HeadlessConfig {
    /// Creates a HeadlessConfig from CLI arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let (width, height) = cli.parse_screen_size()?;
        Ok(Self {
            width,
            height,
            output_format: cli.parse_output_format()?,
            fail_fast: cli.fail_fast,
            output_file: cli.output_file.clone(),
        })
    }
}

/// Result of headless execution.
#[derive(Debug)]
pub struct HeadlessResult {
    /// Final screen content as text.
    pub screen: String,
    pub events_executed: usize,
    pub duration: Duration,
    pub assertions_passed: usize,
    /// The failed assertions, as written in the script.
    pub failures: Vec<String>,
    /// Application state after the last event.
    pub state: HeadlessState,
    /// One capture per executed event, plus the initial screen.
    pub frames: Vec<Frame>,
}

/// Snapshot of application state, queried by `assert:state:` and printed as JSON.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HeadlessState {
    pub tab: String,
    pub query_text: String,
    pub loading: bool,
    pub page: usize,
    pub total_pages: usize,
    pub row_count: usize,
    pub history_count: usize,
    pub saved_count: usize,
    pub dark_mode: bool,
    pub running: bool,
    pub upload_error: Option<String>,
    pub toast: Option<String>,
}

impl HeadlessState {
    fn from_app(app: &App) -> Self {
        let view = app.current_view();
        Self {
            tab: format!("{:?}", app.tab),
            query_text: app.query.text.clone(),
            loading: app.loading,
            page: view.as_ref().map_or(0, |v| v.current_page),
            total_pages: view.as_ref().map_or(0, |v| v.total_pages),
            row_count: app.result.as_ref().map_or(0, |r| r.row_count()),
            history_count: app.history.len(),
            saved_count: app.saved_queries.len(),
            dark_mode: app.dark_mode,
            running: app.running,
            upload_error: app.upload.error.clone(),
            toast: app.toast_message().map(String::from),
        }
    }

    /// Looks up a field by name as text.
    pub fn field(&self, name: &str) -> Option<String> {
        let value = match name {
            "tab" => self.tab.clone(),
            "query_text" | "query" => self.query_text.clone(),
            "loading" => self.loading.to_string(),
            "page" => self.page.to_string(),
            "total_pages" => self.total_pages.to_string(),
            "row_count" => self.row_count.to_string(),
            "history_count" => self.history_count.to_string(),
            "saved_count" => self.saved_count.to_string(),
            "dark_mode" => self.dark_mode.to_string(),
            "running" => self.running.to_string(),
            "upload_error" => self.upload_error.clone().unwrap_or_default(),
            "toast" => self.toast.clone().unwrap_or_default(),
            _ => return None,
        };
        Some(value)
    }
}

/// A captured frame (screen state after an event).
#[derive(Debug, Clone)]
pub struct Frame {
    /// Frame number (0 = initial state).
    pub number: usize,
    /// Event that produced this frame (None for initial).
    pub event: Option<String>,
    pub screen: String,
}

/// Runs the UI in headless mode.
pub struct HeadlessRunner {
    config: HeadlessConfig,
    terminal: Terminal<TestBackend>,
    app: App,
    session: Session,
    events: Vec<Event>,
    frames: Vec<Frame>,
}

impl HeadlessRunner {
    /// Creates a runner; saved state is restored from the session's store.
    pub fn new(config: HeadlessConfig, session: Session, mut app: App) -> Result<Self> {
        let terminal = Terminal::new(TestBackend::new(config.width, config.height))
            .map_err(|e| PlaygroundError::internal(format!("Failed to create test terminal: {e}")))?;
        session.restore(&mut app);

        Ok(Self {
            config,
            terminal,
            app,
            session,
            events: Vec::new(),
            frames: Vec::new(),
        })
    }

    /// Loads events from a string (comma-separated or newline-separated).
    pub fn load_events(&mut self, input: &str) -> Result<()> {
        self.events = EventParser::new().parse_all(input)?;
        Ok(())
    }

    /// Loads events from a script file, or stdin when `path` is "-".
    pub fn load_script(&mut self, path: &str) -> Result<()> {
        let content = if path == "-" {
            std::io::read_to_string(std::io::stdin())
                .map_err(|e| PlaygroundError::internal(format!("Failed to read stdin: {e}")))?
        } else {
            std::fs::read_to_string(path)
                .map_err(|e| PlaygroundError::config(format!("Failed to read script {path}: {e}")))?
        };
        self.load_events(&content)
    }

    /// Runs every loaded event and returns the result.
    pub async fn run(mut self) -> Result<HeadlessResult> {
        let start_time = Instant::now();
        self.capture_frame(None)?;

        let events = std::mem::take(&mut self.events);
        let mut events_executed = 0;
        let mut assertions_passed = 0;
        let mut failures = Vec::new();

        for event in events {
            let event_str = event.to_string();
            debug!("Headless event {event_str}");

            match &event {
                Event::Key(key) => self.press(*key).await,
                Event::Type(text) => {
                    for c in text.chars() {
                        self.press(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
                            .await;
                    }
                }
                Event::Wait(duration) => {
                    tokio::time::sleep(*duration).await;
                    self.app.clear_expired_toast();
                }
                Event::Resize(w, h) => {
                    self.terminal
                        .resize(Rect::new(0, 0, *w, *h))
                        .map_err(|e| PlaygroundError::internal(format!("Resize failed: {e}")))?;
                }
                Event::Assert(assertion) => {
                    self.draw()?;
                    let screen = ScreenRenderer::render(self.terminal.backend().buffer());
                    if assertion.check(&screen, &HeadlessState::from_app(&self.app)) {
                        assertions_passed += 1;
                    } else {
                        failures.push(event_str.clone());
                        if self.config.fail_fast {
                            events_executed += 1;
                            break;
                        }
                    }
                }
            }

            events_executed += 1;
            self.capture_frame(Some(event_str))?;

            if !self.app.running {
                break;
            }
        }

        self.draw()?;
        let screen = ScreenRenderer::render(self.terminal.backend().buffer());

        Ok(HeadlessResult {
            screen,
            events_executed,
            duration: start_time.elapsed(),
            assertions_passed,
            failures,
            state: HeadlessState::from_app(&self.app),
            frames: self.frames,
        })
    }

    /// Sends a key through the app and carries out what it asks for.
    async fn press(&mut self, key: KeyEvent) {
        let commands = self.app.handle_event(crate::tui::Event::Key(key));
        self.session.dispatch(&mut self.app, commands).await;
    }

    fn draw(&mut self) -> Result<()> {
        let app = &self.app;
        self.terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| PlaygroundError::internal(format!("Failed to render: {e}")))?;
        Ok(())
    }

    fn capture_frame(&mut self, event: Option<String>) -> Result<()> {
        self.draw()?;
        if self.config.output_format != OutputFormat::Frames {
            return Ok(());
        }
        let screen = ScreenRenderer::render(self.terminal.backend().buffer());
        self.frames.push(Frame {
            number: self.frames.len(),
            event,
            screen,
        });
        Ok(())
    }
}

/// Runs headless mode from CLI arguments; returns the process exit code.
///
/// Queries complete without simulated latency unless `--latency-ms` is given.
/// State is kept in memory unless `--state-file` is given.
pub async fn run_headless(cli: &Cli, config: &Config) -> Result<i32> {
    cli.validate_headless()?;
    let headless = HeadlessConfig::from_cli(cli)?;

    let store: Arc<dyn KeyValueStore> = match &cli.state_file {
        Some(path) => Arc::new(FileStore::open(path)?),
        None => Arc::new(MemoryStore::new()),
    };
    let latency = Duration::from_millis(cli.latency_ms.unwrap_or(0));
    let session = Session::with_store(store, latency, cli.seed);
    let app = App::new(config.execution.page_size, config.execution.history_limit);

    let mut runner = HeadlessRunner::new(headless.clone(), session, app)?;
    if let Some(events) = &cli.events {
        runner.load_events(events)?;
    } else if let Some(script) = &cli.script {
        runner.load_script(script)?;
    }

    let result = runner.run().await?;
    info!(
        "Headless run finished: {} events, {} failed assertions",
        result.events_executed,
        result.failures.len()
    );

    let output = HeadlessOutput::new(headless.output_format).format(&result);
    match &headless.output_file {
        Some(path) => std::fs::write(path, &output).map_err(|e| {
            PlaygroundError::internal(format!("Failed to write {}: {e}", path.display()))
        })?,
        None => print!("{output}"),
    }

    Ok(if result.failures.is_empty() { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn runner(events: &str) -> HeadlessRunner {
        let config = HeadlessConfig {
            width: 140,
            height: 32,
            ..HeadlessConfig::default()
        };
        let session = Session::in_memory(Duration::ZERO, Some(7));
        let mut runner = HeadlessRunner::new(config, session, App::default()).unwrap();
        runner.load_events(events).unwrap();
        runner
    }

    #[tokio::test]
    async fn test_predefined_query_shows_first_page() {
        let result = runner("key:f1,assert:contains:Page 1 of 3 (showing 10 of 25 items)")
            .run()
            .await
            .unwrap();

        assert!(result.failures.is_empty(), "{:?}", result.failures);
        assert_eq!(result.state.page, 1);
        assert_eq!(result.state.total_pages, 3);
        assert_eq!(result.state.history_count, 1);
    }

    #[tokio::test]
    async fn test_typed_query_executes_on_enter() {
        let result = runner("type:SELECT * FROM orders,key:enter,key:pagedown,key:pagedown")
            .run()
            .await
            .unwrap();

        assert_eq!(result.state.query_text, "SELECT * FROM orders");
        assert_eq!(result.state.page, 3);
        assert!(result.screen.contains("Page 3 of 3 (showing 5 of 25 items)"));
    }

    #[tokio::test]
    async fn test_failed_assertion_is_reported() {
        let result = runner("assert:contains:no such text,assert:state:tab=Editor")
            .run()
            .await
            .unwrap();

        assert_eq!(result.assertions_passed, 1);
        assert_eq!(result.failures, vec!["assert:contains:no such text".to_string()]);
    }

    #[tokio::test]
    async fn test_fail_fast_stops_early() {
        let mut runner = runner("assert:contains:missing,key:tab");
        runner.config.fail_fast = true;
        let result = runner.run().await.unwrap();

        assert_eq!(result.events_executed, 1);
        assert_eq!(result.state.tab, "Editor");
    }

    #[tokio::test]
    async fn test_save_then_search() {
        let script = "type:SELECT * FROM products\n\
                      key:ctrl+s\n\
                      type:Products\n\
                      key:enter\n\
                      key:tab\n\
                      type:prod\n\
                      assert:state:saved_count=1\n\
                      assert:contains:Products";
        let result = runner(script).run().await.unwrap();

        assert!(result.failures.is_empty(), "{:?}", result.failures);
        assert_eq!(result.state.tab, "Saved");
    }

    #[tokio::test]
    async fn test_quit_stops_processing() {
        let result = runner("key:ctrl+q,key:tab").run().await.unwrap();
        assert!(!result.state.running);
        assert_eq!(result.events_executed, 1);
    }

    #[test]
    fn test_state_field_lookup() {
        let state = HeadlessState {
            tab: "History".to_string(),
            history_count: 3,
            ..HeadlessState::default()
        };
        assert_eq!(state.field("tab").as_deref(), Some("History"));
        assert_eq!(state.field("history_count").as_deref(), Some("3"));
        assert_eq!(state.field("bogus"), None);
    }
}
