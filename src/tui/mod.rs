//! Terminal User Interface for the SQL playground.
//!
//! Provides the main TUI application loop using ratatui and crossterm.

pub mod app;
mod events;
pub mod headless;
pub mod theme;
pub mod ui;
pub mod widgets;

pub use app::App;
pub use events::{Event, EventHandler};

use crate::app::{Deferred, Session};
use crate::config::Config;
use crate::db::QueryResult;
use crate::error::{PlaygroundError, Result};
use crate::upload::{CsvUpload, UploadError};
use self::app::PendingExecution;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Messages sent from background tasks to the main loop.
#[derive(Debug)]
pub enum AsyncMessage {
    /// An execution finished.
    Executed {
        pending: PendingExecution,
        outcome: Result<QueryResult>,
    },
    /// A CSV file was read, or failed to.
    Uploaded {
        path: PathBuf,
        outcome: std::result::Result<CsvUpload, UploadError>,
    },
}

/// The main TUI application runner.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_handler: EventHandler,
}

impl Tui {
    /// Creates a new TUI instance, initializing the terminal.
    pub fn new() -> Result<Self> {
        let terminal = Self::setup_terminal()?;
        Ok(Self {
            terminal,
            event_handler: EventHandler::new(),
        })
    }

    /// Sets up the terminal for TUI rendering.
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()
            .map_err(|e| PlaygroundError::internal(format!("Failed to enable raw mode: {e}")))?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|e| {
            PlaygroundError::internal(format!("Failed to enter alternate screen: {e}"))
        })?;

        let backend = CrosstermBackend::new(stdout);
        Terminal::new(backend)
            .map_err(|e| PlaygroundError::internal(format!("Failed to create terminal: {e}")))
    }

    /// Restores the terminal to its original state.
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()
            .map_err(|e| PlaygroundError::internal(format!("Failed to disable raw mode: {e}")))?;

        execute!(self.terminal.backend_mut(), LeaveAlternateScreen).map_err(|e| {
            PlaygroundError::internal(format!("Failed to leave alternate screen: {e}"))
        })?;

        self.terminal
            .show_cursor()
            .map_err(|e| PlaygroundError::internal(format!("Failed to show cursor: {e}")))?;

        Ok(())
    }

    /// Runs the main event loop against a session.
    pub async fn run(&mut self, session: Session, mut app_state: App) -> Result<()> {
        // Restore the terminal before the panic message is printed.
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(panic_info);
        }));

        let (tx, mut rx) = mpsc::channel::<AsyncMessage>(8);
        let mut events = self.event_handler.spawn();
        let result = self
            .run_event_loop(&session, &mut app_state, tx, &mut rx, &mut events)
            .await;

        let _ = panic::take_hook();
        result
    }

    /// The main event loop, separated for cleaner error handling.
    async fn run_event_loop(
        &mut self,
        session: &Session,
        app_state: &mut App,
        tx: mpsc::Sender<AsyncMessage>,
        rx: &mut mpsc::Receiver<AsyncMessage>,
        events: &mut mpsc::Receiver<Result<Event>>,
    ) -> Result<()> {
        loop {
            app_state.clear_expired_toast();

            self.terminal
                .draw(|frame| ui::render(frame, app_state))
                .map_err(|e| PlaygroundError::internal(format!("Failed to draw: {e}")))?;

            if !app_state.running {
                break;
            }

            tokio::select! {
                event = events.recv() => {
                    let event = event.ok_or_else(|| {
                        PlaygroundError::internal("Terminal event reader stopped")
                    })??;
                    for command in app_state.handle_event(event) {
                        match session.perform(app_state, command) {
                            Some(Deferred::Execute(pending)) => {
                                Self::spawn_execution(session, pending, tx.clone());
                            }
                            Some(Deferred::Upload(path)) => Self::spawn_upload(path, tx.clone()),
                            None => {}
                        }
                    }
                }

                Some(msg) = rx.recv() => {
                    Self::handle_async_message(session, msg, app_state);
                }
            }
        }

        Ok(())
    }

    /// Runs an execution in the background; the result comes back on `tx`.
    fn spawn_execution(
        session: &Session,
        pending: PendingExecution,
        tx: mpsc::Sender<AsyncMessage>,
    ) {
        let executor = session.executor().clone();
        debug!("Spawning execution of {:?}", pending.query);
        tokio::spawn(async move {
            let outcome = executor.execute(&pending.query).await;
            if tx
                .send(AsyncMessage::Executed { pending, outcome })
                .await
                .is_err()
            {
                warn!("Execution finished after the UI closed");
            }
        });
    }

    /// Reads an uploaded file in the background; the outcome comes back on `tx`.
    fn spawn_upload(path: PathBuf, tx: mpsc::Sender<AsyncMessage>) {
        debug!("Spawning upload of {}", path.display());
        tokio::spawn(async move {
            let outcome = Session::load_upload(path.clone()).await;
            if tx
                .send(AsyncMessage::Uploaded { path, outcome })
                .await
                .is_err()
            {
                warn!("Upload finished after the UI closed");
            }
        });
    }

    /// Handles an async message from a background task.
    fn handle_async_message(session: &Session, msg: AsyncMessage, app_state: &mut App) {
        match msg {
            AsyncMessage::Executed { pending, outcome } => {
                session.complete(app_state, pending, outcome);
            }
            AsyncMessage::Uploaded { path, outcome } => {
                session.complete_upload(app_state, &path, outcome);
            }
        }
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}

/// Runs the interactive TUI.
pub async fn run(config: &Config, session: Session) -> Result<()> {
    let mut app_state = App::new(config.execution.page_size, config.execution.history_limit);
    session.restore(&mut app_state);
    info!(
        "Starting UI with {} saved queries",
        app_state.saved_queries.len()
    );

    let mut tui = Tui::new()?;
    tui.run(session, app_state).await
}
