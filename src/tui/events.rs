//! Event handling for the TUI.
//!
//! Processes keyboard and terminal events using crossterm.

use crate::error::{PlaygroundError, Result};
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// Events buffered between the reader thread and the main loop.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Application events.
#[derive(Debug)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// The terminal was resized.
    Resize(u16, u16),
    /// A periodic tick; redraws the spinner and expires toasts.
    Tick,
}

/// Handles terminal events.
#[derive(Debug, Clone, Copy)]
pub struct EventHandler {
    /// Timeout for polling events.
    tick_rate: Duration,
}

impl EventHandler {
    /// Creates a new event handler with default tick rate.
    pub fn new() -> Self {
        Self {
            tick_rate: Duration::from_millis(100),
        }
    }

    /// Creates a new event handler with a custom tick rate.
    pub fn with_tick_rate(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Polls for the next event.
    ///
    /// Returns `None` if no event is available within the tick rate.
    pub fn next(&self) -> Result<Option<Event>> {
        if event::poll(self.tick_rate)
            .map_err(|e| PlaygroundError::internal(format!("Failed to poll events: {e}")))?
        {
            let event = event::read()
                .map_err(|e| PlaygroundError::internal(format!("Failed to read event: {e}")))?;

            match event {
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    Ok(Some(Event::Key(key)))
                }
                CrosstermEvent::Resize(width, height) => Ok(Some(Event::Resize(width, height))),
                _ => Ok(Some(Event::Tick)),
            }
        } else {
            Ok(Some(Event::Tick))
        }
    }

    /// Starts a blocking reader that polls the terminal for the whole session.
    ///
    /// Events arrive on the returned channel in the order they were read. The
    /// reader stops after a poll error, which it forwards, or once the
    /// receiver is dropped.
    pub fn spawn(self) -> mpsc::Receiver<Result<Event>> {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        tokio::task::spawn_blocking(move || forward_events(|| self.next(), &tx));
        rx
    }
}

/// Pumps events from `source` into `tx` until either side gives up.
fn forward_events<F>(mut source: F, tx: &mpsc::Sender<Result<Event>>)
where
    F: FnMut() -> Result<Option<Event>>,
{
    loop {
        match source() {
            Ok(Some(event)) => {
                if tx.blocking_send(Ok(event)).is_err() {
                    debug!("Event receiver closed; stopping reader");
                    return;
                }
            }
            Ok(None) if tx.is_closed() => return,
            Ok(None) => {}
            Err(e) => {
                let _ = tx.blocking_send(Err(e));
                return;
            }
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
