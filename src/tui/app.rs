//! Application state for the TUI.
//!
//! `App` holds everything the screen shows. Every user action is a
//! transition method on it; none of them perform I/O. Work that needs the
//! executor or the state file is returned as a [`Command`] for the session
//! to carry out.

use super::widgets::spinner::Spinner;
use super::Event;
use crate::catalog::{self, SAMPLE_QUERIES};
use crate::db::QueryResult;
use crate::pagination::{PaginatedView, Pager, DEFAULT_PAGE_SIZE};
use crate::persistence::{
    filter_saved_queries, now_timestamp, HistoryEntry, QueryHistory, SavedQuery,
    MAX_HISTORY_ENTRIES,
};
use crate::upload::{self, CsvUpload, UploadError};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// How long a toast stays on screen.
const TOAST_DURATION: Duration = Duration::from_secs(3);

/// The panel shown on the left-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Editor,
    Saved,
    History,
    Upload,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Editor, Tab::Saved, Tab::History, Tab::Upload];

    pub fn title(self) -> &'static str {
        match self {
            Self::Editor => "Query Editor",
            Self::Saved => "Saved Queries",
            Self::History => "History",
            Self::Upload => "Upload CSV",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Editor => 0,
            Self::Saved => 1,
            Self::History => 2,
            Self::Upload => 3,
        }
    }

    /// Cycles to the next tab.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Cycles to the previous tab.
    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Input state for text editing.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Current input text.
    pub text: String,
    /// Cursor position (character index).
    pub cursor: usize,
}

impl InputState {
    /// Creates a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the text and puts the cursor at the end.
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.text.chars().count();
    }

    /// Byte offset of the character at `cursor`.
    fn byte_index(&self, cursor: usize) -> usize {
        self.text
            .char_indices()
            .nth(cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Inserts a character at the cursor position.
    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    /// Deletes the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
        }
    }

    /// Deletes the character at the cursor (delete key).
    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_index(self.cursor);
            self.text.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Clears the input and returns the previous text.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    pub fn clear(&mut self) {
        self.take();
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Applies a plain editing key. Returns false for keys it does not handle.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) => self.insert(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.move_home(),
            KeyCode::End => self.move_end(),
            _ => return false,
        }
        true
    }
}

/// A query accepted for execution; the loading flag is already set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingExecution {
    pub query: String,
}

/// Side effects requested by a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the query and report back through `finish_execution`.
    Execute(PendingExecution),
    /// Write the saved-query list to the store.
    PersistSavedQueries,
    /// Write the dark-mode flag to the store.
    PersistTheme,
    /// Read and parse the CSV file, then call `finish_upload`.
    Upload(PathBuf),
}

/// State of the CSV upload panel.
#[derive(Debug, Clone, Default)]
pub struct UploadState {
    /// Path typed by the user.
    pub path: InputState,
    /// Inline error from the last selection or upload.
    pub error: Option<String>,
    /// Name of the file whose rows are currently displayed.
    pub loaded_file: Option<String>,
}

/// Main application state.
pub struct App {
    /// Whether the application is still running.
    pub running: bool,
    pub tab: Tab,
    /// SQL editor contents.
    pub query: InputState,
    /// Result currently displayed, from an execution or a CSV upload.
    pub result: Option<QueryResult>,
    pub pager: Pager,
    /// True while an execution is in flight.
    pub loading: bool,
    pub spinner: Option<Spinner>,
    pub history: QueryHistory,
    pub history_selected: usize,
    pub saved_queries: Vec<SavedQuery>,
    pub saved_search: InputState,
    /// Selection within the filtered saved-query list.
    pub saved_selected: usize,
    /// Last picked predefined query.
    pub predefined_selected: Option<usize>,
    pub dark_mode: bool,
    pub upload: UploadState,
    /// Name prompt, open while a save is being confirmed.
    pub save_prompt: Option<InputState>,
    /// Toast message and its expiry.
    pub toast: Option<(String, Instant)>,
}

impl Default for App {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, MAX_HISTORY_ENTRIES)
    }
}

impl App {
    /// Creates a new App with an empty editor and no result.
    pub fn new(page_size: usize, history_limit: usize) -> Self {
        Self {
            running: true,
            tab: Tab::default(),
            query: InputState::new(),
            result: None,
            pager: Pager::new(page_size),
            loading: false,
            spinner: None,
            history: QueryHistory::with_limit(history_limit),
            history_selected: 0,
            saved_queries: Vec::new(),
            saved_search: InputState::new(),
            saved_selected: 0,
            predefined_selected: None,
            dark_mode: false,
            upload: UploadState::default(),
            save_prompt: None,
            toast: None,
        }
    }

    /// Installs state read from the store at startup.
    pub fn restore(&mut self, saved_queries: Vec<SavedQuery>, dark_mode: bool) {
        self.saved_queries = saved_queries;
        self.dark_mode = dark_mode;
        self.saved_selected = 0;
    }

    // === Execution ===

    /// Starts executing the editor contents.
    ///
    /// Ignored while another execution is in flight or when the query is
    /// blank.
    pub fn begin_execution(&mut self) -> Option<PendingExecution> {
        if self.loading || self.query.text.trim().is_empty() {
            return None;
        }
        self.loading = true;
        self.spinner = Some(Spinner::executing());
        Some(PendingExecution {
            query: self.query.text.clone(),
        })
    }

    /// Installs a finished result and records the query in history.
    pub fn finish_execution(
        &mut self,
        query: impl Into<String>,
        result: QueryResult,
        timestamp: impl Into<String>,
    ) {
        self.result = Some(result);
        self.pager.reset();
        self.history.record(HistoryEntry::new(query, timestamp));
        self.history_selected = 0;
        self.upload.loaded_file = None;
        self.loading = false;
        self.spinner = None;
    }

    /// Ends an execution that produced no result.
    pub fn fail_execution(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.spinner = None;
        self.show_toast(message);
    }

    /// Puts a catalog query in the editor and runs it.
    pub fn select_predefined(&mut self, index: usize) -> Option<PendingExecution> {
        if self.loading {
            return None;
        }
        let entry = catalog::predefined(index)?;
        self.predefined_selected = Some(index);
        self.query.set(entry.sql);
        self.tab = Tab::Editor;
        self.begin_execution()
    }

    /// Fills the editor with a sample snippet without running it.
    pub fn insert_sample(&mut self, index: usize) {
        if self.loading {
            return;
        }
        if let Some(sample) = SAMPLE_QUERIES.get(index) {
            self.query.set(*sample);
        }
    }

    /// Copies text into the editor and shows it.
    pub fn load_query(&mut self, text: impl Into<String>) {
        self.query.set(text);
        self.tab = Tab::Editor;
    }

    /// Empties the editor and drops the displayed result.
    pub fn clear_query(&mut self) {
        if self.loading {
            return;
        }
        self.query.clear();
        self.result = None;
        self.pager.reset();
        self.upload.loaded_file = None;
    }

    pub fn toggle_theme(&mut self) {
        self.dark_mode = !self.dark_mode;
    }

    // === Saved queries ===

    /// Opens the name prompt. Returns false when there is nothing to save.
    pub fn begin_save(&mut self) -> bool {
        if self.loading || self.query.text.trim().is_empty() {
            return false;
        }
        self.save_prompt = Some(InputState::new());
        true
    }

    /// Saves the editor contents under `name`, closing the prompt.
    ///
    /// Returns false, and saves nothing, when the name is blank.
    pub fn confirm_save(&mut self, name: &str, timestamp: impl Into<String>) -> bool {
        self.save_prompt = None;
        let name = name.trim();
        if name.is_empty() || self.query.text.trim().is_empty() {
            return false;
        }
        self.saved_queries
            .push(SavedQuery::new(name, self.query.text.clone(), timestamp));
        self.show_toast(format!("Saved \"{name}\""));
        true
    }

    pub fn cancel_save(&mut self) {
        self.save_prompt = None;
    }

    /// Saved queries matching the search box, with their underlying index.
    pub fn filtered_saved(&self) -> Vec<(usize, &SavedQuery)> {
        filter_saved_queries(&self.saved_queries, &self.saved_search.text)
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.saved_search.set(term);
        self.saved_selected = 0;
    }

    /// Removes the entry at `index` of the filtered list.
    pub fn delete_saved(&mut self, index: usize) -> bool {
        let Some(underlying) = self.filtered_saved().get(index).map(|(i, _)| *i) else {
            return false;
        };
        self.saved_queries.remove(underlying);
        let remaining = self.filtered_saved().len();
        self.saved_selected = self.saved_selected.min(remaining.saturating_sub(1));
        true
    }

    pub fn load_selected_saved(&mut self) {
        let query = self
            .filtered_saved()
            .get(self.saved_selected)
            .map(|(_, q)| q.query.clone());
        if let Some(query) = query {
            self.load_query(query);
        }
    }

    pub fn load_selected_history(&mut self) {
        if let Some(entry) = self.history.get(self.history_selected) {
            let query = entry.query.clone();
            self.load_query(query);
        }
    }

    // === Pagination ===

    /// The current page of the displayed result.
    pub fn current_view(&self) -> Option<PaginatedView<'_>> {
        self.result.as_ref().map(|r| self.pager.view(r))
    }

    pub fn next_page(&mut self) -> bool {
        match &self.result {
            Some(result) => self.pager.next(result.row_count()),
            None => false,
        }
    }

    pub fn previous_page(&mut self) {
        self.pager.previous();
    }

    // === CSV upload ===

    /// Checks the chosen file before reading it.
    ///
    /// On rejection the error is shown inline and nothing else changes.
    pub fn select_upload_file(&mut self, path: &str) -> Option<PathBuf> {
        let path = path.trim();
        if path.is_empty() {
            self.upload.error = Some(UploadError::NoFileSelected.to_string());
            return None;
        }
        let path = PathBuf::from(path);
        match upload::validate_file_type(&path) {
            Ok(()) => {
                self.upload.error = None;
                Some(path)
            }
            Err(e) => {
                self.upload.error = Some(e.to_string());
                None
            }
        }
    }

    /// Displays an uploaded file, or the reason it was rejected.
    pub fn finish_upload(&mut self, outcome: Result<CsvUpload, UploadError>) {
        match outcome {
            Ok(upload) => {
                let rows = upload.result.row_count();
                self.result = Some(upload.result);
                self.pager.reset();
                self.upload.error = None;
                self.show_toast(format!("Loaded {rows} rows from {}", upload.file_name));
                self.upload.loaded_file = Some(upload.file_name);
                self.tab = Tab::Editor;
            }
            Err(e) => {
                self.upload.error = Some(e.to_string());
            }
        }
    }

    // === Toasts ===

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some((message.into(), Instant::now() + TOAST_DURATION));
    }

    pub fn clear_expired_toast(&mut self) {
        if matches!(self.toast, Some((_, expiry)) if Instant::now() >= expiry) {
            self.toast = None;
        }
    }

    pub fn toast_message(&self) -> Option<&str> {
        self.toast.as_ref().map(|(message, _)| message.as_str())
    }

    // === Key handling ===

    /// Handles an event and returns the work it requested.
    pub fn handle_event(&mut self, event: Event) -> Vec<Command> {
        match event {
            Event::Key(key) => self.handle_key(key),
            // Resizes are picked up by the next draw.
            Event::Resize(_, _) | Event::Tick => Vec::new(),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Command> {
        if self.save_prompt.is_some() {
            return self.handle_save_prompt_key(key);
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
                self.running = false;
                Vec::new()
            }
            KeyCode::Char('t') if ctrl => {
                self.toggle_theme();
                vec![Command::PersistTheme]
            }
            KeyCode::Tab => {
                self.tab = self.tab.next();
                Vec::new()
            }
            KeyCode::BackTab => {
                self.tab = self.tab.previous();
                Vec::new()
            }
            KeyCode::PageDown => {
                self.next_page();
                Vec::new()
            }
            KeyCode::PageUp => {
                self.previous_page();
                Vec::new()
            }
            KeyCode::F(n @ 1..=5) => self
                .select_predefined(usize::from(n - 1))
                .map(Command::Execute)
                .into_iter()
                .collect(),
            _ => match self.tab {
                Tab::Editor => self.handle_editor_key(key),
                Tab::Saved => self.handle_saved_key(key),
                Tab::History => {
                    self.handle_history_key(key);
                    Vec::new()
                }
                Tab::Upload => self.handle_upload_key(key),
            },
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) -> Vec<Command> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('s') if ctrl => {
                self.begin_save();
            }
            KeyCode::Char('l') if ctrl => self.clear_query(),
            _ if ctrl => {}
            KeyCode::F(n @ 6..=8) => self.insert_sample(usize::from(n - 6)),
            KeyCode::Enter => {
                return self
                    .begin_execution()
                    .map(Command::Execute)
                    .into_iter()
                    .collect();
            }
            // The editor is read-only while a query runs.
            _ if self.loading => {}
            _ => {
                self.query.handle_key(key);
            }
        }
        Vec::new()
    }

    fn handle_saved_key(&mut self, key: KeyEvent) -> Vec<Command> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return Vec::new();
        }
        match key.code {
            KeyCode::Up => self.saved_selected = self.saved_selected.saturating_sub(1),
            KeyCode::Down => {
                let len = self.filtered_saved().len();
                if self.saved_selected + 1 < len {
                    self.saved_selected += 1;
                }
            }
            KeyCode::Enter => self.load_selected_saved(),
            KeyCode::Delete => {
                if self.delete_saved(self.saved_selected) {
                    return vec![Command::PersistSavedQueries];
                }
            }
            KeyCode::Esc => self.set_search(""),
            KeyCode::Char(_) | KeyCode::Backspace => {
                self.saved_search.handle_key(key);
                self.saved_selected = 0;
            }
            _ => {}
        }
        Vec::new()
    }

    fn handle_history_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.history_selected = self.history_selected.saturating_sub(1),
            KeyCode::Down => {
                if self.history_selected + 1 < self.history.len() {
                    self.history_selected += 1;
                }
            }
            KeyCode::Enter => self.load_selected_history(),
            _ => {}
        }
    }

    fn handle_upload_key(&mut self, key: KeyEvent) -> Vec<Command> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return Vec::new();
        }
        match key.code {
            KeyCode::Enter => {
                let path = self.upload.path.text.clone();
                return self
                    .select_upload_file(&path)
                    .map(Command::Upload)
                    .into_iter()
                    .collect();
            }
            KeyCode::Esc => {
                self.upload.path.clear();
                self.upload.error = None;
            }
            _ => {
                if self.upload.path.handle_key(key) {
                    self.upload.error = None;
                }
            }
        }
        Vec::new()
    }

    fn handle_save_prompt_key(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Enter => {
                let name = self
                    .save_prompt
                    .as_ref()
                    .map(|p| p.text.clone())
                    .unwrap_or_default();
                if self.confirm_save(&name, now_timestamp()) {
                    return vec![Command::PersistSavedQueries];
                }
            }
            KeyCode::Esc => self.cancel_save(),
            _ => {
                if let Some(prompt) = self.save_prompt.as_mut() {
                    prompt.handle_key(key);
                }
            }
        }
        Vec::new()
    }
}
