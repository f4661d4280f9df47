//! Session orchestrator for the SQL playground.
//!
//! Coordinates the query executor, the key/value store and the application
//! state. `App` decides what should happen; the session carries out the
//! commands it returns.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::db::{MockBackend, QueryBackend, QueryResult};
use crate::error::Result;
use crate::persistence::{self, now_timestamp, FileStore, KeyValueStore, MemoryStore};
use crate::query::QueryExecutor;
use crate::tui::app::{App, Command, PendingExecution};
use crate::upload::{self, CsvUpload, UploadError};
use tracing::{debug, error, info, warn};

/// Work that [`Session::perform`] hands back instead of blocking on it.
#[derive(Debug)]
pub enum Deferred {
    /// A query to run through the executor.
    Execute(PendingExecution),
    /// A CSV file to read and parse.
    Upload(PathBuf),
}

/// The orchestrator that coordinates all components.
pub struct Session {
    executor: QueryExecutor,
    store: Arc<dyn KeyValueStore>,
}

impl Session {
    /// Creates a new session with the given components.
    pub fn new(executor: QueryExecutor, store: Arc<dyn KeyValueStore>) -> Self {
        Self { executor, store }
    }

    /// Builds a session from configuration, backed by the state file.
    pub fn from_config(config: &Config, seed: Option<u64>) -> Result<Self> {
        let store = match config.storage.state_file.as_deref() {
            Some(path) => FileStore::open(path)?,
            None => FileStore::open_default()?,
        };
        info!("Using state file {}", store.path().display());

        Ok(Self::with_store(
            Arc::new(store),
            config.execution.latency(),
            seed,
        ))
    }

    /// Builds a session over the mock backend and the given store.
    pub fn with_store(store: Arc<dyn KeyValueStore>, latency: Duration, seed: Option<u64>) -> Self {
        Self::new(QueryExecutor::new(mock_backend(seed), latency), store)
    }

    /// Builds a session that keeps its state in memory.
    pub fn in_memory(latency: Duration, seed: Option<u64>) -> Self {
        Self::with_store(Arc::new(MemoryStore::new()), latency, seed)
    }

    pub fn executor(&self) -> &QueryExecutor {
        &self.executor
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Loads saved queries and the theme flag into `app`.
    pub fn restore(&self, app: &mut App) {
        let saved = persistence::load_saved_queries(self.store.as_ref());
        let dark_mode = persistence::load_dark_mode(self.store.as_ref());
        debug!("Restored {} saved queries, dark mode {}", saved.len(), dark_mode);
        app.restore(saved, dark_mode);
    }

    /// Carries out a command that needs no waiting.
    ///
    /// Executions and uploads are handed back to the caller, which decides
    /// whether to await them inline or in a background task.
    pub fn perform(&self, app: &mut App, command: Command) -> Option<Deferred> {
        match command {
            Command::Execute(pending) => return Some(Deferred::Execute(pending)),
            Command::Upload(path) => return Some(Deferred::Upload(path)),
            Command::PersistSavedQueries => {
                let stored =
                    persistence::store_saved_queries(self.store.as_ref(), &app.saved_queries);
                if let Err(e) = stored {
                    warn!("Failed to persist saved queries: {e}");
                    app.show_toast(format!("{}: {e}", e.category()));
                }
            }
            Command::PersistTheme => {
                if let Err(e) = persistence::store_dark_mode(self.store.as_ref(), app.dark_mode) {
                    warn!("Failed to persist theme: {e}");
                    app.show_toast(format!("{}: {e}", e.category()));
                }
            }
        }
        None
    }

    /// Reads and parses a CSV file on the blocking thread pool.
    pub async fn load_upload(path: PathBuf) -> std::result::Result<CsvUpload, UploadError> {
        tokio::task::spawn_blocking(move || upload::load_csv(&path))
            .await
            .unwrap_or_else(|e| Err(UploadError::Parse(format!("upload task failed: {e}"))))
    }

    /// Installs the outcome of an upload.
    pub fn complete_upload(
        &self,
        app: &mut App,
        path: &Path,
        outcome: std::result::Result<CsvUpload, UploadError>,
    ) {
        if let Err(e) = &outcome {
            warn!("Upload of {} rejected: {e}", path.display());
        }
        app.finish_upload(outcome);
    }

    /// Installs the outcome of an execution.
    pub fn complete(&self, app: &mut App, pending: PendingExecution, outcome: Result<QueryResult>) {
        match outcome {
            Ok(result) => app.finish_execution(pending.query, result, now_timestamp()),
            Err(e) => {
                error!("Query failed: {e}");
                app.fail_execution(format!("{}: {e}", e.category()));
            }
        }
    }

    /// Carries out commands in order, awaiting deferred work inline.
    pub async fn dispatch(&self, app: &mut App, commands: Vec<Command>) {
        for command in commands {
            match self.perform(app, command) {
                Some(Deferred::Execute(pending)) => {
                    let outcome = self.executor.execute(&pending.query).await;
                    self.complete(app, pending, outcome);
                }
                Some(Deferred::Upload(path)) => {
                    let outcome = Self::load_upload(path.clone()).await;
                    self.complete_upload(app, &path, outcome);
                }
                None => {}
            }
        }
    }
}

fn mock_backend(seed: Option<u64>) -> Arc<dyn QueryBackend> {
    match seed {
        Some(seed) => Arc::new(MockBackend::seeded(seed)),
        None => Arc::new(MockBackend::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::SavedQuery;
    use crate::tui::app::Tab;
    use pretty_assertions::assert_eq;

    fn session() -> Session {
        Session::in_memory(Duration::ZERO, Some(42))
    }

    fn execute(query: &str) -> Command {
        Command::Execute(PendingExecution {
            query: query.to_string(),
        })
    }

    #[tokio::test]
    async fn test_dispatch_executes_and_records_history() {
        let session = session();
        let mut app = App::default();
        app.query.set("SELECT * FROM customers");
        let pending = app.begin_execution().unwrap();

        session.dispatch(&mut app, vec![Command::Execute(pending)]).await;

        assert!(!app.loading);
        assert_eq!(app.result.as_ref().unwrap().row_count(), 25);
        assert_eq!(app.history.get(0).unwrap().query, "SELECT * FROM customers");
    }

    #[tokio::test]
    async fn test_eleven_executions_keep_ten() {
        let session = session();
        let mut app = App::default();
        for i in 1..=11 {
            session.dispatch(&mut app, vec![execute(&format!("SELECT {i}"))]).await;
        }
        assert_eq!(app.history.len(), 10);
        assert_eq!(app.history.get(0).unwrap().query, "SELECT 11");
        assert!(app.history.iter().all(|e| e.query != "SELECT 1"));
    }

    #[tokio::test]
    async fn test_saved_queries_survive_restore() {
        let session = session();
        let mut app = App::default();
        app.query.set("SELECT * FROM orders");
        app.begin_save();
        assert!(app.confirm_save("Orders", "2024-05-01T10:00:00.000Z"));
        session.dispatch(&mut app, vec![Command::PersistSavedQueries]).await;

        let mut fresh = App::default();
        session.restore(&mut fresh);
        assert_eq!(
            fresh.saved_queries,
            vec![SavedQuery::new(
                "Orders",
                "SELECT * FROM orders",
                "2024-05-01T10:00:00.000Z"
            )]
        );
    }

    #[tokio::test]
    async fn test_theme_survives_restore() {
        let session = session();
        let mut app = App::default();
        app.toggle_theme();
        session.dispatch(&mut app, vec![Command::PersistTheme]).await;

        let mut fresh = App::default();
        session.restore(&mut fresh);
        assert!(fresh.dark_mode);
    }

    #[tokio::test]
    async fn test_upload_command_loads_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.csv");
        std::fs::write(&path, "name,age\nAda,36\nAlan,41\n").unwrap();

        let session = session();
        let mut app = App::default();
        app.tab = Tab::Upload;
        session.dispatch(&mut app, vec![Command::Upload(path)]).await;

        let result = app.result.as_ref().unwrap();
        assert_eq!(result.columns, vec!["name".to_string(), "age".to_string()]);
        assert_eq!(result.row_count(), 2);
        assert_eq!(app.tab, Tab::Editor);
        assert_eq!(app.upload.loaded_file.as_deref(), Some("people.csv"));
    }

    #[tokio::test]
    async fn test_upload_command_reports_missing_file() {
        let session = session();
        let mut app = App::default();
        session
            .dispatch(&mut app, vec![Command::Upload("/nonexistent/data.csv".into())])
            .await;

        assert!(app.result.is_none());
        assert!(app
            .upload
            .error
            .as_deref()
            .unwrap()
            .starts_with("Error parsing CSV:"));
    }

    #[tokio::test]
    async fn test_upload_is_deferred_until_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stock.csv");
        std::fs::write(&path, "sku,qty\nA-1,4\n").unwrap();

        let session = session();
        let mut app = App::default();
        app.tab = Tab::Upload;
        let deferred = session.perform(&mut app, Command::Upload(path.clone()));
        assert!(matches!(&deferred, Some(Deferred::Upload(p)) if *p == path));
        assert!(app.result.is_none());
        assert_eq!(app.tab, Tab::Upload);

        let outcome = Session::load_upload(path.clone()).await;
        session.complete_upload(&mut app, &path, outcome);
        assert_eq!(app.result.as_ref().unwrap().row_count(), 1);
        assert_eq!(app.upload.loaded_file.as_deref(), Some("stock.csv"));
    }

    #[test]
    fn test_from_config_uses_configured_state_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");
        let mut config = Config::default();
        config.storage.state_file = Some(path.clone());
        let session = Session::from_config(&config, Some(1)).unwrap();

        persistence::store_dark_mode(session.store().as_ref(), true).unwrap();
        assert!(path.exists());
    }
}
