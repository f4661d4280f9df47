//! Persistence layer for the SQL playground.
//!
//! State is a small key/value map of JSON values, read once at startup and
//! rewritten in full whenever a value changes. `FileStore` keeps it in a
//! JSON file under the platform state directory; `MemoryStore` keeps it in
//! memory for headless runs and tests.

pub mod history;
pub mod saved_queries;

pub use history::{
    format_timestamp, now_timestamp, HistoryEntry, QueryHistory, MAX_HISTORY_ENTRIES,
};
pub use saved_queries::{filter_saved_queries, SavedQuery};

use crate::error::{PlaygroundError, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};

/// Key holding the JSON array of saved queries.
pub const SAVED_QUERIES_KEY: &str = "savedQueries";

/// Key the raw saved-query value is copied to when some of it cannot be read.
pub const SAVED_QUERIES_BACKUP_KEY: &str = "savedQueries.bak";

/// Key holding the JSON boolean dark-mode flag.
pub const DARK_MODE_KEY: &str = "darkMode";

/// Whole-value key/value storage port.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` when the key was never written.
    fn get(&self, key: &str) -> Result<Option<JsonValue>>;

    /// Replaces the value stored under `key`.
    fn set(&self, key: &str, value: JsonValue) -> Result<()>;
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<Map<String, JsonValue>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<JsonValue>> {
        let values = self
            .values
            .lock()
            .map_err(|_| PlaygroundError::internal("memory store lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: JsonValue) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| PlaygroundError::internal("memory store lock poisoned"))?;
        values.insert(key.to_string(), value);
        Ok(())
    }
}

/// JSON file store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: Mutex<Map<String, JsonValue>>,
}

impl FileStore {
    /// Opens the store at the default platform path.
    ///
    /// - Linux: `~/.local/state/sql-playground/state.json`
    /// - elsewhere: `<config dir>/sql-playground/state.json`
    pub fn open_default() -> Result<Self> {
        let path = Self::default_path()?;
        Self::open(&path)
    }

    /// Returns the default state file path for the current platform.
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::state_dir()
            .or_else(dirs::config_dir)
            .ok_or_else(|| PlaygroundError::persistence("Could not determine state directory"))?;
        Ok(base.join("sql-playground").join("state.json"))
    }

    /// Opens or creates the store at `path`.
    ///
    /// A file that is not a JSON object is moved aside to `*.json.bak` and
    /// the store starts empty.
    pub fn open(path: &Path) -> Result<Self> {
        Self::ensure_parent_dirs(path)?;

        let values = match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<Map<String, JsonValue>>(&content) {
                Ok(values) => values,
                Err(e) => {
                    warn!("State file {} is corrupt: {e}", path.display());
                    Self::backup_corrupt(path)?;
                    Map::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(e) => {
                return Err(PlaygroundError::persistence(format!(
                    "Failed to read state file {}: {e}",
                    path.display()
                )))
            }
        };

        info!("State file opened at {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            values: Mutex::new(values),
        })
    }

    /// Returns the path to the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent_dirs(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PlaygroundError::persistence(format!(
                    "Failed to create state directory {}: {e}",
                    parent.display()
                ))
            })?;
        }
        Ok(())
    }

    fn backup_corrupt(path: &Path) -> Result<()> {
        let backup_path = path.with_extension("json.bak");
        std::fs::rename(path, &backup_path).map_err(|e| {
            PlaygroundError::persistence(format!(
                "Failed to back up corrupt state file to {}: {e}",
                backup_path.display()
            ))
        })?;
        warn!("Backed up corrupt state file to {}", backup_path.display());
        Ok(())
    }

    /// Writes the whole map to a temporary file, then renames it over the
    /// state file.
    fn flush(&self, values: &Map<String, JsonValue>) -> Result<()> {
        let content = serde_json::to_string_pretty(values)
            .map_err(|e| PlaygroundError::persistence(format!("Failed to encode state: {e}")))?;

        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, content).map_err(|e| {
            PlaygroundError::persistence(format!(
                "Failed to write {}: {e}",
                tmp_path.display()
            ))
        })?;
        std::fs::rename(&tmp_path, &self.path).map_err(|e| {
            PlaygroundError::persistence(format!(
                "Failed to replace {}: {e}",
                self.path.display()
            ))
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<JsonValue>> {
        let values = self
            .values
            .lock()
            .map_err(|_| PlaygroundError::internal("state file lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: JsonValue) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| PlaygroundError::internal("state file lock poisoned"))?;
        values.insert(key.to_string(), value);
        self.flush(&values)
    }
}

/// Reads a typed value, falling back to the default when the key is
/// missing or holds something that does not decode.
fn load_or_default<T: DeserializeOwned + Default>(store: &dyn KeyValueStore, key: &str) -> T {
    match store.get(key) {
        Ok(Some(value)) => serde_json::from_value(value).unwrap_or_else(|e| {
            warn!("Ignoring unreadable '{key}' value: {e}");
            T::default()
        }),
        Ok(None) => T::default(),
        Err(e) => {
            warn!("Failed to read '{key}': {e}");
            T::default()
        }
    }
}

fn store_value<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_value(value)
        .map_err(|e| PlaygroundError::persistence(format!("Failed to encode '{key}': {e}")))?;
    store.set(key, json)
}

/// Loads saved queries; missing means none.
///
/// Entries are decoded one at a time and unreadable ones are skipped. When
/// anything is skipped, the raw value is copied to
/// [`SAVED_QUERIES_BACKUP_KEY`] before the next save can replace it.
pub fn load_saved_queries(store: &dyn KeyValueStore) -> Vec<SavedQuery> {
    let raw = match store.get(SAVED_QUERIES_KEY) {
        Ok(Some(JsonValue::Null)) | Ok(None) => return Vec::new(),
        Ok(Some(raw)) => raw,
        Err(e) => {
            warn!("Failed to read '{SAVED_QUERIES_KEY}': {e}");
            return Vec::new();
        }
    };

    let JsonValue::Array(entries) = &raw else {
        warn!("Ignoring '{SAVED_QUERIES_KEY}' value: expected an array");
        backup_value(store, SAVED_QUERIES_BACKUP_KEY, raw.clone());
        return Vec::new();
    };

    let mut skipped = 0;
    let queries: Vec<SavedQuery> = entries
        .iter()
        .enumerate()
        .filter_map(|(i, entry)| match SavedQuery::deserialize(entry) {
            Ok(query) => Some(query),
            Err(e) => {
                warn!("Skipping unreadable saved query #{i}: {e}");
                skipped += 1;
                None
            }
        })
        .collect();

    if skipped > 0 {
        backup_value(store, SAVED_QUERIES_BACKUP_KEY, raw);
    }
    queries
}

fn backup_value(store: &dyn KeyValueStore, backup_key: &str, raw: JsonValue) {
    match store.set(backup_key, raw) {
        Ok(()) => warn!("Copied unreadable state to '{backup_key}'"),
        Err(e) => warn!("Failed to copy unreadable state to '{backup_key}': {e}"),
    }
}

/// Replaces the stored saved-query list.
pub fn store_saved_queries(store: &dyn KeyValueStore, queries: &[SavedQuery]) -> Result<()> {
    store_value(store, SAVED_QUERIES_KEY, queries)
}

/// Loads the dark-mode flag; missing means light mode.
pub fn load_dark_mode(store: &dyn KeyValueStore) -> bool {
    load_or_default(store, DARK_MODE_KEY)
}

/// Replaces the stored dark-mode flag.
pub fn store_dark_mode(store: &dyn KeyValueStore, dark_mode: bool) -> Result<()> {
    store_value(store, DARK_MODE_KEY, &dark_mode)
}
