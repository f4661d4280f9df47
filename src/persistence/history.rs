//! Recent query history.
//!
//! A bounded list of executed queries, newest first. History lives for the
//! session only; it is not written to the state file.

use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of entries kept.
pub const MAX_HISTORY_ENTRIES: usize = 10;

/// Current time as an ISO-8601 UTC string with millisecond precision.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Renders a stored timestamp in local time; unparseable input is shown as is.
pub fn format_timestamp(timestamp: &str) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(parsed) => parsed
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        Err(_) => timestamp.to_string(),
    }
}

/// An executed query and when it ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub query: String,
    /// ISO-8601 UTC timestamp.
    pub timestamp: String,
}

impl HistoryEntry {
    pub fn new(query: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// Bounded history; the oldest entries are dropped silently.
#[derive(Debug, Clone)]
pub struct QueryHistory {
    entries: VecDeque<HistoryEntry>,
    limit: usize,
}

impl QueryHistory {
    /// Creates an empty history holding at most `limit` entries.
    pub fn with_limit(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            entries: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Records an entry as the newest one.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.limit);
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for QueryHistory {
    fn default() -> Self {
        Self::with_limit(MAX_HISTORY_ENTRIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first() {
        let mut history = QueryHistory::default();
        history.record(HistoryEntry::new("SELECT 1", "t1"));
        history.record(HistoryEntry::new("SELECT 2", "t2"));

        let queries: Vec<&str> = history.iter().map(|e| e.query.as_str()).collect();
        assert_eq!(queries, vec!["SELECT 2", "SELECT 1"]);
    }

    #[test]
    fn test_bounded_to_limit() {
        let mut history = QueryHistory::default();
        for i in 1..=11 {
            history.record(HistoryEntry::new(format!("SELECT {i}"), format!("t{i}")));
        }

        assert_eq!(history.len(), 10);
        assert_eq!(history.get(0).unwrap().query, "SELECT 11");
        assert_eq!(history.get(9).unwrap().query, "SELECT 2");
        assert!(history.iter().all(|e| e.query != "SELECT 1"));
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut history = QueryHistory::with_limit(3);
        history.record(HistoryEntry::new("SELECT 1", "t1"));
        history.record(HistoryEntry::new("SELECT 1", "t2"));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_now_timestamp_is_iso_utc() {
        let ts = now_timestamp();
        assert!(ts.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&ts).is_ok());
    }

    #[test]
    fn test_format_timestamp_passes_through_garbage() {
        assert_eq!(format_timestamp("yesterday"), "yesterday");
        assert_eq!(format_timestamp("2024-05-01T10:00:00.000Z").len(), 19);
    }

    #[test]
    fn test_zero_limit_keeps_one() {
        let mut history = QueryHistory::with_limit(0);
        history.record(HistoryEntry::new("a", "t1"));
        history.record(HistoryEntry::new("b", "t2"));
        assert_eq!(history.len(), 1);
        assert_eq!(history.limit(), 1);
    }
}
