//! Saved queries.
//!
//! User-named queries, kept in the order they were saved.

use serde::{Deserialize, Serialize};

/// A query saved under a user-supplied name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedQuery {
    pub name: String,
    pub query: String,
    /// ISO-8601 UTC timestamp of the save. Empty for entries written without one.
    #[serde(default)]
    pub timestamp: String,
}

impl SavedQuery {
    pub fn new(
        name: impl Into<String>,
        query: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            query: query.into(),
            timestamp: timestamp.into(),
        }
    }

    /// Case-insensitive match on the name or the query text.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term) || self.query.to_lowercase().contains(&term)
    }
}

/// Saved queries matching `term`, paired with their position in `queries`.
///
/// An empty term matches everything.
pub fn filter_saved_queries<'a>(queries: &'a [SavedQuery], term: &str) -> Vec<(usize, &'a SavedQuery)> {
    queries
        .iter()
        .enumerate()
        .filter(|(_, q)| q.matches(term))
        .collect()
}
