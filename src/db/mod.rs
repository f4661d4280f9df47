//! Query backend abstraction for the playground.
//!
//! Provides a trait-based interface for answering queries, so the UI and
//! executor never depend on where a result comes from.

mod mock;
mod types;

pub use mock::{classify, generate_result, DatasetShape, MockBackend, MOCK_ROW_COUNT};
pub use types::{QueryResult, Row, Value};

use crate::error::Result;
use async_trait::async_trait;

/// Trait defining the interface for query backends.
#[async_trait]
pub trait QueryBackend: Send + Sync {
    /// Executes a SQL query and returns the results.
    async fn execute_query(&self, sql: &str) -> Result<QueryResult>;
}
