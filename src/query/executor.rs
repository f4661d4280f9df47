//! Query execution with simulated latency.
//!
//! The executor owns the artificial delay so the backend stays a plain
//! function of the query text, and tests can run with no delay at all.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::db::{QueryBackend, QueryResult};
use crate::error::Result;
use tracing::{debug, info};

/// Runs queries against a backend after a fixed delay.
#[derive(Clone)]
pub struct QueryExecutor {
    backend: Arc<dyn QueryBackend>,
    latency: Duration,
}

impl QueryExecutor {
    /// Creates a new query executor.
    pub fn new(backend: Arc<dyn QueryBackend>, latency: Duration) -> Self {
        Self { backend, latency }
    }

    /// The configured delay before each result.
    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Waits out the latency, then asks the backend.
    ///
    /// There is no cancellation: once started, an execution always
    /// completes.
    pub async fn execute(&self, sql: &str) -> Result<QueryResult> {
        let start = Instant::now();
        debug!("Executing query after {}ms delay", self.latency.as_millis());

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let result = self.backend.execute_query(sql).await?;
        let execution_time = start.elapsed();
        info!(
            "Query returned {} rows in {}ms",
            result.row_count(),
            execution_time.as_millis()
        );

        Ok(result.with_execution_time(execution_time))
    }
}

impl std::fmt::Debug for QueryExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryExecutor")
            .field("latency", &self.latency)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockBackend;

    #[tokio::test]
    async fn test_zero_latency_executes() {
        let executor = QueryExecutor::new(Arc::new(MockBackend::seeded(3)), Duration::ZERO);
        let result = executor.execute("SELECT * FROM customers").await.unwrap();
        assert_eq!(result.row_count(), 25);
    }

    #[tokio::test]
    async fn test_latency_is_applied() {
        let executor = QueryExecutor::new(
            Arc::new(MockBackend::seeded(3)),
            Duration::from_millis(50),
        );
        let result = executor.execute("SELECT 1").await.unwrap();
        assert!(result.execution_time >= Duration::from_millis(50));
    }
}
