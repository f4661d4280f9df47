//! Query execution for the playground.
//!
//! Separates the simulated latency from the backend that produces results.

pub mod executor;

pub use executor::QueryExecutor;
