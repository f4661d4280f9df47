//! Library-level integration tests.

mod persistence_test;
mod query_test;
mod upload_test;
