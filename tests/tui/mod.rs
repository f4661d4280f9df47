//! Headless-mode tests against the built binary.

mod common;
mod headless_test;
mod saved_queries_test;
