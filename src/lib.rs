//! SQL playground - a terminal SQL query runner over generated mock data.
//!
//! This library exposes the core modules for the binary and for integration tests.

pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod pagination;
pub mod persistence;
pub mod query;
pub mod tui;
pub mod upload;
