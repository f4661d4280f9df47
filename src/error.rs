//! Error types for the SQL playground.
//!
//! Defines the main error enum used throughout the application.

use crate::upload::UploadError;
use thiserror::Error;

/// Main error type for playground operations.
#[derive(Error, Debug)]
pub enum PlaygroundError {
    /// CSV upload errors (wrong file type, unreadable or empty file).
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// State file errors (unreadable file, failed write, bad JSON).
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Configuration errors (invalid config file, bad CLI values, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (terminal failures, unexpected states).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlaygroundError {
    /// Creates a persistence error with the given message.
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Upload(_) => "Upload Error",
            Self::Persistence(_) => "Persistence Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using PlaygroundError.
pub type Result<T> = std::result::Result<T, PlaygroundError>;
