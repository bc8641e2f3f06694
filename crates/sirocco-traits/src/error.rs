//! Error types for the Sirocco backtester.
//!
//! This module defines the error type shared by the data model and the
//! backtest engine.

use thiserror::Error;

/// The main error type for Sirocco operations.
#[derive(Debug, Error)]
pub enum SiroccoError {
    /// Error due to invalid or malformed data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Error when a date is out of range or invalid.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Error when data is insufficient for the requested operation.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

impl From<String> for SiroccoError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for SiroccoError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

/// A specialized Result type for Sirocco operations.
///
/// This is a convenience type that uses [`SiroccoError`] as the error type.
pub type Result<T> = std::result::Result<T, SiroccoError>;
