//! Error types for the Alpha Vantage client.

use thiserror::Error;

/// Errors that can occur when using the Alpha Vantage API.
#[derive(Debug, Error)]
pub enum AvError {
    /// Missing API key.
    #[error("ALPHAVANTAGE_API_KEY environment variable not set")]
    MissingApiKey,

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned an error.
    #[error("Alpha Vantage API error: {0}")]
    Api(String),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// No data available.
    #[error("No data available for {0}")]
    NoData(String),

    /// A field could not be read.
    #[error("Invalid value for {field}: {value:?}")]
    InvalidField {
        /// Field name, including the date it belongs to.
        field: String,
        /// Raw value.
        value: String,
    },

    /// Decoded data violates the data model.
    #[error(transparent)]
    Data(#[from] sirocco_traits::SiroccoError),
}
