#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/sirocco/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core type and trait definitions for the Sirocco backtester.
//!
//! This crate provides the data model shared between the data providers, the
//! signal resolver and the backtest engine.

/// The version of the sirocco-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod error;
pub mod signal;
pub mod types;

// Re-exports
pub use error::{Result, SiroccoError};
pub use signal::{Resolution, Signal, SignalResolver};
pub use types::{Article, Date, PriceSeries, SentimentFeed, Symbol, TickerSentiment};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }
}
