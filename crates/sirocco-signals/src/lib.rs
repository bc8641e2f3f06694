//! Signal resolution for the sirocco backtester.
//!
//! This crate turns a news-sentiment feed into BUY / SELL / HOLD decisions:
//! - [`SentimentThresholds`]: the score cut-offs for buying and selling
//! - [`SentimentResolver`]: first-match lookup of a ticker's score on a date
//!
//! # Example
//!
//! ```ignore
//! use sirocco_signals::SentimentResolver;
//! use sirocco_traits::SignalResolver;
//!
//! let resolver = SentimentResolver::default();
//! let signal = resolver.signal(&feed, date, "IBM");
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod sentiment;
pub mod thresholds;

// Re-export key types
pub use sentiment::SentimentResolver;
pub use thresholds::{DEFAULT_BUY_THRESHOLD, DEFAULT_SELL_THRESHOLD, SentimentThresholds};
