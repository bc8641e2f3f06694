//! Alpha Vantage API client for Sirocco.
//!
//! This crate fetches the two inputs of a sentiment backtest from the
//! [Alpha Vantage](https://www.alphavantage.co/) API: daily closing prices
//! (`TIME_SERIES_DAILY`) and the news-sentiment feed (`NEWS_SENTIMENT`).
//!
//! # Usage
//!
//! ```rust,ignore
//! use sirocco_av::{AlphaVantageClient, OutputSize};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = AlphaVantageClient::from_env()?;
//!
//!     // Daily closes, most recent 100 trading days
//!     let prices = client.daily_prices("IBM", OutputSize::Compact).await?;
//!
//!     // Up to 200 recent articles mentioning the ticker
//!     let feed = client.news_sentiment("IBM", 200).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! Saved responses can be decoded offline with [`parse_daily_prices`] and
//! [`parse_news_sentiment`].
//!
//! # Environment Variables
//!
//! Set `ALPHAVANTAGE_API_KEY` in your environment or `.env` file:
//!
//! ```bash
//! ALPHAVANTAGE_API_KEY=your_api_key_here
//! ```

mod client;
mod error;
mod types;

pub use client::{AlphaVantageClient, DEFAULT_NEWS_LIMIT};
pub use error::AvError;
pub use types::*;

/// Result type for Alpha Vantage operations.
pub type Result<T> = std::result::Result<T, AvError>;
