//! Alpha Vantage API client implementation.

use crate::{
    Result,
    error::AvError,
    types::{OutputSize, parse_daily_prices, parse_news_sentiment},
};
use reqwest::Client;
use sirocco_traits::{PriceSeries, SentimentFeed};
use std::env;
use tracing::debug;

/// Base URL for the Alpha Vantage query API.
const AV_BASE_URL: &str = "https://www.alphavantage.co/query";

/// Articles requested from the news-sentiment endpoint by default.
pub const DEFAULT_NEWS_LIMIT: u32 = 200;

/// User agent sent with every request.
const USER_AGENT: &str = concat!("sirocco/", env!("CARGO_PKG_VERSION"));

/// Alpha Vantage API client.
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl AlphaVantageClient {
    /// Create a new client with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_key: api_key.into(),
            base_url: AV_BASE_URL.to_string(),
        }
    }

    /// Create a new client from the `ALPHAVANTAGE_API_KEY` environment variable.
    ///
    /// This will also load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set.
    pub fn from_env() -> Result<Self> {
        // Try to load .env file (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_key = env::var("ALPHAVANTAGE_API_KEY").map_err(|_| AvError::MissingApiKey)?;

        Ok(Self::new(api_key))
    }

    /// Point the client at another query endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build a query URL with the API key.
    fn url(&self, params: &[(&str, &str)]) -> String {
        let query: String = params
            .iter()
            .map(|(key, value)| format!("{key}={value}&"))
            .collect();
        format!("{}?{query}apikey={}", self.base_url, self.api_key)
    }

    /// Make a GET request and return the response body.
    async fn get(&self, params: &[(&str, &str)]) -> Result<String> {
        let url = self.url(params);
        debug!(function = params.first().map(|(_, f)| *f), "alpha vantage request");
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AvError::RateLimitExceeded(format!(
                "HTTP {}",
                response.status()
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AvError::Api(format!("HTTP {status}: {text}")));
        }

        Ok(response.text().await?)
    }

    /// Get daily closing prices for a symbol.
    ///
    /// # Arguments
    ///
    /// * `symbol` - Stock ticker symbol (e.g., "IBM")
    /// * `output_size` - Latest 100 days or full history
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API answers with a message
    /// instead of data, or a bar cannot be read.
    pub async fn daily_prices(&self, symbol: &str, output_size: OutputSize) -> Result<PriceSeries> {
        let symbol = symbol.to_uppercase();
        let body = self
            .get(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol.as_str()),
                ("outputsize", output_size.as_str()),
            ])
            .await?;
        parse_daily_prices(&body, &symbol)
    }

    /// Get the news-sentiment feed for a ticker.
    ///
    /// # Arguments
    ///
    /// * `ticker` - Stock ticker symbol
    /// * `limit` - Maximum number of articles
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API answers with a
    /// message instead of data.
    pub async fn news_sentiment(&self, ticker: &str, limit: u32) -> Result<SentimentFeed> {
        let ticker = ticker.to_uppercase();
        let limit = limit.to_string();
        let body = self
            .get(&[
                ("function", "NEWS_SENTIMENT"),
                ("tickers", ticker.as_str()),
                ("limit", limit.as_str()),
            ])
            .await?;
        parse_news_sentiment(&body)
    }

    /// Get both backtest inputs for a ticker.
    ///
    /// The two requests are issued concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first error of either request.
    pub async fn backtest_inputs(
        &self,
        ticker: &str,
        output_size: OutputSize,
        news_limit: u32,
    ) -> Result<(PriceSeries, SentimentFeed)> {
        let (prices, feed) = tokio::join!(
            self.daily_prices(ticker, output_size),
            self.news_sentiment(ticker, news_limit),
        );
        Ok((prices?, feed?))
    }
}
