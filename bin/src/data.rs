//! Data loading utilities for the Sirocco CLI.

use crate::SourceArgs;
use anyhow::{Context, Result};
use sirocco_av::{AlphaVantageClient, OutputSize, parse_daily_prices, parse_news_sentiment};
use sirocco_traits::{PriceSeries, SentimentFeed};
use std::fs;
use std::path::Path;
use tracing::info;

/// Load both backtest inputs for a ticker.
///
/// Each input is read from its file when one is given and fetched from
/// Alpha Vantage otherwise. When both are fetched the requests run
/// concurrently.
pub(crate) async fn load_inputs(
    ticker: &str,
    source: &SourceArgs,
) -> Result<(PriceSeries, SentimentFeed)> {
    let output_size = OutputSize::from(source.outputsize);

    match (source.prices.as_deref(), source.feed.as_deref()) {
        (Some(prices), Some(feed)) => Ok((read_prices(prices, ticker)?, read_feed(feed)?)),
        (None, None) => {
            info!(ticker, "fetching prices and news sentiment");
            let client = AlphaVantageClient::from_env()?;
            Ok(client
                .backtest_inputs(ticker, output_size, source.limit)
                .await?)
        }
        (prices, feed) => {
            let prices = load_prices(ticker, prices, output_size).await?;
            let feed = load_feed(ticker, feed, source.limit).await?;
            Ok((prices, feed))
        }
    }
}

/// Load daily closes from a file or the API.
pub(crate) async fn load_prices(
    ticker: &str,
    path: Option<&Path>,
    output_size: OutputSize,
) -> Result<PriceSeries> {
    match path {
        Some(path) => read_prices(path, ticker),
        None => {
            info!(ticker, "fetching daily prices");
            let client = AlphaVantageClient::from_env()?;
            Ok(client.daily_prices(ticker, output_size).await?)
        }
    }
}

/// Load the news-sentiment feed from a file or the API.
pub(crate) async fn load_feed(
    ticker: &str,
    path: Option<&Path>,
    limit: u32,
) -> Result<SentimentFeed> {
    match path {
        Some(path) => read_feed(path),
        None => {
            info!(ticker, limit, "fetching news sentiment");
            let client = AlphaVantageClient::from_env()?;
            Ok(client.news_sentiment(ticker, limit).await?)
        }
    }
}

fn read_prices(path: &Path, ticker: &str) -> Result<PriceSeries> {
    let body = fs::read_to_string(path)
        .with_context(|| format!("failed to read prices from {}", path.display()))?;
    let prices = parse_daily_prices(&body, ticker)
        .with_context(|| format!("invalid price data in {}", path.display()))?;
    info!(path = %path.display(), days = prices.len(), "loaded prices");
    Ok(prices)
}

fn read_feed(path: &Path) -> Result<SentimentFeed> {
    let body = fs::read_to_string(path)
        .with_context(|| format!("failed to read news feed from {}", path.display()))?;
    let feed = parse_news_sentiment(&body)
        .with_context(|| format!("invalid news feed in {}", path.display()))?;
    info!(path = %path.display(), articles = feed.len(), "loaded news feed");
    Ok(feed)
}
