//! Data types for Alpha Vantage API responses.

use crate::{Result, error::AvError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sirocco_traits::{Article, PriceSeries, SentimentFeed, TickerSentiment, types::parse_iso_date};
use std::collections::BTreeMap;
use tracing::warn;

/// Amount of daily history to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputSize {
    /// Latest 100 trading days.
    #[default]
    Compact,
    /// Full history.
    Full,
}

impl OutputSize {
    /// Get the API parameter value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Full => "full",
        }
    }
}

/// Accepts a string or a number; anything else decodes as missing.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Accepts an array of ticker entries; unreadable entries decode as empty ones.
fn lenient_entries<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Vec<TickerSentimentItem>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .map(|item| serde_json::from_value(item).unwrap_or_default())
                .collect(),
        ),
        _ => None,
    })
}

/// Metadata block of a daily time-series response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyMetaData {
    /// Description of the series.
    #[serde(rename = "1. Information", default)]
    pub information: Option<String>,
    /// Ticker symbol.
    #[serde(rename = "2. Symbol", default)]
    pub symbol: Option<String>,
    /// Date of the latest bar.
    #[serde(rename = "3. Last Refreshed", default)]
    pub last_refreshed: Option<String>,
    /// Compact or full.
    #[serde(rename = "4. Output Size", default)]
    pub output_size: Option<String>,
    /// Exchange time zone.
    #[serde(rename = "5. Time Zone", default)]
    pub time_zone: Option<String>,
}

/// One daily bar. Alpha Vantage encodes all values as strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyBar {
    /// Open price.
    #[serde(rename = "1. open", default)]
    pub open: String,
    /// High price.
    #[serde(rename = "2. high", default)]
    pub high: String,
    /// Low price.
    #[serde(rename = "3. low", default)]
    pub low: String,
    /// Close price.
    #[serde(rename = "4. close", default)]
    pub close: String,
    /// Volume.
    #[serde(rename = "5. volume", default)]
    pub volume: String,
}

impl DailyBar {
    /// Parse the close price.
    #[must_use]
    pub fn parsed_close(&self) -> Option<f64> {
        self.close.trim().parse().ok()
    }
}

/// `TIME_SERIES_DAILY` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailySeriesResponse {
    /// Metadata.
    #[serde(rename = "Meta Data", default)]
    pub meta_data: Option<DailyMetaData>,
    /// Bars keyed by `YYYY-MM-DD`.
    #[serde(rename = "Time Series (Daily)", default)]
    pub time_series: Option<BTreeMap<String, DailyBar>>,
}

impl DailySeriesResponse {
    /// Convert the bars into a closing-price series.
    ///
    /// # Errors
    ///
    /// Returns [`AvError::NoData`] if the response has no time series, and
    /// an error if a date or close cannot be read.
    pub fn into_price_series(self, symbol: &str) -> Result<PriceSeries> {
        let bars = self
            .time_series
            .ok_or_else(|| AvError::NoData(symbol.to_string()))?;

        let mut prices = PriceSeries::new();
        for (date, bar) in bars {
            let close = bar.parsed_close().ok_or_else(|| AvError::InvalidField {
                field: format!("4. close on {date}"),
                value: bar.close.clone(),
            })?;
            prices.insert(parse_iso_date(&date)?, close)?;
        }
        Ok(prices)
    }
}

/// Sentiment toward one ticker within a news item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickerSentimentItem {
    /// Ticker symbol.
    #[serde(default, deserialize_with = "lenient_string")]
    pub ticker: Option<String>,
    /// Relevance of the article to the ticker.
    #[serde(default, deserialize_with = "lenient_string")]
    pub relevance_score: Option<String>,
    /// Sentiment score (string-encoded number).
    #[serde(default, deserialize_with = "lenient_string")]
    pub ticker_sentiment_score: Option<String>,
    /// Bullish / Bearish / Neutral label.
    #[serde(default, deserialize_with = "lenient_string")]
    pub ticker_sentiment_label: Option<String>,
}

impl From<TickerSentimentItem> for TickerSentiment {
    fn from(item: TickerSentimentItem) -> Self {
        Self {
            ticker: item.ticker,
            score: item.ticker_sentiment_score,
        }
    }
}

/// One news item of the sentiment feed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedItem {
    /// Headline.
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    /// Article URL.
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: Option<String>,
    /// Publication timestamp, `YYYYMMDDThhmmss`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub time_published: Option<String>,
    /// Publisher.
    #[serde(default, deserialize_with = "lenient_string")]
    pub source: Option<String>,
    /// Overall sentiment label.
    #[serde(default, deserialize_with = "lenient_string")]
    pub overall_sentiment_label: Option<String>,
    /// Per-ticker sentiment.
    #[serde(default, deserialize_with = "lenient_entries")]
    pub ticker_sentiment: Option<Vec<TickerSentimentItem>>,
}

impl From<FeedItem> for Article {
    fn from(item: FeedItem) -> Self {
        Self {
            title: item.title,
            url: item.url,
            time_published: item.time_published,
            ticker_sentiment: item
                .ticker_sentiment
                .map(|entries| entries.into_iter().map(TickerSentiment::from).collect()),
        }
    }
}

/// `NEWS_SENTIMENT` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsSentimentResponse {
    /// Number of items returned (string-encoded).
    #[serde(default, deserialize_with = "lenient_string")]
    pub items: Option<String>,
    /// News items, in API order.
    #[serde(default)]
    pub feed: Option<Vec<FeedItem>>,
}

impl NewsSentimentResponse {
    /// Convert the items into a sentiment feed, keeping API order.
    #[must_use]
    pub fn into_feed(self) -> SentimentFeed {
        self.feed
            .unwrap_or_default()
            .into_iter()
            .map(Article::from)
            .collect()
    }
}

/// Fails on a body that is only an `"Error Message"` object.
fn check_error_message(value: &Value) -> Result<()> {
    match value.get("Error Message").and_then(Value::as_str) {
        Some(msg) => Err(AvError::Api(msg.to_string())),
        None => Ok(()),
    }
}

/// Notice that replaced the payload of a response.
///
/// Alpha Vantage answers throttled or unsupported requests with HTTP 200 and
/// a `"Note"` or `"Information"` object instead of data.
fn api_notice(value: &Value) -> Option<AvError> {
    let message = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);

    if let Some(msg) = message("Note") {
        return Some(AvError::RateLimitExceeded(msg));
    }
    message("Information").map(|msg| {
        if msg.to_lowercase().contains("rate limit") {
            AvError::RateLimitExceeded(msg)
        } else {
            AvError::Api(msg)
        }
    })
}

/// Decode a `TIME_SERIES_DAILY` body into closing prices.
///
/// # Errors
///
/// Returns an error if the body is not JSON, carries an API message instead
/// of data, has no time series, or holds an unreadable date or close.
pub fn parse_daily_prices(body: &str, symbol: &str) -> Result<PriceSeries> {
    let value: Value = serde_json::from_str(body)?;
    check_error_message(&value)?;
    let notice = api_notice(&value);

    let response: DailySeriesResponse = serde_json::from_value(value)?;
    if response.time_series.is_none()
        && let Some(err) = notice
    {
        return Err(err);
    }
    response.into_price_series(symbol)
}

/// Decode a `NEWS_SENTIMENT` body into a sentiment feed.
///
/// A body without a `feed` array yields an empty feed unless it carries an
/// API message, in which case that message is returned as the error.
///
/// # Errors
///
/// Returns an error if the body is not JSON or carries an API message
/// instead of data.
pub fn parse_news_sentiment(body: &str) -> Result<SentimentFeed> {
    let value: Value = serde_json::from_str(body)?;
    check_error_message(&value)?;
    let notice = api_notice(&value);

    let response: NewsSentimentResponse = serde_json::from_value(value)?;
    if response.feed.is_none() {
        if let Some(err) = notice {
            return Err(err);
        }
        warn!("news sentiment response has no feed, every date will hold");
    }
    Ok(response.into_feed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sirocco_traits::Date;

    const DAILY_BODY: &str = r#"{
        "Meta Data": {
            "1. Information": "Daily Prices (open, high, low, close) and Volumes",
            "2. Symbol": "IBM",
            "3. Last Refreshed": "2024-01-03",
            "4. Output Size": "Compact",
            "5. Time Zone": "US/Eastern"
        },
        "Time Series (Daily)": {
            "2024-01-03": {"1. open": "161.00", "2. high": "161.73", "3. low": "160.08", "4. close": "160.10", "5. volume": "4086133"},
            "2024-01-02": {"1. open": "162.83", "2. high": "163.29", "3. low": "160.38", "4. close": "161.50", "5. volume": "3825045"}
        }
    }"#;

    const NEWS_BODY: &str = r#"{
        "items": "3",
        "sentiment_score_definition": "x <= -0.35: Bearish; ...",
        "feed": [
            {
                "title": "IBM beats estimates",
                "url": "https://example.com/a",
                "time_published": "20240102T143000",
                "source": "Wire",
                "ticker_sentiment": [
                    {"ticker": "MSFT", "relevance_score": "0.1", "ticker_sentiment_score": "0.05", "ticker_sentiment_label": "Neutral"},
                    {"ticker": "IBM", "relevance_score": "0.9", "ticker_sentiment_score": "0.512", "ticker_sentiment_label": "Bullish"}
                ]
            },
            {
                "title": "Numeric score",
                "time_published": "20240103T090000",
                "ticker_sentiment": [{"ticker": "IBM", "ticker_sentiment_score": -0.3}]
            },
            {
                "title": "Odd entries",
                "time_published": "20240104T090000",
                "ticker_sentiment": [42, {"ticker": null, "ticker_sentiment_score": "0.2"}]
            }
        ]
    }"#;

    #[test]
    fn test_parse_daily_prices() {
        let prices = parse_daily_prices(DAILY_BODY, "IBM").unwrap();
        assert_eq!(prices.len(), 2);
        let first = Date::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(prices.first(), Some((first, 161.50)));
        assert_eq!(prices.close(Date::from_ymd_opt(2024, 1, 3).unwrap()), Some(160.10));
    }

    #[test]
    fn test_parse_daily_prices_bad_close() {
        let body = r#"{"Time Series (Daily)": {"2024-01-02": {"4. close": "n/a"}}}"#;
        let err = parse_daily_prices(body, "IBM").unwrap_err();
        assert!(matches!(err, AvError::InvalidField { .. }));
    }

    #[test]
    fn test_parse_daily_prices_missing_series() {
        let err = parse_daily_prices(r#"{"Meta Data": {}}"#, "IBM").unwrap_err();
        assert!(matches!(err, AvError::NoData(ref s) if s == "IBM"));
    }

    #[test]
    fn test_parse_daily_prices_api_messages() {
        let err = parse_daily_prices(r#"{"Error Message": "Invalid API call."}"#, "IBM").unwrap_err();
        assert!(matches!(err, AvError::Api(_)));

        let err = parse_daily_prices(r#"{"Note": "Thank you for using Alpha Vantage!"}"#, "IBM")
            .unwrap_err();
        assert!(matches!(err, AvError::RateLimitExceeded(_)));

        let body = r#"{"Information": "We have detected your API key and our standard API rate limit is 25 requests per day."}"#;
        let err = parse_daily_prices(body, "IBM").unwrap_err();
        assert!(matches!(err, AvError::RateLimitExceeded(_)));
    }

    #[test]
    fn test_parse_daily_prices_not_json() {
        let err = parse_daily_prices("<html>", "IBM").unwrap_err();
        assert!(matches!(err, AvError::Json(_)));
    }

    #[test]
    fn test_parse_news_sentiment() {
        let feed = parse_news_sentiment(NEWS_BODY).unwrap();
        assert_eq!(feed.len(), 3);

        let first = &feed.articles()[0];
        assert_eq!(first.title.as_deref(), Some("IBM beats estimates"));
        let entries = first.ticker_sentiment.as_ref().unwrap();
        assert_eq!(entries[1], TickerSentiment::new("IBM", "0.512"));

        let numeric = &feed.articles()[1].ticker_sentiment.as_ref().unwrap()[0];
        assert_eq!(numeric.score.as_deref(), Some("-0.3"));

        let odd = feed.articles()[2].ticker_sentiment.as_ref().unwrap();
        assert_eq!(odd.len(), 2);
        assert_eq!(odd[0], TickerSentiment::default());
        assert_eq!(odd[1].ticker, None);
    }

    #[test]
    fn test_parse_news_sentiment_without_feed() {
        let feed = parse_news_sentiment(r#"{"items": "0"}"#).unwrap();
        assert!(feed.is_empty());

        let err = parse_news_sentiment(r#"{"Information": "Invalid inputs."}"#).unwrap_err();
        assert!(matches!(err, AvError::Api(_)));

        let err = parse_news_sentiment(r#"{"Error Message": "bad"}"#).unwrap_err();
        assert!(matches!(err, AvError::Api(_)));
    }

    #[test]
    fn test_output_size() {
        assert_eq!(OutputSize::default().as_str(), "compact");
        assert_eq!(OutputSize::Full.as_str(), "full");
    }
}
