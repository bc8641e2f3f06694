//! Common types used throughout the Sirocco backtester.
//!
//! This module defines the two inputs of a backtest: the daily closing price
//! series and the news-sentiment feed.

use crate::{Result, SiroccoError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, btree_map::Entry};

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// A market symbol identifier, such as "IBM".
pub type Symbol = String;

/// Parse a date string in `YYYY-MM-DD` format.
///
/// # Errors
///
/// Returns [`SiroccoError::InvalidDate`] if the string is not an ISO calendar date.
pub fn parse_iso_date(date_str: &str) -> Result<Date> {
    Date::parse_from_str(date_str.trim(), "%Y-%m-%d")
        .map_err(|e| SiroccoError::InvalidDate(format!("{date_str:?}: {e}")))
}

/// Daily closing prices keyed by calendar date.
///
/// Dates are unique and iteration is always in ascending chronological order,
/// whatever order the prices were inserted in.
///
/// # Example
///
/// ```
/// use sirocco_traits::PriceSeries;
///
/// let prices = PriceSeries::from_iso_pairs([("2024-01-02", 110.0), ("2024-01-01", 100.0)])?;
/// let (first, close) = prices.first().unwrap();
/// assert_eq!(first.to_string(), "2024-01-01");
/// assert_eq!(close, 100.0);
/// # Ok::<(), sirocco_traits::SiroccoError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    closes: BTreeMap<Date, f64>,
}

impl PriceSeries {
    /// Creates an empty price series.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            closes: BTreeMap::new(),
        }
    }

    /// Builds a series from `(YYYY-MM-DD, close)` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if a date is malformed, repeated, or a close is
    /// negative or not finite.
    pub fn from_iso_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut series = Self::new();
        for (date, close) in pairs {
            series.insert(parse_iso_date(date.as_ref())?, close)?;
        }
        Ok(series)
    }

    /// Adds the close for `date`.
    ///
    /// # Errors
    ///
    /// Returns [`SiroccoError::InvalidData`] if `date` is already present or
    /// `close` is negative or not finite.
    pub fn insert(&mut self, date: Date, close: f64) -> Result<()> {
        if !close.is_finite() || close < 0.0 {
            return Err(SiroccoError::InvalidData(format!(
                "close on {date} must be a non-negative number, got {close}"
            )));
        }
        match self.closes.entry(date) {
            Entry::Occupied(_) => Err(SiroccoError::InvalidData(format!(
                "duplicate price for {date}"
            ))),
            Entry::Vacant(slot) => {
                slot.insert(close);
                Ok(())
            }
        }
    }

    /// Returns the close on `date`, if present.
    #[must_use]
    pub fn close(&self, date: Date) -> Option<f64> {
        self.closes.get(&date).copied()
    }

    /// Returns the earliest date and its close.
    #[must_use]
    pub fn first(&self) -> Option<(Date, f64)> {
        self.closes.first_key_value().map(|(d, c)| (*d, *c))
    }

    /// Returns the latest date and its close.
    #[must_use]
    pub fn last(&self) -> Option<(Date, f64)> {
        self.closes.last_key_value().map(|(d, c)| (*d, *c))
    }

    /// Iterates over `(date, close)` pairs in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = (Date, f64)> + '_ {
        self.closes.iter().map(|(d, c)| (*d, *c))
    }

    /// Returns all dates in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = Date> + '_ {
        self.closes.keys().copied()
    }

    /// Returns the number of trading dates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.closes.len()
    }

    /// Returns whether the series has no prices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }
}

/// Sentiment toward one ticker within an article.
///
/// Both fields are kept as delivered by the provider; a missing ticker or a
/// score that does not parse is only detected when the entry is consulted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerSentiment {
    /// Ticker symbol the score refers to.
    pub ticker: Option<Symbol>,
    /// String-encoded sentiment score, roughly in [-1, 1].
    pub score: Option<String>,
}

impl TickerSentiment {
    /// Creates an entry with both fields present.
    pub fn new(ticker: impl Into<Symbol>, score: impl Into<String>) -> Self {
        Self {
            ticker: Some(ticker.into()),
            score: Some(score.into()),
        }
    }
}

/// A news article from the sentiment feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Headline.
    pub title: Option<String>,
    /// Link to the article.
    pub url: Option<String>,
    /// Publication timestamp in `YYYYMMDDThhmmss` form.
    pub time_published: Option<String>,
    /// Per-ticker sentiment entries, in provider order.
    pub ticker_sentiment: Option<Vec<TickerSentiment>>,
}

impl Article {
    /// Creates an article published at `time_published` with the given entries.
    pub fn new(time_published: impl Into<String>, ticker_sentiment: Vec<TickerSentiment>) -> Self {
        Self {
            title: None,
            url: None,
            time_published: Some(time_published.into()),
            ticker_sentiment: Some(ticker_sentiment),
        }
    }

    /// Calendar date of publication.
    ///
    /// Reads the first eight characters of the timestamp as `YYYYMMDD`; the
    /// time of day is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`SiroccoError::InvalidDate`] if the timestamp is missing, too
    /// short, or its prefix is not a calendar date.
    pub fn published_date(&self) -> Result<Date> {
        let raw = self
            .time_published
            .as_deref()
            .ok_or_else(|| SiroccoError::InvalidDate("missing time_published".to_string()))?;
        let prefix = raw
            .get(..8)
            .filter(|p| p.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| SiroccoError::InvalidDate(format!("malformed timestamp {raw:?}")))?;

        // The prefix is eight ASCII digits, so the slices below cannot fail.
        let year: i32 = prefix[..4].parse().unwrap_or_default();
        let month: u32 = prefix[4..6].parse().unwrap_or_default();
        let day: u32 = prefix[6..8].parse().unwrap_or_default();

        Date::from_ymd_opt(year, month, day)
            .ok_or_else(|| SiroccoError::InvalidDate(format!("no such date in {raw:?}")))
    }
}

/// Collection of dated articles, in the order the provider yielded them.
///
/// Articles are indexed by publication date when the feed is built. The index
/// keeps feed order within a date and remembers where the first article with
/// an unreadable timestamp sits, so a lookup sees exactly what a front-to-back
/// scan of the feed would see.
#[derive(Debug, Clone, Default)]
pub struct SentimentFeed {
    articles: Vec<Article>,
    by_date: HashMap<Date, Vec<usize>>,
    first_undated: Option<usize>,
}

impl SentimentFeed {
    /// Builds a feed from articles in provider order.
    #[must_use]
    pub fn new(articles: Vec<Article>) -> Self {
        let mut by_date: HashMap<Date, Vec<usize>> = HashMap::new();
        let mut first_undated = None;

        for (pos, article) in articles.iter().enumerate() {
            match article.published_date() {
                Ok(date) => by_date.entry(date).or_default().push(pos),
                Err(_) => {
                    first_undated.get_or_insert(pos);
                }
            }
        }

        Self {
            articles,
            by_date,
            first_undated,
        }
    }

    /// All articles, in feed order.
    #[must_use]
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    /// Articles published on `date` with their feed positions, in feed order.
    pub fn articles_on(&self, date: Date) -> impl Iterator<Item = (usize, &Article)> + '_ {
        self.by_date
            .get(&date)
            .into_iter()
            .flatten()
            .map(|&pos| (pos, &self.articles[pos]))
    }

    /// Position of the first article whose publication date cannot be derived.
    #[must_use]
    pub const fn first_undated(&self) -> Option<usize> {
        self.first_undated
    }

    /// Number of distinct publication dates.
    #[must_use]
    pub fn date_count(&self) -> usize {
        self.by_date.len()
    }

    /// Returns the number of articles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    /// Returns whether the feed has no articles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

impl FromIterator<Article> for SentimentFeed {
    fn from_iter<I: IntoIterator<Item = Article>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_price_series_sorted() {
        let prices = PriceSeries::from_iso_pairs([
            ("2024-01-03", 103.0),
            ("2024-01-01", 101.0),
            ("2024-01-02", 102.0),
        ])
        .unwrap();

        let dates: Vec<Date> = prices.dates().collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]
        );
        assert_eq!(prices.first(), Some((date(2024, 1, 1), 101.0)));
        assert_eq!(prices.last(), Some((date(2024, 1, 3), 103.0)));
        assert_eq!(prices.close(date(2024, 1, 2)), Some(102.0));
        assert_eq!(prices.len(), 3);
    }

    #[test]
    fn test_price_series_rejects_duplicates() {
        let result = PriceSeries::from_iso_pairs([("2024-01-01", 1.0), ("2024-01-01", 2.0)]);
        assert!(matches!(result, Err(SiroccoError::InvalidData(_))));

        let mut prices = PriceSeries::new();
        prices.insert(date(2024, 1, 1), 100.0).unwrap();
        let err = prices.insert(date(2024, 1, 1), 999.0).unwrap_err();
        assert!(matches!(err, SiroccoError::InvalidData(_)));
        assert_eq!(prices.close(date(2024, 1, 1)), Some(100.0));
        assert_eq!(prices.len(), 1);
    }

    #[test]
    fn test_price_series_rejects_bad_close() {
        let mut prices = PriceSeries::new();
        assert!(prices.insert(date(2024, 1, 1), -1.0).is_err());
        assert!(prices.insert(date(2024, 1, 1), f64::NAN).is_err());
        assert!(prices.insert(date(2024, 1, 1), 0.0).is_ok());
    }

    #[test]
    fn test_price_series_rejects_bad_date() {
        let result = PriceSeries::from_iso_pairs([("01/02/2024", 1.0)]);
        assert!(matches!(result, Err(SiroccoError::InvalidDate(_))));
    }

    #[test]
    fn test_published_date_truncates_time() {
        let article = Article::new("20231026T143000", vec![]);
        assert_eq!(article.published_date().unwrap(), date(2023, 10, 26));
    }

    #[test]
    fn test_published_date_malformed() {
        assert!(Article::new("2023", vec![]).published_date().is_err());
        assert!(Article::new("2023-10-26", vec![]).published_date().is_err());
        assert!(Article::new("20231341T000000", vec![]).published_date().is_err());
        assert!(Article::default().published_date().is_err());
    }

    #[test]
    fn test_feed_index_keeps_feed_order() {
        let feed = SentimentFeed::new(vec![
            Article::new("20240102T090000", vec![]),
            Article::new("20240101T120000", vec![]),
            Article::new("bogus", vec![]),
            Article::new("20240101T080000", vec![]),
        ]);

        let positions: Vec<usize> = feed.articles_on(date(2024, 1, 1)).map(|(p, _)| p).collect();
        assert_eq!(positions, vec![1, 3]);
        assert_eq!(feed.first_undated(), Some(2));
        assert_eq!(feed.date_count(), 2);
        assert_eq!(feed.articles_on(date(2024, 1, 5)).count(), 0);
    }
}
