//! First-match news-sentiment resolver.

use crate::SentimentThresholds;
use sirocco_traits::{Date, Resolution, SentimentFeed, SignalResolver, TickerSentiment};

/// Resolves signals from the first sentiment score published for a ticker on a date.
///
/// Articles are consulted in feed order. The first article published on the
/// date that carries an entry for the ticker decides, using the first such
/// entry; articles of that date without the ticker are passed over. Scores
/// are classified with the configured [`SentimentThresholds`].
///
/// Feed order is the provider's order and is not necessarily chronological,
/// so with several articles on one date the outcome depends on that order.
///
/// Any unreadable data met along the way (an article whose timestamp has no
/// date, a missing ticker list or ticker, a score that is not a number) stops
/// the lookup with [`Resolution::Malformed`], which a backtest treats as HOLD.
///
/// # Example
///
/// ```
/// use sirocco_signals::SentimentResolver;
/// use sirocco_traits::{Article, Date, SentimentFeed, Signal, SignalResolver, TickerSentiment};
///
/// let feed = SentimentFeed::new(vec![Article::new(
///     "20240101T093000",
///     vec![TickerSentiment::new("IBM", "0.5")],
/// )]);
/// let date = Date::from_ymd_opt(2024, 1, 1).unwrap();
///
/// let resolver = SentimentResolver::default();
/// assert_eq!(resolver.signal(&feed, date, "IBM"), Signal::Buy);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SentimentResolver {
    thresholds: SentimentThresholds,
}

impl SentimentResolver {
    /// Create a resolver with the given thresholds.
    #[must_use]
    pub const fn new(thresholds: SentimentThresholds) -> Self {
        Self { thresholds }
    }

    /// Get the thresholds in use.
    #[must_use]
    pub const fn thresholds(&self) -> SentimentThresholds {
        self.thresholds
    }

    fn classify_entry(&self, pos: usize, entry: &TickerSentiment) -> Resolution {
        let Some(raw) = entry.score.as_deref() else {
            return Resolution::malformed(format!("article {pos}: missing sentiment score"));
        };
        match raw.trim().parse::<f64>() {
            Ok(score) if score.is_finite() => Resolution::Resolved {
                signal: self.thresholds.classify(score),
                score,
            },
            _ => Resolution::malformed(format!("article {pos}: non-numeric score {raw:?}")),
        }
    }
}

impl SignalResolver for SentimentResolver {
    fn name(&self) -> &str {
        "news_sentiment"
    }

    fn resolve(&self, feed: &SentimentFeed, date: Date, ticker: &str) -> Resolution {
        let undated = feed.first_undated();
        let undated_error =
            |bad: usize| Resolution::malformed(format!("article {bad}: unreadable timestamp"));
        let mut saw_article = false;

        for (pos, article) in feed.articles_on(date) {
            // A front-to-back scan would have stopped at the undated article first.
            if let Some(bad) = undated
                && bad < pos
            {
                return undated_error(bad);
            }
            saw_article = true;

            let Some(entries) = article.ticker_sentiment.as_deref() else {
                return Resolution::malformed(format!("article {pos}: missing ticker_sentiment"));
            };
            for entry in entries {
                match entry.ticker.as_deref() {
                    Some(t) if t == ticker => return self.classify_entry(pos, entry),
                    Some(_) => {}
                    None => {
                        return Resolution::malformed(format!(
                            "article {pos}: ticker entry without a ticker"
                        ));
                    }
                }
            }
        }

        // Nothing matched, so the scan would have run over the whole feed.
        if let Some(bad) = undated {
            return undated_error(bad);
        }
        if saw_article {
            Resolution::NoTickerEntry
        } else {
            Resolution::NoArticle
        }
    }
}
