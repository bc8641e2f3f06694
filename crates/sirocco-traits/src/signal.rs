//! Trading signals and the resolver trait.
//!
//! A [`SignalResolver`] turns the sentiment feed into a [`Signal`] for one
//! ticker on one calendar date. The detailed outcome is reported as a
//! [`Resolution`] so callers can tell "no news" apart from "bad news data",
//! while the backtest only ever acts on the collapsed [`Signal`].

use crate::{Date, SentimentFeed};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The trading action suggested for a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    /// Enter a position.
    Buy,
    /// Liquidate the position.
    Sell,
    /// Do nothing.
    #[default]
    Hold,
}

impl Signal {
    /// Upper-case label used in reports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Hold => "HOLD",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detailed outcome of resolving a signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    /// A sentiment score was found and classified.
    Resolved {
        /// Signal derived from the score.
        signal: Signal,
        /// The score that decided it.
        score: f64,
    },
    /// No article was published on the date.
    NoArticle,
    /// Articles exist for the date but none carries the ticker.
    NoTickerEntry,
    /// The feed held data that could not be read before a decision was reached.
    Malformed {
        /// What was wrong.
        reason: String,
    },
}

impl Resolution {
    /// Builds a [`Resolution::Malformed`].
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }

    /// Collapses the outcome to the signal acted on: anything unresolved is a hold.
    #[must_use]
    pub const fn signal(&self) -> Signal {
        match self {
            Self::Resolved { signal, .. } => *signal,
            Self::NoArticle | Self::NoTickerEntry | Self::Malformed { .. } => Signal::Hold,
        }
    }

    /// Whether a score was found.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }

    /// Short machine-friendly name of the variant.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Resolved { .. } => "resolved",
            Self::NoArticle => "no_article",
            Self::NoTickerEntry => "no_ticker_entry",
            Self::Malformed { .. } => "malformed",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved { signal, score } => write!(f, "{signal} (score {score})"),
            Self::NoArticle => f.write_str("HOLD (no article on this date)"),
            Self::NoTickerEntry => f.write_str("HOLD (no sentiment for this ticker)"),
            Self::Malformed { reason } => write!(f, "HOLD (malformed feed data: {reason})"),
        }
    }
}

/// Resolves the trading signal for a ticker on a date.
///
/// Implementations must be pure: resolving the same `(feed, date, ticker)`
/// twice yields the same [`Resolution`]. They never fail; problems with the
/// feed are reported through [`Resolution::Malformed`].
pub trait SignalResolver: Send + Sync {
    /// Returns the name of this resolver, used in logs.
    fn name(&self) -> &str;

    /// Resolves the detailed outcome for `ticker` on `date`.
    fn resolve(&self, feed: &SentimentFeed, date: Date, ticker: &str) -> Resolution;

    /// Resolves and collapses to the signal acted on.
    fn signal(&self, feed: &SentimentFeed, date: Date, ticker: &str) -> Signal {
        self.resolve(feed, date, ticker).signal()
    }
}
