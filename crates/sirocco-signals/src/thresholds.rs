//! Score thresholds for sentiment signals.

use serde::{Deserialize, Serialize};
use sirocco_traits::{Result, Signal, SiroccoError};

/// Scores at or above this value produce a BUY.
pub const DEFAULT_BUY_THRESHOLD: f64 = 0.35;

/// Scores at or below this value produce a SELL.
pub const DEFAULT_SELL_THRESHOLD: f64 = -0.15;

/// Cut-offs that map a sentiment score to a [`Signal`].
///
/// Both boundaries are inclusive: `score >= buy` is a BUY, `score <= sell` is
/// a SELL, anything in between is a HOLD.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentThresholds {
    buy: f64,
    sell: f64,
}

impl SentimentThresholds {
    /// Creates thresholds, validating that `sell < buy`.
    ///
    /// # Errors
    ///
    /// Returns [`SiroccoError::InvalidData`] if either value is not finite or
    /// the sell threshold is not strictly below the buy threshold.
    pub fn new(buy: f64, sell: f64) -> Result<Self> {
        if !buy.is_finite() || !sell.is_finite() {
            return Err(SiroccoError::InvalidData(format!(
                "thresholds must be finite (buy {buy}, sell {sell})"
            )));
        }
        if sell >= buy {
            return Err(SiroccoError::InvalidData(format!(
                "sell threshold {sell} must be below buy threshold {buy}"
            )));
        }
        Ok(Self { buy, sell })
    }

    /// Minimum score for a BUY.
    #[must_use]
    pub const fn buy(&self) -> f64 {
        self.buy
    }

    /// Maximum score for a SELL.
    #[must_use]
    pub const fn sell(&self) -> f64 {
        self.sell
    }

    /// Classifies a score.
    #[must_use]
    pub fn classify(&self, score: f64) -> Signal {
        if score >= self.buy {
            Signal::Buy
        } else if score <= self.sell {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }
}

impl Default for SentimentThresholds {
    fn default() -> Self {
        Self {
            buy: DEFAULT_BUY_THRESHOLD,
            sell: DEFAULT_SELL_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let t = SentimentThresholds::default();
        assert_eq!(t.buy(), 0.35);
        assert_eq!(t.sell(), -0.15);
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let t = SentimentThresholds::default();
        assert_eq!(t.classify(0.35), Signal::Buy);
        assert_eq!(t.classify(-0.15), Signal::Sell);
        assert_eq!(t.classify(0.0), Signal::Hold);
        assert_eq!(t.classify(0.3499), Signal::Hold);
        assert_eq!(t.classify(-0.1499), Signal::Hold);
        assert_eq!(t.classify(0.9), Signal::Buy);
        assert_eq!(t.classify(-0.9), Signal::Sell);
    }

    #[test]
    fn test_custom_thresholds() {
        let t = SentimentThresholds::new(0.1, -0.1).unwrap();
        assert_eq!(t.classify(0.2), Signal::Buy);
        assert_eq!(t.classify(-0.2), Signal::Sell);
    }

    #[test]
    fn test_invalid_thresholds() {
        assert!(SentimentThresholds::new(0.1, 0.1).is_err());
        assert!(SentimentThresholds::new(-0.2, 0.2).is_err());
        assert!(SentimentThresholds::new(f64::NAN, 0.0).is_err());
        assert!(SentimentThresholds::new(0.5, f64::NEG_INFINITY).is_err());
    }
}
