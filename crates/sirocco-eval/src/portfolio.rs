//! Single-position portfolio state and executed trades.

use serde::{Deserialize, Serialize};
use sirocco_traits::Date;
use std::fmt;

/// Direction of an executed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeAction {
    /// Shares bought with available cash.
    Buy,
    /// Whole position sold.
    Sell,
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => f.write_str("BUY"),
            Self::Sell => f.write_str("SELL"),
        }
    }
}

/// A trade executed by the backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Trading date.
    pub date: Date,
    /// Buy or sell.
    pub action: TradeAction,
    /// Number of shares traded.
    pub shares: u64,
    /// Execution price (the day's close).
    pub price: f64,
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} {} shares at ${:.2}",
            self.date, self.action, self.shares, self.price
        )
    }
}

/// Cash and whole shares of a single security.
///
/// Only whole shares are bought and a sale always liquidates the full
/// position, so neither `cash` nor `shares` can go negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    cash: f64,
    shares: u64,
    initial_value: f64,
}

impl Portfolio {
    /// Create a portfolio holding `initial_capital` in cash.
    #[must_use]
    pub const fn new(initial_capital: f64) -> Self {
        Self {
            cash: initial_capital,
            shares: 0,
            initial_value: initial_capital,
        }
    }

    /// Cash on hand.
    #[must_use]
    pub const fn cash(&self) -> f64 {
        self.cash
    }

    /// Shares held.
    #[must_use]
    pub const fn shares(&self) -> u64 {
        self.shares
    }

    /// Cash at the start of the run.
    #[must_use]
    pub const fn initial_value(&self) -> f64 {
        self.initial_value
    }

    /// Mark-to-market value at `price`.
    #[must_use]
    pub fn value(&self, price: f64) -> f64 {
        self.cash + self.shares as f64 * price
    }

    /// Spend as much cash as possible on whole shares at `price`.
    ///
    /// Returns the number of shares bought, or `None` if not even one share
    /// is affordable (or the price is not positive). The position never grows
    /// past `u64::MAX` shares.
    pub fn buy(&mut self, price: f64) -> Option<u64> {
        if price <= 0.0 || self.cash < price {
            return None;
        }

        // A quotient beyond what the position can still hold is capped there.
        let headroom = u64::MAX - self.shares;
        let quotient = (self.cash / price).floor();
        let mut quantity = if quotient >= headroom as f64 {
            headroom
        } else {
            quotient as u64
        };
        // Division can round up to the next whole share.
        if quantity as f64 * price > self.cash {
            quantity = quantity.saturating_sub(1);
        }
        if quantity == 0 {
            return None;
        }

        self.shares = self.shares.checked_add(quantity)?;
        self.cash = (self.cash - quantity as f64 * price).max(0.0);
        Some(quantity)
    }

    /// Sell the whole position at `price`.
    ///
    /// Returns the number of shares sold, or `None` if nothing is held.
    pub fn sell(&mut self, price: f64) -> Option<u64> {
        if self.shares == 0 {
            return None;
        }

        let quantity = self.shares;
        self.cash += quantity as f64 * price;
        self.shares = 0;
        Some(quantity)
    }
}
