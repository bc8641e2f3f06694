//! Backtesting for sirocco.
//!
//! This crate walks a daily price series forward in time, asks a signal
//! resolver for a decision on every date and trades a single long-only
//! position:
//! - [`Portfolio`]: cash and whole shares held during a run
//! - [`Backtest`]: the walk-forward engine
//! - [`BacktestResult`]: trades, final value, P&L and the buy-and-hold baseline,
//!   printable as a text report
//!
//! # Example
//!
//! ```rust,ignore
//! use sirocco_eval::{Backtest, BacktestConfig};
//!
//! let backtest = Backtest::new(BacktestConfig::default());
//! let result = backtest.run(&prices, &feed, "IBM")?;
//! println!("{result}");
//! ```

pub mod backtest;
pub mod portfolio;
mod report;

// Re-export main types
pub use backtest::{
    Backtest, BacktestConfig, BacktestResult, DEFAULT_INITIAL_CAPITAL, ResolutionTally,
};
pub use portfolio::{Portfolio, Trade, TradeAction};
