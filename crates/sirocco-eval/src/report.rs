//! Text report for a finished backtest.

use crate::BacktestResult;
use std::fmt;

impl fmt::Display for BacktestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Running Backtest ---")?;
        writeln!(f, "Initial Portfolio Value: ${:.2}", self.initial_value)?;
        for trade in &self.trades {
            writeln!(f, "{trade}")?;
        }
        writeln!(f)?;
        writeln!(f, "--- Backtest Results ---")?;
        writeln!(f, "Final Portfolio Value: ${:.2}", self.final_value)?;
        writeln!(f, "Total Profit/Loss: ${:.2}", self.pnl)?;
        writeln!(f, "Buy and Hold Value: ${:.2}", self.buy_and_hold_value)?;
        write!(f, "-------------------------")
    }
}
