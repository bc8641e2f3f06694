//! Backtest command implementation.

use crate::{Format, SourceArgs, data};
use anyhow::Result;
use sirocco_eval::{Backtest, BacktestConfig, BacktestResult};
use sirocco_signals::SentimentThresholds;
use tracing::{info, warn};

/// Run the sentiment backtest for one ticker and print the report.
pub(crate) async fn run_backtest(
    ticker: &str,
    source: &SourceArgs,
    initial_capital: f64,
    thresholds: SentimentThresholds,
    format: Format,
) -> Result<()> {
    // Feed entries carry upper-case tickers.
    let ticker = ticker.to_uppercase();

    let config = BacktestConfig {
        initial_capital,
        thresholds,
    };
    config.validate()?;

    let (prices, feed) = data::load_inputs(&ticker, source).await?;
    if feed.is_empty() {
        warn!(ticker = %ticker, "news feed is empty, every date will hold");
    }

    let result = Backtest::new(config).run(&prices, &feed, &ticker)?;

    let tally = &result.resolutions;
    info!(
        buy = tally.buy,
        sell = tally.sell,
        hold = tally.hold,
        no_article = tally.no_article,
        no_ticker_entry = tally.no_ticker_entry,
        malformed = tally.malformed,
        "signal outcomes"
    );

    println!("{}", render(&result, format)?);
    Ok(())
}

/// Format a finished backtest for stdout.
fn render(result: &BacktestResult, format: Format) -> Result<String> {
    Ok(match format {
        Format::Text => result.to_string(),
        Format::Json => serde_json::to_string_pretty(result)?,
    })
}
