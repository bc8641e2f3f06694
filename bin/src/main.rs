//! Sirocco CLI binary.
//!
//! Provides command-line interface for the Sirocco sentiment backtester.

mod cmd;
mod data;
mod logging;

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use sirocco_av::{DEFAULT_NEWS_LIMIT, OutputSize};
use sirocco_eval::DEFAULT_INITIAL_CAPITAL;
use sirocco_signals::{DEFAULT_BUY_THRESHOLD, DEFAULT_SELL_THRESHOLD, SentimentThresholds};
use std::path::PathBuf;
use std::process;

#[derive(Debug, Parser)]
#[command(name = "sirocco")]
#[command(about = "News-sentiment backtester for daily equity prices", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a sentiment backtest
    Backtest {
        /// Ticker symbol
        #[arg(default_value = "IBM")]
        ticker: String,

        #[command(flatten)]
        source: SourceArgs,

        /// Starting cash
        #[arg(long, default_value_t = DEFAULT_INITIAL_CAPITAL)]
        initial_capital: f64,

        #[command(flatten)]
        thresholds: ThresholdArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Show the signal resolved for a ticker on one date
    Signal {
        /// Ticker symbol
        ticker: String,

        /// Date to resolve (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,

        /// Read the news-sentiment response from a file instead of the API
        #[arg(long)]
        feed: Option<PathBuf>,

        /// Maximum number of articles to request
        #[arg(long, default_value_t = DEFAULT_NEWS_LIMIT)]
        limit: u32,

        #[command(flatten)]
        thresholds: ThresholdArgs,
    },
}

/// Where the backtest inputs come from.
#[derive(Debug, Clone, Args)]
struct SourceArgs {
    /// Read the daily price response from a file instead of the API
    #[arg(long)]
    prices: Option<PathBuf>,

    /// Read the news-sentiment response from a file instead of the API
    #[arg(long)]
    feed: Option<PathBuf>,

    /// Maximum number of articles to request
    #[arg(long, default_value_t = DEFAULT_NEWS_LIMIT)]
    limit: u32,

    /// Amount of price history to request
    #[arg(long, value_enum, default_value_t = HistoryArg::Compact)]
    outputsize: HistoryArg,
}

/// Sentiment score cut-offs.
#[derive(Debug, Clone, Copy, Args)]
struct ThresholdArgs {
    /// Scores at or above this value buy
    #[arg(long, default_value_t = DEFAULT_BUY_THRESHOLD, allow_negative_numbers = true)]
    buy_threshold: f64,

    /// Scores at or below this value sell
    #[arg(long, default_value_t = DEFAULT_SELL_THRESHOLD, allow_negative_numbers = true)]
    sell_threshold: f64,
}

impl ThresholdArgs {
    fn thresholds(self) -> Result<SentimentThresholds> {
        Ok(SentimentThresholds::new(
            self.buy_threshold,
            self.sell_threshold,
        )?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum HistoryArg {
    /// Latest 100 trading days
    Compact,
    /// Full history
    Full,
}

impl From<HistoryArg> for OutputSize {
    fn from(arg: HistoryArg) -> Self {
        match arg {
            HistoryArg::Compact => Self::Compact,
            HistoryArg::Full => Self::Full,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Human-readable report
    Text,
    /// Backtest result as JSON
    Json,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Commands::Backtest {
            ticker,
            source,
            initial_capital,
            thresholds,
            format,
        } => {
            cmd::backtest::run_backtest(
                &ticker,
                &source,
                initial_capital,
                thresholds.thresholds()?,
                format,
            )
            .await?;
        }
        Commands::Signal {
            ticker,
            date,
            feed,
            limit,
            thresholds,
        } => {
            cmd::signal::show_signal(
                &ticker,
                &date,
                feed.as_deref(),
                limit,
                thresholds.thresholds()?,
            )
            .await?;
        }
    }

    Ok(())
}
