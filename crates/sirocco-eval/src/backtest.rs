//! Backtesting engine.
//!
//! Walks the price series date by date, resolves the sentiment signal for
//! each date and trades a single long-only position at the day's close.

use crate::portfolio::{Portfolio, Trade, TradeAction};
use serde::{Deserialize, Serialize};
use sirocco_signals::{SentimentResolver, SentimentThresholds};
use sirocco_traits::{
    Date, PriceSeries, Resolution, Result, SentimentFeed, Signal, SignalResolver, SiroccoError,
    Symbol,
};
use tracing::{debug, info};

/// Starting cash when none is configured.
pub const DEFAULT_INITIAL_CAPITAL: f64 = 10_000.0;

/// Backtesting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// Initial capital
    pub initial_capital: f64,
    /// Sentiment score thresholds for the default resolver
    pub thresholds: SentimentThresholds,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            thresholds: SentimentThresholds::default(),
        }
    }
}

impl BacktestConfig {
    /// Check that the configuration can be simulated.
    ///
    /// # Errors
    ///
    /// Returns [`SiroccoError::InvalidData`] if the initial capital is negative
    /// or not finite.
    pub fn validate(&self) -> Result<()> {
        validate_initial_capital(self.initial_capital)
    }
}

fn validate_initial_capital(initial_capital: f64) -> Result<()> {
    if !initial_capital.is_finite() || initial_capital < 0.0 {
        return Err(SiroccoError::InvalidData(format!(
            "initial capital must be a non-negative number, got {initial_capital}"
        )));
    }
    Ok(())
}

/// How the resolver answered over a run, by outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionTally {
    /// Dates with a BUY signal
    pub buy: usize,
    /// Dates with a SELL signal
    pub sell: usize,
    /// Dates where a score was found but fell between the thresholds
    pub hold: usize,
    /// Dates without any article
    pub no_article: usize,
    /// Dates with articles, none about the ticker
    pub no_ticker_entry: usize,
    /// Dates where unreadable feed data stopped the lookup
    pub malformed: usize,
}

impl ResolutionTally {
    /// Count one resolution.
    pub const fn record(&mut self, resolution: &Resolution) {
        match resolution {
            Resolution::Resolved { signal, .. } => match signal {
                Signal::Buy => self.buy += 1,
                Signal::Sell => self.sell += 1,
                Signal::Hold => self.hold += 1,
            },
            Resolution::NoArticle => self.no_article += 1,
            Resolution::NoTickerEntry => self.no_ticker_entry += 1,
            Resolution::Malformed { .. } => self.malformed += 1,
        }
    }

    /// Number of dates counted.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.buy + self.sell + self.hold + self.no_article + self.no_ticker_entry + self.malformed
    }
}

/// Backtesting results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Ticker traded
    pub ticker: Symbol,
    /// First trading date
    pub start_date: Date,
    /// Last trading date
    pub end_date: Date,
    /// Number of trading dates simulated
    pub trading_days: usize,
    /// Starting cash
    pub initial_value: f64,
    /// Executed trades, in date order
    pub trades: Vec<Trade>,
    /// Cash at the end of the run
    pub final_cash: f64,
    /// Shares held at the end of the run
    pub final_shares: u64,
    /// Cash plus shares marked at the last close
    pub final_value: f64,
    /// Final value minus initial value
    pub pnl: f64,
    /// Value of investing everything at the first close and holding to the last
    pub buy_and_hold_value: f64,
    /// Resolver outcomes over the run
    pub resolutions: ResolutionTally,
}

impl BacktestResult {
    /// Number of executed trades.
    #[must_use]
    pub fn n_trades(&self) -> usize {
        self.trades.len()
    }

    /// Calculate the buy-and-hold baseline.
    ///
    /// Uses fractional shares; a zero first close yields zero.
    #[must_use]
    pub fn calculate_buy_and_hold(initial_value: f64, first_close: f64, last_close: f64) -> f64 {
        if first_close > 0.0 {
            initial_value / first_close * last_close
        } else {
            0.0
        }
    }
}

/// Backtesting engine.
#[derive(Debug)]
pub struct Backtest<R = SentimentResolver> {
    /// Starting cash
    initial_capital: f64,
    /// Signal source consulted once per date
    resolver: R,
}

impl Backtest {
    /// Create a new backtest driven by the news-sentiment resolver.
    ///
    /// # Arguments
    ///
    /// * `config` - Backtesting configuration; its thresholds configure the resolver
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use sirocco_eval::{Backtest, BacktestConfig};
    ///
    /// let backtest = Backtest::new(BacktestConfig::default());
    /// ```
    #[must_use]
    pub const fn new(config: BacktestConfig) -> Self {
        Self {
            initial_capital: config.initial_capital,
            resolver: SentimentResolver::new(config.thresholds),
        }
    }
}

impl Default for Backtest {
    fn default() -> Self {
        Self::new(BacktestConfig::default())
    }
}

impl<R: SignalResolver> Backtest<R> {
    /// Create a backtest with a custom signal resolver.
    ///
    /// The resolver alone decides each date's signal, so only the starting
    /// cash is taken here.
    pub const fn with_resolver(initial_capital: f64, resolver: R) -> Self {
        Self {
            initial_capital,
            resolver,
        }
    }

    /// Starting cash of every run.
    pub const fn initial_capital(&self) -> f64 {
        self.initial_capital
    }

    /// The signal resolver in use.
    pub const fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Run the backtest.
    ///
    /// # Arguments
    ///
    /// * `prices` - Daily closes of the traded security
    /// * `feed` - News-sentiment feed
    /// * `ticker` - Ticker whose sentiment drives the trades
    ///
    /// # Returns
    ///
    /// BacktestResult with the trade log and summary values
    ///
    /// # Errors
    ///
    /// Returns [`SiroccoError::InsufficientData`] if `prices` is empty, and
    /// [`SiroccoError::InvalidData`] if the configuration is invalid. Nothing
    /// is simulated in either case.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let result = backtest.run(&prices, &feed, "IBM")?;
    /// println!("P&L: {:.2}", result.pnl);
    /// ```
    pub fn run(
        &self,
        prices: &PriceSeries,
        feed: &SentimentFeed,
        ticker: &str,
    ) -> Result<BacktestResult> {
        validate_initial_capital(self.initial_capital)?;

        let (Some((start_date, first_close)), Some((end_date, last_close))) =
            (prices.first(), prices.last())
        else {
            return Err(SiroccoError::InsufficientData(
                "price series is empty, cannot run backtest".to_string(),
            ));
        };

        info!(
            ticker,
            resolver = self.resolver.name(),
            days = prices.len(),
            articles = feed.len(),
            %start_date,
            %end_date,
            "running backtest"
        );

        let mut portfolio = Portfolio::new(self.initial_capital);
        let mut trades = Vec::new();
        let mut resolutions = ResolutionTally::default();

        for (date, price) in prices.iter() {
            let resolution = self.resolver.resolve(feed, date, ticker);
            resolutions.record(&resolution);
            if !resolution.is_resolved() {
                debug!(%date, kind = resolution.kind(), %resolution, "no sentiment signal");
            }

            let executed = match resolution.signal() {
                Signal::Buy => portfolio.buy(price).map(|n| (TradeAction::Buy, n)),
                Signal::Sell => portfolio.sell(price).map(|n| (TradeAction::Sell, n)),
                Signal::Hold => None,
            };

            if let Some((action, shares)) = executed {
                let trade = Trade {
                    date,
                    action,
                    shares,
                    price,
                };
                info!(
                    ticker,
                    %date,
                    %action,
                    shares,
                    price,
                    cash = portfolio.cash(),
                    "{trade}"
                );
                trades.push(trade);
            }
        }

        let initial_value = portfolio.initial_value();
        let final_value = portfolio.value(last_close);

        Ok(BacktestResult {
            ticker: ticker.to_string(),
            start_date,
            end_date,
            trading_days: prices.len(),
            initial_value,
            trades,
            final_cash: portfolio.cash(),
            final_shares: portfolio.shares(),
            final_value,
            pnl: final_value - initial_value,
            buy_and_hold_value: BacktestResult::calculate_buy_and_hold(
                initial_value,
                first_close,
                last_close,
            ),
            resolutions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use sirocco_traits::{Article, TickerSentiment};

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    fn prices(pairs: &[(&str, f64)]) -> PriceSeries {
        PriceSeries::from_iso_pairs(pairs.iter().copied()).unwrap()
    }

    fn feed(articles: &[(&str, &str, &str)]) -> SentimentFeed {
        articles
            .iter()
            .map(|(ts, ticker, score)| Article::new(*ts, vec![TickerSentiment::new(*ticker, *score)]))
            .collect()
    }

    /// Resolver that answers from a fixed list of (date, signal) pairs.
    struct Scripted(Vec<(Date, Signal)>);

    impl SignalResolver for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn resolve(&self, _feed: &SentimentFeed, date: Date, _ticker: &str) -> Resolution {
            self.0
                .iter()
                .find(|(d, _)| *d == date)
                .map_or(Resolution::NoArticle, |(_, signal)| Resolution::Resolved {
                    signal: *signal,
                    score: 0.0,
                })
        }
    }

    #[test]
    fn test_backtest_config_default() {
        let config = BacktestConfig::default();
        assert_eq!(config.initial_capital, 10_000.0);
        assert_eq!(config.thresholds, SentimentThresholds::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let config = BacktestConfig {
            initial_capital: -1.0,
            ..Default::default()
        };
        let backtest = Backtest::new(config);
        let result = backtest.run(
            &prices(&[("2024-01-01", 100.0)]),
            &SentimentFeed::default(),
            "IBM",
        );
        assert!(matches!(result, Err(SiroccoError::InvalidData(_))));

        let scripted = Backtest::with_resolver(f64::NAN, Scripted(Vec::new()));
        let result = scripted.run(
            &prices(&[("2024-01-01", 100.0)]),
            &SentimentFeed::default(),
            "IBM",
        );
        assert!(matches!(result, Err(SiroccoError::InvalidData(_))));
    }

    #[test]
    fn test_buy_then_hold() {
        let prices = prices(&[("2024-01-01", 100.0), ("2024-01-02", 110.0)]);
        let feed = feed(&[("20240101T100000", "IBM", "0.5")]);

        let result = Backtest::default().run(&prices, &feed, "IBM").unwrap();

        assert_eq!(result.n_trades(), 1);
        let trade = &result.trades[0];
        assert_eq!(trade.date, date(2024, 1, 1));
        assert_eq!(trade.action, TradeAction::Buy);
        assert_eq!(trade.shares, 100);
        assert_eq!(trade.price, 100.0);

        assert_eq!(result.final_shares, 100);
        assert_relative_eq!(result.final_cash, 0.0);
        assert_relative_eq!(result.final_value, 11_000.0);
        assert_relative_eq!(result.pnl, 1_000.0);
        assert_relative_eq!(result.buy_and_hold_value, 11_000.0);
        assert_eq!(result.start_date, date(2024, 1, 1));
        assert_eq!(result.end_date, date(2024, 1, 2));
        assert_eq!(result.trading_days, 2);
        assert_eq!(result.resolutions.buy, 1);
        assert_eq!(result.resolutions.no_article, 1);
    }

    #[test]
    fn test_empty_prices() {
        let feed = feed(&[("20240101T100000", "IBM", "0.5")]);
        let result = Backtest::default().run(&PriceSeries::new(), &feed, "IBM");
        assert!(matches!(result, Err(SiroccoError::InsufficientData(_))));
    }

    #[test]
    fn test_sell_without_position_is_noop() {
        let prices = prices(&[("2024-01-01", 100.0), ("2024-01-02", 90.0)]);
        let feed = feed(&[("20240101T100000", "IBM", "-0.5")]);

        let result = Backtest::default().run(&prices, &feed, "IBM").unwrap();

        assert!(result.trades.is_empty());
        assert_eq!(result.final_shares, 0);
        assert_relative_eq!(result.final_cash, 10_000.0);
        assert_relative_eq!(result.pnl, 0.0);
        assert_relative_eq!(result.buy_and_hold_value, 9_000.0);
        assert_eq!(result.resolutions.sell, 1);
    }

    #[test]
    fn test_round_trip_trade() {
        let prices = prices(&[
            ("2024-01-03", 120.0),
            ("2024-01-01", 100.0),
            ("2024-01-02", 105.0),
            ("2024-01-04", 90.0),
        ]);
        let feed = feed(&[
            ("20240101T100000", "IBM", "0.40"),
            ("20240103T100000", "IBM", "-0.20"),
        ]);

        let result = Backtest::default().run(&prices, &feed, "IBM").unwrap();

        let actions: Vec<(Date, TradeAction, u64)> = result
            .trades
            .iter()
            .map(|t| (t.date, t.action, t.shares))
            .collect();
        assert_eq!(
            actions,
            vec![
                (date(2024, 1, 1), TradeAction::Buy, 100),
                (date(2024, 1, 3), TradeAction::Sell, 100),
            ]
        );
        assert_relative_eq!(result.final_cash, 12_000.0);
        assert_relative_eq!(result.final_value, 12_000.0);
        assert_relative_eq!(result.pnl, 2_000.0);
        assert_relative_eq!(result.buy_and_hold_value, 9_000.0);
    }

    #[test]
    fn test_repeated_buy_signals_only_trade_when_cash_allows() {
        let prices = prices(&[
            ("2024-01-01", 300.0),
            ("2024-01-02", 100.0),
            ("2024-01-03", 30.0),
        ]);
        let script = Scripted(vec![
            (date(2024, 1, 1), Signal::Buy),
            (date(2024, 1, 2), Signal::Buy),
            (date(2024, 1, 3), Signal::Buy),
        ]);

        let backtest = Backtest::with_resolver(DEFAULT_INITIAL_CAPITAL, script);
        let result = backtest.run(&prices, &SentimentFeed::default(), "IBM").unwrap();

        // 33 shares at 300 leaves 100: one more share on day two, then 0 cash left.
        let shares: Vec<u64> = result.trades.iter().map(|t| t.shares).collect();
        assert_eq!(shares, vec![33, 1]);
        assert_eq!(result.final_shares, 34);
        assert_relative_eq!(result.final_cash, 0.0);
    }

    #[test]
    fn test_one_trade_per_state_change() {
        let prices = prices(&[
            ("2024-01-01", 10.0),
            ("2024-01-02", 11.0),
            ("2024-01-03", 12.0),
            ("2024-01-04", 13.0),
            ("2024-01-05", 14.0),
        ]);
        let script = Scripted(vec![
            (date(2024, 1, 1), Signal::Sell),
            (date(2024, 1, 2), Signal::Buy),
            (date(2024, 1, 3), Signal::Buy),
            (date(2024, 1, 4), Signal::Sell),
            (date(2024, 1, 5), Signal::Sell),
        ]);

        let backtest = Backtest::with_resolver(DEFAULT_INITIAL_CAPITAL, script);
        let result = backtest.run(&prices, &SentimentFeed::default(), "IBM").unwrap();

        // Sell with no shares, buy again with <1 share of cash, sell again with no shares: no trades.
        let actions: Vec<TradeAction> = result.trades.iter().map(|t| t.action).collect();
        assert_eq!(actions, vec![TradeAction::Buy, TradeAction::Sell]);
        assert!(result.final_cash >= 0.0);
        assert_eq!(result.resolutions.total(), 5);
    }

    #[test]
    fn test_malformed_sentiment_holds() {
        let prices = prices(&[("2024-01-01", 100.0)]);
        let feed = feed(&[("20240101T100000", "IBM", "n/a")]);

        let result = Backtest::default().run(&prices, &feed, "IBM").unwrap();

        assert!(result.trades.is_empty());
        assert_eq!(result.resolutions.malformed, 1);
    }

    #[test]
    fn test_custom_capital_and_thresholds() {
        let config = BacktestConfig {
            initial_capital: 1_000.0,
            thresholds: SentimentThresholds::new(0.1, -0.1).unwrap(),
        };
        let prices = prices(&[("2024-01-01", 50.0), ("2024-01-02", 40.0)]);
        let feed = feed(&[
            ("20240101T100000", "IBM", "0.2"),
            ("20240102T100000", "IBM", "-0.12"),
        ]);

        let result = Backtest::new(config).run(&prices, &feed, "IBM").unwrap();

        assert_eq!(result.n_trades(), 2);
        assert_relative_eq!(result.final_value, 800.0);
        assert_relative_eq!(result.pnl, -200.0);
        assert_relative_eq!(result.buy_and_hold_value, 800.0);
    }

    #[test]
    fn test_zero_price_never_buys() {
        let prices = prices(&[("2024-01-01", 0.0), ("2024-01-02", 10.0)]);
        let feed = feed(&[("20240101T100000", "IBM", "0.9")]);

        let result = Backtest::default().run(&prices, &feed, "IBM").unwrap();

        assert!(result.trades.is_empty());
        assert_eq!(result.buy_and_hold_value, 0.0);
    }

    #[test]
    fn test_result_serializes() {
        let prices = prices(&[("2024-01-01", 100.0), ("2024-01-02", 110.0)]);
        let feed = feed(&[("20240101T100000", "IBM", "0.5")]);
        let result = Backtest::default().run(&prices, &feed, "IBM").unwrap();

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["ticker"], "IBM");
        assert_eq!(json["trades"][0]["action"], "BUY");
        assert_eq!(json["trades"][0]["date"], "2024-01-01");
        assert_eq!(json["final_shares"], 100);
    }
}
