//! Signal command implementation.

use crate::data;
use anyhow::Result;
use sirocco_signals::{SentimentResolver, SentimentThresholds};
use sirocco_traits::{Date, Resolution, SentimentFeed, SignalResolver, types::parse_iso_date};
use std::path::Path;

/// Print the signal resolved for a ticker on one date.
pub(crate) async fn show_signal(
    ticker: &str,
    date: &str,
    feed_path: Option<&Path>,
    limit: u32,
    thresholds: SentimentThresholds,
) -> Result<()> {
    let ticker = ticker.to_uppercase();
    let date = parse_iso_date(date)?;

    let feed = data::load_feed(&ticker, feed_path, limit).await?;
    let resolution = resolve(&feed, date, &ticker, thresholds);

    println!("Ticker:   {ticker}");
    println!("Date:     {date}");
    println!("Articles: {}", feed.articles_on(date).count());
    println!("Signal:   {resolution}");
    Ok(())
}

fn resolve(
    feed: &SentimentFeed,
    date: Date,
    ticker: &str,
    thresholds: SentimentThresholds,
) -> Resolution {
    SentimentResolver::new(thresholds).resolve(feed, date, ticker)
}
