//! Trait definitions for the strategy's external collaborators
//!
//! The decision core only ever talks to the outside world through these
//! traits, so a live Alpaca session and a historical replay look the same
//! to it.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use super::errors::Result;
use super::types::{BracketOrder, OrderHandle, SentimentReading};

/// Source of "now" and of the iteration cadence
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current time as seen by the strategy
    fn now(&self) -> DateTime<Utc>;

    /// Wait for the next scheduled iteration
    ///
    /// Returns `None` once the schedule is exhausted (end of a replay).
    async fn tick(&mut self) -> Option<DateTime<Utc>>;
}

/// Brokerage account for a single symbol
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Broker: Send + Sync {
    /// Available cash
    async fn cash(&self) -> Result<Decimal>;

    /// Last traded price, `None` if the broker has no quote
    async fn last_price(&self, symbol: &str) -> Result<Option<Decimal>>;

    /// Submit a bracket order
    async fn submit(&self, order: &BracketOrder) -> Result<OrderHandle>;

    /// Close the whole position in `symbol`
    async fn flatten(&self, symbol: &str) -> Result<()>;
}

/// Headline source for a symbol over a date range (inclusive)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsFeed: Send + Sync {
    async fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<String>>;
}

/// Aggregate sentiment scoring over a batch of headlines
///
/// Implementations must return `SentimentReading::neutral()` for an empty
/// batch.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SentimentOracle: Send + Sync {
    async fn score(&self, headlines: &[String]) -> Result<SentimentReading>;
}
