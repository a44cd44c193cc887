//! Historical prices and headlines loaded from JSON files

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::common::errors::{Result, TraderError};
use crate::common::traits::NewsFeed;

/// One daily close
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub close: Decimal,
}

/// Daily closing prices for the traded symbol
#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    closes: BTreeMap<NaiveDate, Decimal>,
}

impl PriceSeries {
    pub fn from_bars(bars: impl IntoIterator<Item = PriceBar>) -> Self {
        Self {
            closes: bars.into_iter().map(|b| (b.date, b.close)).collect(),
        }
    }

    /// Load `[{"date": "2024-01-02", "close": 472.65}, ...]`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let bars: Vec<PriceBar> = serde_json::from_str(&raw)?;
        if bars.is_empty() {
            return Err(TraderError::Configuration(format!(
                "no price bars in {}",
                path.as_ref().display()
            )));
        }
        Ok(Self::from_bars(bars))
    }

    /// Close on exactly `date` (no bar on holidays)
    pub fn close_on(&self, date: NaiveDate) -> Option<Decimal> {
        self.closes.get(&date).copied()
    }

    /// Most recent close at or before `date`
    pub fn close_on_or_before(&self, date: NaiveDate) -> Option<Decimal> {
        self.closes.range(..=date).next_back().map(|(_, close)| *close)
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }
}

/// One archived headline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsRecord {
    pub date: NaiveDate,
    pub symbol: String,
    pub headline: String,
}

/// In-memory news archive answering date-range queries
#[derive(Debug, Clone, Default)]
pub struct NewsArchive {
    records: Vec<NewsRecord>,
}

impl NewsArchive {
    pub fn new(records: Vec<NewsRecord>) -> Self {
        Self { records }
    }

    /// Load `[{"date": "...", "symbol": "SPY", "headline": "..."}, ...]`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(Self::new(serde_json::from_str(&raw)?))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl NewsFeed for NewsArchive {
    async fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<String>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.symbol.eq_ignore_ascii_case(symbol) && r.date >= start && r.date <= end)
            .map(|r| r.headline.clone())
            .collect())
    }
}
