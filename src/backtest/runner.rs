//! Historical replay through the live controller

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use super::broker::{AccountSnapshot, SimulatedBroker};
use super::data::{NewsArchive, PriceSeries};
use crate::common::errors::Result;
use crate::common::traits::{Clock, SentimentOracle};
use crate::config::types::{AppConfig, BacktestConfig, StrategyConfig};
use crate::engine::{run, ReplayClock, RunSummary};
use crate::strategy::{SentimentStrategy, StrategyController};

/// Replay clock that moves the simulated market along with it
struct MarketReplayClock {
    inner: ReplayClock,
    broker: Arc<SimulatedBroker>,
}

#[async_trait]
impl Clock for MarketReplayClock {
    fn now(&self) -> DateTime<Utc> {
        self.inner.now()
    }

    async fn tick(&mut self) -> Option<DateTime<Utc>> {
        let now = self.inner.tick().await?;
        self.broker.advance_to(now.date_naive()).await;
        Some(now)
    }
}

/// Result of a backtest
#[derive(Debug, Clone, Serialize)]
pub struct BacktestReport {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub starting_cash: Decimal,
    pub final_value: Decimal,
    /// Percentage return over the run
    pub return_pct: Decimal,
    pub run: RunSummary,
    pub account: AccountSnapshot,
}

/// A configured historical replay
pub struct Backtest {
    strategy: StrategyConfig,
    backtest: BacktestConfig,
    request_timeout: std::time::Duration,
    prices: PriceSeries,
    news: NewsArchive,
    oracle: Arc<dyn SentimentOracle>,
}

impl Backtest {
    pub fn new(
        strategy: StrategyConfig,
        backtest: BacktestConfig,
        prices: PriceSeries,
        news: NewsArchive,
        oracle: Arc<dyn SentimentOracle>,
    ) -> Self {
        Self {
            strategy,
            backtest,
            request_timeout: std::time::Duration::from_secs(30),
            prices,
            news,
            oracle,
        }
    }

    /// Build from application config, loading the price and news files
    pub fn from_config(
        config: &AppConfig,
        backtest: &BacktestConfig,
        oracle: Arc<dyn SentimentOracle>,
    ) -> Result<Self> {
        let prices = PriceSeries::load(&backtest.prices_path)?;
        let news = NewsArchive::load(&backtest.news_path)?;
        info!(bars = prices.len(), headlines = news.len(), "Loaded historical data");

        let mut bt = Self::new(config.strategy.clone(), backtest.clone(), prices, news, oracle);
        bt.request_timeout = config.settings.request_timeout();
        Ok(bt)
    }

    pub async fn run(self) -> Result<BacktestReport> {
        let broker = Arc::new(SimulatedBroker::new(
            self.strategy.symbol.clone(),
            self.prices,
            self.backtest.starting_cash,
        ));

        let strategy = SentimentStrategy::new(&self.strategy)?;
        let mut controller = StrategyController::new(
            strategy,
            broker.clone(),
            Arc::new(self.news),
            self.oracle,
        )
        .with_news_lookback_days(self.strategy.news_lookback_days)
        .with_request_timeout(self.request_timeout);

        let mut clock = MarketReplayClock {
            inner: ReplayClock::new(self.backtest.start, self.backtest.end, self.strategy.interval()?)?,
            broker: broker.clone(),
        };

        info!(
            symbol = %self.strategy.symbol,
            start = %self.backtest.start,
            end = %self.backtest.end,
            "Starting backtest"
        );
        let summary = run(&mut clock, &mut controller).await?;
        let account = broker.snapshot().await;

        let starting_cash = self.backtest.starting_cash;
        let return_pct = ((account.portfolio_value - starting_cash) / starting_cash * Decimal::ONE_HUNDRED).round_dp(2);

        Ok(BacktestReport {
            symbol: self.strategy.symbol,
            start: self.backtest.start,
            end: self.backtest.end,
            starting_cash,
            final_value: account.portfolio_value,
            return_pct,
            run: summary,
            account,
        })
    }
}
