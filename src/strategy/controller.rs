//! One trading iteration: gather inputs, decide, execute, commit

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, instrument};

use crate::common::errors::{Result, TraderError};
use crate::common::traits::{Broker, NewsFeed, SentimentOracle};
use crate::common::types::{OrderHandle, SentimentReading};
use crate::strategy::decision::SentimentStrategy;
use crate::strategy::traits::Strategy;
use crate::strategy::types::{Action, Decision, IterationContext};

/// Outcome of an iteration that ran to completion
#[derive(Debug, Clone)]
pub struct IterationReport {
    pub now: DateTime<Utc>,
    pub headline_count: usize,
    pub sentiment: SentimentReading,
    pub decision: Decision,
    /// Whether a flatten was sent before the order
    pub flattened: bool,
    /// Broker handle of the submitted order, if any
    pub order: Option<OrderHandle>,
}

/// Drives a strategy against its collaborators
///
/// Holds no trading state of its own; the position side lives in the
/// strategy and only changes after the broker accepted every action.
pub struct StrategyController<S: Strategy = SentimentStrategy> {
    strategy: S,
    broker: Arc<dyn Broker>,
    news: Arc<dyn NewsFeed>,
    oracle: Arc<dyn SentimentOracle>,
    news_lookback_days: u32,
    request_timeout: Duration,
}

impl<S: Strategy> StrategyController<S> {
    pub fn new(
        strategy: S,
        broker: Arc<dyn Broker>,
        news: Arc<dyn NewsFeed>,
        oracle: Arc<dyn SentimentOracle>,
    ) -> Self {
        Self {
            strategy,
            broker,
            news,
            oracle,
            news_lookback_days: 3,
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Trailing news window length in days
    pub fn with_news_lookback_days(mut self, days: u32) -> Self {
        self.news_lookback_days = days;
        self
    }

    /// Upper bound on every collaborator call
    pub fn with_request_timeout(mut self, limit: Duration) -> Self {
        self.request_timeout = limit;
        self
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Run a single iteration at `now`
    ///
    /// Any error means the iteration held: nothing after the failing step
    /// ran and the strategy state is untouched.
    #[instrument(skip(self), fields(strategy = %self.strategy.name(), symbol = %self.strategy.symbol()))]
    pub async fn run_iteration(&mut self, now: DateTime<Utc>) -> Result<IterationReport> {
        let symbol = self.strategy.symbol().to_string();
        let limit = self.request_timeout;

        let cash = bounded(limit, "broker cash", self.broker.cash()).await?;
        let last_price = bounded(limit, "broker last price", self.broker.last_price(&symbol)).await?;

        let end = now.date_naive();
        let start = end - ChronoDuration::days(i64::from(self.news_lookback_days));
        let headlines = bounded(limit, "news fetch", self.news.fetch(&symbol, start, end)).await?;
        debug!(count = headlines.len(), %start, %end, "Fetched headlines");

        let sentiment = match timeout(limit, self.oracle.score(&headlines)).await {
            Ok(Ok(reading)) => reading,
            Ok(Err(TraderError::OracleFailure(msg))) => return Err(TraderError::OracleFailure(msg)),
            Ok(Err(e)) => return Err(TraderError::OracleFailure(e.to_string())),
            Err(_) => {
                return Err(TraderError::OracleFailure(format!(
                    "scoring timed out after {:?}",
                    limit
                )))
            }
        };

        let ctx = IterationContext {
            now,
            cash,
            last_price,
            sentiment,
        };
        let decision = self.strategy.on_iteration(&ctx)?;

        let mut flattened = false;
        let mut order = None;
        for action in decision.actions() {
            match action {
                Action::Flatten { symbol } => {
                    broker_call(limit, "flatten", self.broker.flatten(&symbol)).await?;
                    info!(%symbol, "Flattened opposite position");
                    flattened = true;
                }
                Action::Submit(bracket) => {
                    let handle = broker_call(limit, "submit", self.broker.submit(&bracket)).await?;
                    info!(
                        order_id = %handle.order_id,
                        side = %bracket.side,
                        quantity = bracket.quantity,
                        take_profit = %bracket.take_profit_price,
                        stop_loss = %bracket.stop_loss_price,
                        "Submitted bracket order"
                    );
                    order = Some(handle);
                }
            }
        }

        if decision.is_trade() {
            self.strategy.on_submitted(&decision);
        } else {
            debug!(?decision, "Holding");
        }

        Ok(IterationReport {
            now,
            headline_count: headlines.len(),
            sentiment,
            decision,
            flattened,
            order,
        })
    }

    /// Let the strategy clean up
    pub fn shutdown(&mut self) {
        self.strategy.on_shutdown();
    }
}

async fn bounded<T>(limit: Duration, what: &str, call: impl Future<Output = Result<T>>) -> Result<T> {
    timeout(limit, call)
        .await
        .map_err(|_| TraderError::Timeout(format!("{} after {:?}", what, limit)))?
}

async fn broker_call<T>(limit: Duration, what: &str, call: impl Future<Output = Result<T>>) -> Result<T> {
    match timeout(limit, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(TraderError::BrokerRejection(msg))) => Err(TraderError::BrokerRejection(msg)),
        Ok(Err(e)) => Err(TraderError::BrokerRejection(format!("{}: {}", what, e))),
        Err(_) => Err(TraderError::BrokerRejection(format!(
            "{} timed out after {:?}",
            what, limit
        ))),
    }
}
