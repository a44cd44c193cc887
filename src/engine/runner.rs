//! Sequential iteration driver

use serde::Serialize;
use tracing::{error, info, warn};

use crate::common::errors::{Result, TraderError};
use crate::common::traits::Clock;
use crate::strategy::{IterationReport, Strategy, StrategyController};

/// Counters over a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub iterations: u64,
    pub trades: u64,
    pub flattens: u64,
    pub holds: u64,
    /// Iterations that resolved as a hold because of an error
    pub errors: u64,
}

impl RunSummary {
    /// Account for one iteration and log it
    pub fn record(&mut self, outcome: &Result<IterationReport>) {
        self.iterations += 1;
        match outcome {
            Ok(report) if report.decision.is_trade() => {
                self.trades += 1;
                if report.flattened {
                    self.flattens += 1;
                }
            }
            Ok(_) => self.holds += 1,
            Err(e) => {
                self.errors += 1;
                match e {
                    TraderError::InsufficientCash { .. } | TraderError::PriceUnavailable(_) => {
                        warn!(error = %e, "Iteration held")
                    }
                    _ => error!(error = %e, "Iteration failed, holding"),
                }
            }
        }
    }
}

/// Run iterations until the clock is exhausted
///
/// Each iteration finishes (broker calls included) before the next tick is
/// requested. Only configuration errors end the run early; the strategy is
/// shut down either way.
pub async fn run<C, S>(clock: &mut C, controller: &mut StrategyController<S>) -> Result<RunSummary>
where
    C: Clock + ?Sized,
    S: Strategy,
{
    let mut summary = RunSummary::default();

    while let Some(now) = clock.tick().await {
        let outcome = controller.run_iteration(now).await;
        summary.record(&outcome);
        if let Err(e) = outcome {
            if e.is_fatal() {
                controller.shutdown();
                return Err(e);
            }
        }
    }

    info!(
        iterations = summary.iterations,
        trades = summary.trades,
        holds = summary.holds,
        errors = summary.errors,
        "Run finished"
    );
    controller.shutdown();
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::traits::{MockBroker, MockNewsFeed, MockSentimentOracle};
    use crate::common::types::SentimentReading;
    use crate::config::types::StrategyConfig;
    use crate::engine::ReplayClock;
    use crate::strategy::{Decision, IterationContext};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use std::time::Duration;

    /// Fails every iteration, fatally or not
    struct FailingStrategy {
        fatal: bool,
        shut_down: bool,
    }

    impl Strategy for FailingStrategy {
        fn name(&self) -> &str {
            "failing"
        }

        fn configure(&mut self, _cfg: &StrategyConfig) -> Result<()> {
            Ok(())
        }

        fn symbol(&self) -> &str {
            "SPY"
        }

        fn on_iteration(&self, _ctx: &IterationContext) -> Result<Decision> {
            if self.fatal {
                Err(TraderError::Configuration("bad config".to_string()))
            } else {
                Err(TraderError::PriceUnavailable("SPY".to_string()))
            }
        }

        fn on_shutdown(&mut self) {
            self.shut_down = true;
        }
    }

    fn controller(fatal: bool) -> StrategyController<FailingStrategy> {
        let mut broker = MockBroker::new();
        broker.expect_cash().returning(|| Ok(dec!(10000)));
        broker.expect_last_price().returning(|_| Ok(Some(dec!(100))));
        let mut news = MockNewsFeed::new();
        news.expect_fetch().returning(|_, _, _| Ok(Vec::new()));
        let mut oracle = MockSentimentOracle::new();
        oracle.expect_score().returning(|_| Ok(SentimentReading::neutral()));

        StrategyController::new(
            FailingStrategy { fatal, shut_down: false },
            Arc::new(broker),
            Arc::new(news),
            Arc::new(oracle),
        )
    }

    fn three_days() -> ReplayClock {
        // Mon 2024-04-01 through Wed 2024-04-03.
        ReplayClock::new(
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 4, 3).unwrap(),
            Duration::from_secs(86_400),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_recoverable_errors_hold_and_continue() {
        let mut clock = three_days();
        let mut controller = controller(false);

        let summary = run(&mut clock, &mut controller).await.unwrap();

        assert_eq!(summary.iterations, 3);
        assert_eq!(summary.errors, 3);
        assert_eq!(summary.trades, 0);
        assert!(controller.strategy().shut_down);
    }

    #[tokio::test]
    async fn test_fatal_error_stops_and_shuts_down() {
        let mut clock = three_days();
        let mut controller = controller(true);

        let err = run(&mut clock, &mut controller).await.unwrap_err();

        assert!(matches!(err, TraderError::Configuration(_)));
        assert!(controller.strategy().shut_down);
        // Two ticks were left unused.
        assert!(clock.tick().await.is_some());
        assert!(clock.tick().await.is_some());
        assert!(clock.tick().await.is_none());
    }
}
