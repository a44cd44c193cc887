//! Live and replay clocks

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration as ChronoDuration, NaiveDate, Utc, Weekday};
use std::time::Duration;
use tokio::time::{interval, Interval, MissedTickBehavior};

use crate::common::errors::{Result, TraderError};
use crate::common::traits::Clock;

/// Wall clock firing every `period`, starting immediately
pub struct LiveClock {
    interval: Interval,
}

impl LiveClock {
    pub fn new(period: Duration) -> Self {
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }
}

#[async_trait]
impl Clock for LiveClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn tick(&mut self) -> Option<DateTime<Utc>> {
        self.interval.tick().await;
        Some(Utc::now())
    }
}

/// Simulated clock stepping from `start` through `end` (inclusive)
///
/// With a step of one day or more, weekends are skipped.
pub struct ReplayClock {
    cursor: DateTime<Utc>,
    current: DateTime<Utc>,
    end: NaiveDate,
    step: ChronoDuration,
}

impl ReplayClock {
    pub fn new(start: NaiveDate, end: NaiveDate, step: Duration) -> Result<Self> {
        let step = ChronoDuration::from_std(step)
            .map_err(|e| TraderError::Configuration(format!("replay step out of range: {}", e)))?;
        if step <= ChronoDuration::zero() {
            return Err(TraderError::Configuration("replay step must be positive".to_string()));
        }
        let cursor = start
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| TraderError::Configuration(format!("invalid replay start {}", start)))?
            .and_utc();

        Ok(Self {
            cursor,
            current: cursor,
            end,
            step,
        })
    }

    fn skips_weekends(&self) -> bool {
        self.step >= ChronoDuration::days(1)
    }
}

fn is_weekend(t: DateTime<Utc>) -> bool {
    matches!(t.weekday(), Weekday::Sat | Weekday::Sun)
}

#[async_trait]
impl Clock for ReplayClock {
    fn now(&self) -> DateTime<Utc> {
        self.current
    }

    async fn tick(&mut self) -> Option<DateTime<Utc>> {
        loop {
            if self.cursor.date_naive() > self.end {
                return None;
            }
            let candidate = self.cursor;
            self.cursor += self.step;
            if self.skips_weekends() && is_weekend(candidate) {
                continue;
            }
            self.current = candidate;
            return Some(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_daily_replay_skips_weekends() {
        // 2024-03-28 is a Thursday.
        let mut clock =
            ReplayClock::new(date(2024, 3, 28), date(2024, 4, 2), Duration::from_secs(86_400)).unwrap();

        let mut days = Vec::new();
        while let Some(t) = clock.tick().await {
            days.push(t.date_naive());
            assert_eq!(clock.now(), t);
        }

        assert_eq!(
            days,
            vec![date(2024, 3, 28), date(2024, 3, 29), date(2024, 4, 1), date(2024, 4, 2)]
        );
        assert!(clock.tick().await.is_none());
    }

    #[tokio::test]
    async fn test_intraday_replay_keeps_weekends() {
        // Saturday, twelve-hour steps.
        let mut clock =
            ReplayClock::new(date(2024, 3, 30), date(2024, 3, 30), Duration::from_secs(43_200)).unwrap();

        assert!(clock.tick().await.is_some());
        assert!(clock.tick().await.is_some());
        assert!(clock.tick().await.is_none());
    }

    #[tokio::test]
    async fn test_empty_range() {
        let mut clock =
            ReplayClock::new(date(2024, 4, 3), date(2024, 4, 2), Duration::from_secs(86_400)).unwrap();
        assert!(clock.tick().await.is_none());
    }

    #[test]
    fn test_zero_step_rejected() {
        assert!(ReplayClock::new(date(2024, 1, 1), date(2024, 1, 2), Duration::ZERO).is_err());
    }

    #[tokio::test]
    async fn test_live_clock_fires_immediately() {
        let mut clock = LiveClock::new(Duration::from_secs(3_600));
        let first = tokio::time::timeout(Duration::from_secs(1), clock.tick()).await;
        assert!(matches!(first, Ok(Some(_))));
    }
}
