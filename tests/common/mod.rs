//! Common test utilities and fixtures

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use sentiment_trader::backtest::{NewsArchive, NewsRecord, PriceBar, PriceSeries};
use sentiment_trader::{Result, SentimentLabel, SentimentOracle, SentimentReading};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Deterministic oracle keyed on words in the headlines
///
/// "plunge" anywhere wins as strongly negative, then "beats" as strongly
/// positive; an empty batch is neutral and anything else is a weak neutral.
pub struct ScriptedOracle;

#[async_trait]
impl SentimentOracle for ScriptedOracle {
    async fn score(&self, headlines: &[String]) -> Result<SentimentReading> {
        if headlines.is_empty() {
            return Ok(SentimentReading::neutral());
        }
        let has = |word: &str| headlines.iter().any(|h| h.to_lowercase().contains(word));
        Ok(if has("plunge") {
            SentimentReading::new(0.9999, SentimentLabel::Negative)
        } else if has("beats") {
            SentimentReading::new(0.9995, SentimentLabel::Positive)
        } else {
            SentimentReading::new(0.6, SentimentLabel::Neutral)
        })
    }
}

/// Six trading days, 2024-04-01 (Mon) through 2024-04-08 (Mon)
pub fn sample_prices() -> PriceSeries {
    PriceSeries::from_bars(vec![
        PriceBar { date: date(2024, 4, 1), close: dec!(100) },
        PriceBar { date: date(2024, 4, 2), close: dec!(101) },
        PriceBar { date: date(2024, 4, 3), close: dec!(102) },
        PriceBar { date: date(2024, 4, 4), close: dec!(103) },
        PriceBar { date: date(2024, 4, 5), close: dec!(104) },
        PriceBar { date: date(2024, 4, 8), close: dec!(98) },
    ])
}

/// One bullish headline on the 1st, one bearish on the 4th
pub fn sample_news() -> NewsArchive {
    NewsArchive::new(vec![
        NewsRecord {
            date: date(2024, 4, 1),
            symbol: "SPY".to_string(),
            headline: "SPY beats expectations as earnings season kicks off".to_string(),
        },
        NewsRecord {
            date: date(2024, 4, 4),
            symbol: "SPY".to_string(),
            headline: "Stocks plunge after hot inflation print".to_string(),
        },
        NewsRecord {
            date: date(2024, 4, 4),
            symbol: "QQQ".to_string(),
            headline: "Tech beats the market".to_string(),
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_oracle() {
        let oracle = ScriptedOracle;
        assert_eq!(oracle.score(&[]).await.unwrap(), SentimentReading::neutral());

        let mixed = vec!["X beats".to_string(), "Y plunges".to_string()];
        assert_eq!(oracle.score(&mixed).await.unwrap().label, SentimentLabel::Negative);
    }

    #[test]
    fn test_sample_prices() {
        let prices = sample_prices();
        assert_eq!(prices.len(), 6);
        assert_eq!(prices.close_on(date(2024, 4, 6)), None);
    }
}
