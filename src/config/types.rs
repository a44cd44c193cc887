//! Configuration types

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::common::errors::{Result, TraderError};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Decision parameters for the traded symbol
    #[serde(default)]
    pub strategy: StrategyConfig,
    /// Alpaca brokerage and news credentials (live mode)
    #[serde(default)]
    pub alpaca: Option<AlpacaConfig>,
    /// Remote sentiment scoring endpoint
    #[serde(default)]
    pub oracle: OracleConfig,
    /// Historical replay settings (backtest mode)
    #[serde(default)]
    pub backtest: Option<BacktestConfig>,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

impl AppConfig {
    /// Fail fast on anything that would make every iteration meaningless
    pub fn validate(&self) -> Result<()> {
        self.strategy.validate()?;
        validate_url("oracle.url", &self.oracle.url)?;
        if let Some(alpaca) = &self.alpaca {
            validate_url("alpaca.trading_url", &alpaca.trading_url())?;
            validate_url("alpaca.data_url", &alpaca.data_url)?;
        }
        if let Some(backtest) = &self.backtest {
            backtest.validate()?;
        }
        if self.settings.request_timeout_seconds == 0 {
            return Err(TraderError::Configuration(
                "settings.request_timeout_seconds must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn validate_url(field: &str, value: &str) -> Result<()> {
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|e| TraderError::Configuration(format!("{} is not a valid URL ({}): {}", field, value, e)))
}

/// Strategy parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Traded symbol
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Fraction of available cash committed to one new position, in (0, 1]
    #[serde(default = "default_cash_at_risk")]
    pub cash_at_risk: Decimal,
    /// Time between iterations, e.g. "24H", "30M", "1D"
    #[serde(default = "default_iteration_interval")]
    pub iteration_interval: String,
    /// Trailing window of news considered each iteration, in days
    #[serde(default = "default_news_lookback_days")]
    pub news_lookback_days: u32,
    /// Minimum (exclusive) oracle confidence needed to act
    #[serde(default = "default_conviction_threshold")]
    pub conviction_threshold: f64,
    /// Exit levels for entries
    #[serde(default)]
    pub bracket: BracketConfig,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            cash_at_risk: default_cash_at_risk(),
            iteration_interval: default_iteration_interval(),
            news_lookback_days: default_news_lookback_days(),
            conviction_threshold: default_conviction_threshold(),
            bracket: BracketConfig::default(),
        }
    }
}

impl StrategyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(TraderError::Configuration("strategy.symbol is empty".to_string()));
        }
        if self.cash_at_risk <= Decimal::ZERO || self.cash_at_risk > Decimal::ONE {
            return Err(TraderError::Configuration(format!(
                "strategy.cash_at_risk must be in (0, 1], got {}",
                self.cash_at_risk
            )));
        }
        if !(0.0..1.0).contains(&self.conviction_threshold) {
            return Err(TraderError::Configuration(format!(
                "strategy.conviction_threshold must be in [0, 1), got {}",
                self.conviction_threshold
            )));
        }
        if self.news_lookback_days == 0 {
            return Err(TraderError::Configuration(
                "strategy.news_lookback_days must be at least 1".to_string(),
            ));
        }
        self.interval()?;
        self.bracket.validate()
    }

    /// Parsed iteration interval
    pub fn interval(&self) -> Result<Duration> {
        parse_interval(&self.iteration_interval)
    }
}

fn default_symbol() -> String {
    "SPY".to_string()
}

fn default_cash_at_risk() -> Decimal {
    dec!(0.5)
}

fn default_iteration_interval() -> String {
    "24H".to_string()
}

fn default_news_lookback_days() -> u32 {
    3
}

fn default_conviction_threshold() -> f64 {
    0.999
}

/// Take-profit / stop-loss distances as fractions of the entry price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BracketConfig {
    #[serde(default = "default_take_profit_pct")]
    pub long_take_profit_pct: Decimal,
    #[serde(default = "default_stop_loss_pct")]
    pub long_stop_loss_pct: Decimal,
    #[serde(default = "default_take_profit_pct")]
    pub short_take_profit_pct: Decimal,
    #[serde(default = "default_stop_loss_pct")]
    pub short_stop_loss_pct: Decimal,
}

impl Default for BracketConfig {
    fn default() -> Self {
        Self {
            long_take_profit_pct: default_take_profit_pct(),
            long_stop_loss_pct: default_stop_loss_pct(),
            short_take_profit_pct: default_take_profit_pct(),
            short_stop_loss_pct: default_stop_loss_pct(),
        }
    }
}

impl BracketConfig {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("long_take_profit_pct", self.long_take_profit_pct),
            ("long_stop_loss_pct", self.long_stop_loss_pct),
            ("short_take_profit_pct", self.short_take_profit_pct),
            ("short_stop_loss_pct", self.short_stop_loss_pct),
        ];
        for (name, value) in fields {
            if value <= Decimal::ZERO {
                return Err(TraderError::Configuration(format!(
                    "strategy.bracket.{} must be positive, got {}",
                    name, value
                )));
            }
        }
        // These two are subtracted from 1; a level at or below zero is not a price.
        for (name, value) in [
            ("long_stop_loss_pct", self.long_stop_loss_pct),
            ("short_take_profit_pct", self.short_take_profit_pct),
        ] {
            if value >= Decimal::ONE {
                return Err(TraderError::Configuration(format!(
                    "strategy.bracket.{} must be below 1, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

fn default_take_profit_pct() -> Decimal {
    dec!(0.20)
}

fn default_stop_loss_pct() -> Decimal {
    dec!(0.05)
}

/// Parse a sleep-time string into a duration
///
/// Accepts a number followed by `S`, `M`, `H` or `D` (case-insensitive).
/// A bare number is read as minutes.
pub fn parse_interval(text: &str) -> Result<Duration> {
    let text = text.trim();
    let invalid = || TraderError::Configuration(format!("invalid iteration interval: {:?}", text));

    let (digits, unit_secs) = match text.chars().last() {
        Some(c) if c.is_ascii_digit() => (text, 60),
        Some(c) => {
            let unit = match c.to_ascii_uppercase() {
                'S' => 1,
                'M' => 60,
                'H' => 3_600,
                'D' => 86_400,
                _ => return Err(invalid()),
            };
            (&text[..text.len() - c.len_utf8()], unit)
        }
        None => return Err(invalid()),
    };

    let count: u64 = digits.trim().parse().map_err(|_| invalid())?;
    if count == 0 {
        return Err(invalid());
    }
    let secs = count.checked_mul(unit_secs).ok_or_else(invalid)?;
    Ok(Duration::from_secs(secs))
}

/// Alpaca API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlpacaConfig {
    /// API key id
    pub api_key: String,
    /// API secret key
    pub api_secret: String,
    /// Paper trading account
    #[serde(default = "default_paper")]
    pub paper: bool,
    /// Trading API base URL override
    #[serde(default)]
    pub base_url: Option<String>,
    /// Market data / news API base URL
    #[serde(default = "default_alpaca_data_url")]
    pub data_url: String,
}

impl AlpacaConfig {
    /// Trading endpoint, derived from `paper` unless overridden
    pub fn trading_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.clone(),
            None if self.paper => "https://paper-api.alpaca.markets".to_string(),
            None => "https://api.alpaca.markets".to_string(),
        }
    }

    pub fn credentials(&self) -> ApiCredentials {
        ApiCredentials::new(self.api_key.clone(), self.api_secret.clone())
    }
}

fn default_paper() -> bool {
    true
}

fn default_alpaca_data_url() -> String {
    "https://data.alpaca.markets".to_string()
}

/// Sentiment scoring service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Base URL of the scoring service
    #[serde(default = "default_oracle_url")]
    pub url: String,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            url: default_oracle_url(),
        }
    }
}

fn default_oracle_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

/// Historical replay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// First simulated day
    pub start: NaiveDate,
    /// Last simulated day (inclusive)
    pub end: NaiveDate,
    /// Cash in the simulated account at the start
    #[serde(default = "default_starting_cash")]
    pub starting_cash: Decimal,
    /// JSON file of daily closes: `[{"date": "2024-01-02", "close": "472.65"}]`
    pub prices_path: String,
    /// JSON file of headlines: `[{"date": "...", "symbol": "SPY", "headline": "..."}]`
    pub news_path: String,
}

impl BacktestConfig {
    pub fn validate(&self) -> Result<()> {
        if self.end < self.start {
            return Err(TraderError::Configuration(format!(
                "backtest.end ({}) is before backtest.start ({})",
                self.end, self.start
            )));
        }
        if self.starting_cash <= Decimal::ZERO {
            return Err(TraderError::Configuration(format!(
                "backtest.starting_cash must be positive, got {}",
                self.starting_cash
            )));
        }
        Ok(())
    }
}

fn default_starting_cash() -> Decimal {
    dec!(100000)
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Timeout applied to every broker, news and oracle call, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl AppSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

/// API credentials for authenticated requests
#[derive(Debug, Clone)]
pub struct ApiCredentials {
    pub api_key: String,
    pub api_secret: String,
}

impl ApiCredentials {
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self {
            api_key,
            api_secret,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_match_reference_strategy() {
        let config = AppConfig::default();
        assert_eq!(config.strategy.symbol, "SPY");
        assert_eq!(config.strategy.cash_at_risk, dec!(0.5));
        assert_eq!(config.strategy.news_lookback_days, 3);
        assert_eq!(config.strategy.interval().unwrap(), Duration::from_secs(86_400));
        assert_eq!(config.strategy.bracket.long_take_profit_pct, dec!(0.20));
        assert_eq!(config.strategy.bracket.short_stop_loss_pct, dec!(0.05));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cash_at_risk_bounds() {
        let mut strategy = StrategyConfig::default();

        strategy.cash_at_risk = dec!(1);
        assert!(strategy.validate().is_ok());

        for bad in [dec!(0), dec!(-0.1), dec!(1.01)] {
            strategy.cash_at_risk = bad;
            let err = strategy.validate().unwrap_err();
            assert!(err.is_fatal(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_bracket_validation() {
        let mut bracket = BracketConfig::default();
        assert!(bracket.validate().is_ok());

        bracket.long_stop_loss_pct = dec!(1);
        assert!(bracket.validate().is_err());

        bracket = BracketConfig::default();
        bracket.short_take_profit_pct = dec!(0);
        assert!(bracket.validate().is_err());

        // Upside targets above 100% are fine.
        bracket = BracketConfig::default();
        bracket.long_take_profit_pct = dec!(1.5);
        assert!(bracket.validate().is_ok());
    }

    #[test]
    fn test_parse_interval() {
        assert_eq!(parse_interval("24H").unwrap(), Duration::from_secs(86_400));
        assert_eq!(parse_interval("1d").unwrap(), Duration::from_secs(86_400));
        assert_eq!(parse_interval("30M").unwrap(), Duration::from_secs(1_800));
        assert_eq!(parse_interval("90S").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_interval("5").unwrap(), Duration::from_secs(300));

        for bad in ["", "H", "0H", "24X", "-1H", "1.5H", "999999999999999999D"] {
            assert!(
                matches!(parse_interval(bad), Err(TraderError::Configuration(_))),
                "{:?} should not parse",
                bad
            );
        }
    }

    #[test]
    fn test_trading_url_follows_paper_flag() {
        let mut alpaca = AlpacaConfig {
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            paper: true,
            base_url: None,
            data_url: default_alpaca_data_url(),
        };
        assert_eq!(alpaca.trading_url(), "https://paper-api.alpaca.markets");

        alpaca.paper = false;
        assert_eq!(alpaca.trading_url(), "https://api.alpaca.markets");

        alpaca.base_url = Some("http://localhost:9999".to_string());
        assert_eq!(alpaca.trading_url(), "http://localhost:9999");
    }

    #[test]
    fn test_backtest_range_validation() {
        let backtest = BacktestConfig {
            start: NaiveDate::from_ymd_opt(2024, 4, 3).unwrap(),
            end: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            starting_cash: dec!(100000),
            prices_path: "prices.json".to_string(),
            news_path: "news.json".to_string(),
        };
        assert!(backtest.validate().is_err());
    }
}
