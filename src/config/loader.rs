//! Configuration loader

use config::{Config, Environment, File};
use std::path::Path;

use super::types::{AlpacaConfig, AppConfig, OracleConfig};
use crate::common::errors::{Result, TraderError};

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with APP__, e.g. APP__STRATEGY__SYMBOL)
/// 2. Configuration file (TOML format)
/// 3. Default values
///
/// The result is validated before it is returned.
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("APP")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| TraderError::Configuration(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| TraderError::Configuration(e.to_string()))?;

    app_config.validate()?;
    Ok(app_config)
}

/// Load configuration from environment variables only
///
/// Alpaca credentials come from ALPACA_API_KEY / ALPACA_API_SECRET; the
/// account is paper unless ALPACA_PAPER is "false".
pub fn load_from_env() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let alpaca = match (
        std::env::var("ALPACA_API_KEY").ok(),
        std::env::var("ALPACA_API_SECRET").ok(),
    ) {
        (Some(api_key), Some(api_secret)) => Some(AlpacaConfig {
            api_key,
            api_secret,
            paper: std::env::var("ALPACA_PAPER")
                .map(|v| !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true),
            base_url: std::env::var("ALPACA_BASE_URL").ok(),
            data_url: std::env::var("ALPACA_DATA_URL")
                .unwrap_or_else(|_| "https://data.alpaca.markets".to_string()),
        }),
        _ => None,
    };

    let oracle = std::env::var("SENTIMENT_ORACLE_URL")
        .map(|url| OracleConfig { url })
        .unwrap_or_default();

    let app_config = AppConfig {
        alpaca,
        oracle,
        ..AppConfig::default()
    };

    app_config.validate()?;
    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn test_load_config_from_toml_file() {
        let path = std::env::temp_dir().join(format!(
            "sentiment_trader_config_{}.toml",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[strategy]
symbol = "QQQ"
cash_at_risk = 0.25
iteration_interval = "12H"

[strategy.bracket]
long_take_profit_pct = 0.10

[settings]
request_timeout_seconds = 5
"#
        )
        .unwrap();

        let config = load_config(path.to_str()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.strategy.symbol, "QQQ");
        assert_eq!(config.strategy.cash_at_risk, dec!(0.25));
        assert_eq!(config.strategy.bracket.long_take_profit_pct, dec!(0.10));
        assert_eq!(config.strategy.bracket.long_stop_loss_pct, dec!(0.05));
        assert_eq!(config.settings.request_timeout_seconds, 5);
        assert!(config.alpaca.is_none());
    }

    #[test]
    fn test_load_config_rejects_bad_risk_fraction() {
        let path = std::env::temp_dir().join(format!(
            "sentiment_trader_bad_config_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[strategy]\ncash_at_risk = 1.5\n").unwrap();

        let result = load_config(path.to_str());
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(TraderError::Configuration(_))));
    }

    #[test]
    fn test_load_from_env_reads_alpaca_and_oracle() {
        std::env::set_var("ALPACA_API_KEY", "env-key");
        std::env::set_var("ALPACA_API_SECRET", "env-secret");
        std::env::set_var("ALPACA_PAPER", "false");
        std::env::set_var("SENTIMENT_ORACLE_URL", "http://scorer.internal:9000");

        let result = load_from_env();

        for var in ["ALPACA_API_KEY", "ALPACA_API_SECRET", "ALPACA_PAPER", "SENTIMENT_ORACLE_URL"] {
            std::env::remove_var(var);
        }

        let config = result.unwrap();
        let alpaca = config.alpaca.unwrap();
        assert_eq!(alpaca.api_key, "env-key");
        assert!(!alpaca.paper);
        assert_eq!(alpaca.trading_url(), "https://api.alpaca.markets");
        assert_eq!(config.oracle.url, "http://scorer.internal:9000");
        assert_eq!(config.strategy.symbol, "SPY");
    }
}
