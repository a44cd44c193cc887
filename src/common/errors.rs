//! Error types for the application

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias using our TraderError
pub type Result<T> = std::result::Result<T, TraderError>;

/// Main error type for strategy and collaborator operations
#[derive(Error, Debug)]
pub enum TraderError {
    /// No usable last price for the symbol (missing, zero or negative)
    #[error("Price unavailable for {0}")]
    PriceUnavailable(String),

    /// Bracket levels requested for a non-positive reference price
    #[error("Invalid reference price: {0}")]
    InvalidReferencePrice(Decimal),

    /// Cash does not cover a single unit at the last price
    #[error("Insufficient cash: {cash} does not exceed last price {price}")]
    InsufficientCash { cash: Decimal, price: Decimal },

    /// Sentiment oracle errored or timed out
    #[error("Sentiment oracle failure: {0}")]
    OracleFailure(String),

    /// Broker refused an order or a flatten request
    #[error("Broker rejection: {0}")]
    BrokerRejection(String),

    /// News retrieval errors
    #[error("News feed error: {0}")]
    NewsFeed(String),

    /// HTTP request errors
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// File access errors (historical data)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Invalid API response
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Timeout errors
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TraderError {
    /// Only configuration problems stop the process; everything else
    /// resolves the current iteration as a hold.
    pub fn is_fatal(&self) -> bool {
        matches!(self, TraderError::Configuration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_only_configuration_is_fatal() {
        assert!(TraderError::Configuration("cash_at_risk".into()).is_fatal());
        assert!(!TraderError::PriceUnavailable("SPY".into()).is_fatal());
        assert!(!TraderError::OracleFailure("down".into()).is_fatal());
        assert!(!TraderError::BrokerRejection("rejected".into()).is_fatal());
        assert!(!TraderError::InsufficientCash {
            cash: dec!(50),
            price: dec!(100)
        }
        .is_fatal());
    }

    #[test]
    fn test_insufficient_cash_message() {
        let err = TraderError::InsufficientCash {
            cash: dec!(50),
            price: dec!(100),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient cash: 50 does not exceed last price 100"
        );
    }
}
