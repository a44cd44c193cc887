//! Shared types passed between the strategy core and its collaborators

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// Which way the strategy currently believes it is exposed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    #[default]
    None,
    Long,
    Short,
}

impl PositionSide {
    /// Side held after an order on `side` has been accepted
    pub fn after(side: Side) -> Self {
        match side {
            Side::Buy => PositionSide::Long,
            Side::Sell => PositionSide::Short,
        }
    }

    /// True when opening `side` would put us on the opposite side
    pub fn opposes(&self, side: Side) -> bool {
        matches!(
            (self, side),
            (PositionSide::Short, Side::Buy) | (PositionSide::Long, Side::Sell)
        )
    }
}

impl fmt::Display for PositionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionSide::None => write!(f, "none"),
            PositionSide::Long => write!(f, "long"),
            PositionSide::Short => write!(f, "short"),
        }
    }
}

/// Sentiment classification returned by the oracle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl std::str::FromStr for SentimentLabel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(SentimentLabel::Positive),
            "negative" => Ok(SentimentLabel::Negative),
            "neutral" => Ok(SentimentLabel::Neutral),
            other => Err(format!("unknown sentiment label: {}", other)),
        }
    }
}

/// Aggregate sentiment over a batch of headlines
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentReading {
    /// Probability mass of the predicted label (0.0 to 1.0)
    pub confidence: f64,
    pub label: SentimentLabel,
}

impl SentimentReading {
    pub fn new(confidence: f64, label: SentimentLabel) -> Self {
        Self { confidence, label }
    }

    /// Reading for an empty headline set
    pub fn neutral() -> Self {
        Self {
            confidence: 0.0,
            label: SentimentLabel::Neutral,
        }
    }
}

/// Take-profit and stop-loss levels around a reference price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketLevels {
    pub take_profit: Decimal,
    pub stop_loss: Decimal,
}

/// Entry order bundled with its exit levels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketOrder {
    pub symbol: String,
    pub side: Side,
    /// Whole shares, always positive
    pub quantity: u64,
    /// Last price the levels were computed from
    pub reference_price: Decimal,
    pub take_profit_price: Decimal,
    pub stop_loss_price: Decimal,
}

/// Broker acknowledgement of a submitted order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderHandle {
    pub order_id: String,
}

impl OrderHandle {
    pub fn new(order_id: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
        }
    }
}
