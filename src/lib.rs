//! SentimentTrader Library
//!
//! Trades a single symbol from short-horizon news sentiment using bracket
//! orders, driven either by a live clock against Alpaca or by a replay clock
//! against a simulated account.

pub mod alpaca;
pub mod backtest;
pub mod common;
pub mod config;
pub mod engine;
pub mod oracle;
pub mod strategy;

// Re-export commonly used types
pub use common::errors::{Result, TraderError};
pub use common::traits::{Broker, Clock, NewsFeed, SentimentOracle};
pub use common::types::{
    BracketLevels, BracketOrder, OrderHandle, PositionSide, SentimentLabel, SentimentReading, Side,
};
pub use config::types::AppConfig;

// Strategy types
pub use strategy::{
    Action, BracketCalculator, Decision, HoldReason, IterationContext, IterationReport,
    PositionSizer, SentimentStrategy, Strategy, StrategyController,
};
