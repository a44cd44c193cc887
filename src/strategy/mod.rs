//! Strategy module for trade decision making
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 StrategyController (async)                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Broker.cash / Broker.last_price                            │
//! │  NewsFeed.fetch(symbol, now - 3d, now)                      │
//! │  SentimentOracle.score(headlines)                           │
//! └─────────────────────────────────────────────────────────────┘
//!        │ IterationContext
//!        ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 DECISION CORE (sync, pure)                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  cash > price?  ── no ──► InsufficientCash (hold)           │
//! │  conviction?    ── no ──► Hold                              │
//! │  PositionSizer  → quantity (0 ⇒ hold)                       │
//! │  BracketCalculator → take-profit / stop-loss                │
//! │  flatten if the order reverses the held side                │
//! └─────────────────────────────────────────────────────────────┘
//!        │ Decision::actions()
//!        ▼
//!   Broker.flatten? → Broker.submit → Strategy.on_submitted
//! ```
//!
//! # Components
//!
//! - [`Strategy`]: Trait every driver (live, backtest) calls through
//! - [`SentimentStrategy`]: The news-sentiment state machine
//! - [`Decision`]: Hold or Trade, with ordered [`Action`]s
//! - [`PositionSizer`]: Whole-share sizing from a cash fraction
//! - [`BracketCalculator`]: Exit levels around the entry price
//! - [`StrategyController`]: One iteration against the collaborators

mod bracket;
mod controller;
mod decision;
mod size_calculator;
mod traits;
mod types;

pub use types::{Action, Decision, HoldReason, IterationContext};

pub use traits::Strategy;

pub use size_calculator::PositionSizer;

pub use bracket::BracketCalculator;

pub use decision::SentimentStrategy;

pub use controller::{IterationReport, StrategyController};
