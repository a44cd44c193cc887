//! Backtest module - historical replay against a simulated account

pub mod broker;
pub mod data;
pub mod runner;

pub use broker::{AccountSnapshot, SimulatedBroker};
pub use data::{NewsArchive, NewsRecord, PriceBar, PriceSeries};
pub use runner::{Backtest, BacktestReport};
