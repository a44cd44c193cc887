//! Sentiment oracle implementations

pub mod http;

pub use http::HttpSentimentOracle;
