//! Alpaca module - Broker and news feed backed by the Alpaca REST API

pub mod auth;
pub mod client;
pub mod messages;
pub mod rest;

pub use client::{AlpacaBroker, AlpacaNewsFeed};
pub use rest::AlpacaRestClient;
