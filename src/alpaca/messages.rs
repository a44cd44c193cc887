//! Alpaca request/response payloads

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::types::{BracketOrder, Side};

/// `GET /v2/account`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: Option<String>,
    /// Cash balance, sent as a decimal string
    pub cash: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub trading_blocked: bool,
}

/// `GET /v2/stocks/{symbol}/trades/latest`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestTradeResponse {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub trade: Option<LatestTrade>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatestTrade {
    #[serde(rename = "p")]
    pub price: Decimal,
    #[serde(rename = "s", default)]
    pub size: Option<Decimal>,
    #[serde(rename = "t", default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// `GET /v1beta1/news`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsResponse {
    #[serde(default)]
    pub news: Vec<NewsItem>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    #[serde(default)]
    pub id: Option<i64>,
    pub headline: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub symbols: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// `POST /v2/orders` with `order_class = "bracket"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub symbol: String,
    pub qty: String,
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: String,
    pub time_in_force: String,
    pub order_class: String,
    pub take_profit: TakeProfitLeg,
    pub stop_loss: StopLossLeg,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakeProfitLeg {
    pub limit_price: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopLossLeg {
    pub stop_price: String,
}

impl OrderRequest {
    /// Market entry with GTC take-profit and stop-loss legs
    ///
    /// Leg prices are rounded to cents; Alpaca rejects sub-penny prices
    /// above one dollar.
    pub fn bracket(order: &BracketOrder) -> Self {
        Self {
            symbol: order.symbol.clone(),
            qty: order.quantity.to_string(),
            side: order.side,
            order_type: "market".to_string(),
            time_in_force: "gtc".to_string(),
            order_class: "bracket".to_string(),
            take_profit: TakeProfitLeg {
                limit_price: order.take_profit_price.round_dp(2).to_string(),
            },
            stop_loss: StopLossLeg {
                stop_price: order.stop_loss_price.round_dp(2).to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    pub id: String,
    #[serde(default)]
    pub client_order_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Entry of `GET /v2/orders?status=open`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenOrder {
    pub id: String,
    pub symbol: String,
    #[serde(default)]
    pub side: Option<Side>,
    #[serde(default)]
    pub order_class: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Error body returned on 4xx/5xx
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub code: Option<i64>,
    pub message: String,
}
