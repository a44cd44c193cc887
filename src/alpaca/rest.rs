//! REST API client for Alpaca trading and market data

use chrono::NaiveDate;
use reqwest::{Client, Response, StatusCode};
use rust_decimal::Decimal;
use std::time::Duration;
use tracing::{debug, instrument};

use super::auth::AuthHeaders;
use super::messages::*;
use crate::common::errors::{Result, TraderError};
use crate::config::types::{AlpacaConfig, ApiCredentials};

/// REST API client for Alpaca
#[derive(Debug, Clone)]
pub struct AlpacaRestClient {
    /// HTTP client
    client: Client,
    /// Base URL for the trading API (account, orders, positions)
    trading_url: String,
    /// Base URL for the data API (quotes, news)
    data_url: String,
    /// API key headers sent on every request
    auth: AuthHeaders,
}

impl AlpacaRestClient {
    /// Create a new REST client
    pub fn new(trading_url: &str, data_url: &str, credentials: &ApiCredentials) -> Result<Self> {
        Self::with_timeout(trading_url, data_url, credentials, Duration::from_secs(30))
    }

    /// Create a new REST client with custom timeout
    pub fn with_timeout(
        trading_url: &str,
        data_url: &str,
        credentials: &ApiCredentials,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TraderError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            trading_url: trading_url.trim_end_matches('/').to_string(),
            data_url: data_url.trim_end_matches('/').to_string(),
            auth: AuthHeaders::from_credentials(credentials)?,
        })
    }

    /// Create a client from application configuration
    pub fn from_config(config: &AlpacaConfig, timeout: Duration) -> Result<Self> {
        Self::with_timeout(&config.trading_url(), &config.data_url, &config.credentials(), timeout)
    }

    // ========================================================================
    // Trading API
    // ========================================================================

    /// Get the trading account
    #[instrument(skip(self))]
    pub async fn get_account(&self) -> Result<AccountResponse> {
        let url = format!("{}/v2/account", self.trading_url);
        debug!("Fetching account from: {}", url);

        let response = self.auth.apply_to_request(self.client.get(&url)).send().await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Available cash on the account
    pub async fn get_cash(&self) -> Result<Decimal> {
        let account = self.get_account().await?;
        account
            .cash
            .parse()
            .map_err(|e| TraderError::InvalidResponse(format!("Invalid cash: {}", e)))
    }

    /// Submit a bracket order
    #[instrument(skip(self, order), fields(symbol = %order.symbol, side = ?order.side, qty = %order.qty))]
    pub async fn submit_order(&self, order: &OrderRequest) -> Result<OrderResponse> {
        let url = format!("{}/v2/orders", self.trading_url);
        debug!("Submitting order to: {}", url);

        let response = self
            .auth
            .apply_to_request(self.client.post(&url))
            .json(order)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // 403 here is usually buying power or a held position, not credentials.
            if status == StatusCode::UNAUTHORIZED {
                return Err(TraderError::Authentication(format!("Order refused with status {}", status)));
            }
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(TraderError::BrokerRejection(format!("{}: {}", status, message)));
        }

        Ok(response.json().await?)
    }

    /// Open orders for a symbol, bracket legs included
    #[instrument(skip(self))]
    pub async fn list_open_orders(&self, symbol: &str) -> Result<Vec<OpenOrder>> {
        let url = format!("{}/v2/orders", self.trading_url);
        debug!("Listing open orders at: {}", url);

        let response = self
            .auth
            .apply_to_request(self.client.get(&url))
            .query(&[("status", "open"), ("symbols", symbol)])
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Cancel one order
    ///
    /// Returns `false` when the order was already gone (filled, cancelled, or
    /// cancelled along with its parent).
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: &str) -> Result<bool> {
        let url = format!("{}/v2/orders/{}", self.trading_url, order_id);

        let response = self.auth.apply_to_request(self.client.delete(&url)).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::UNPROCESSABLE_ENTITY {
            return Ok(false);
        }
        check_status(response).await?;
        Ok(true)
    }

    /// Close the whole position in `symbol`
    ///
    /// Returns `false` when there was no position to close.
    #[instrument(skip(self))]
    pub async fn close_position(&self, symbol: &str) -> Result<bool> {
        let url = format!("{}/v2/positions/{}", self.trading_url, symbol);
        debug!("Closing position at: {}", url);

        let response = self.auth.apply_to_request(self.client.delete(&url)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        check_status(response).await?;
        Ok(true)
    }

    // ========================================================================
    // Market Data API
    // ========================================================================

    /// Last trade price for a symbol, `None` if there is no trade
    #[instrument(skip(self))]
    pub async fn get_latest_trade_price(&self, symbol: &str) -> Result<Option<Decimal>> {
        let url = format!("{}/v2/stocks/{}/trades/latest", self.data_url, symbol);
        debug!("Fetching latest trade from: {}", url);

        let response = self.auth.apply_to_request(self.client.get(&url)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(response).await?;
        let latest: LatestTradeResponse = response.json().await?;
        Ok(latest.trade.map(|t| t.price))
    }

    /// One page of news for a symbol between two dates (inclusive)
    #[instrument(skip(self))]
    pub async fn get_news(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        limit: u32,
        page_token: Option<&str>,
    ) -> Result<NewsResponse> {
        let url = format!("{}/v1beta1/news", self.data_url);
        let mut params = vec![
            ("symbols", symbol.to_string()),
            ("start", start.format("%Y-%m-%d").to_string()),
            ("end", end.format("%Y-%m-%d").to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(token) = page_token {
            params.push(("page_token", token.to_string()));
        }
        debug!("Fetching news from: {} {:?}", url, params);

        let response = self
            .auth
            .apply_to_request(self.client.get(&url))
            .query(&params)
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(TraderError::Authentication(format!("Server returned status {}", status)));
    }
    let body = response.text().await.unwrap_or_default();
    Err(TraderError::InvalidResponse(format!(
        "Server returned status {}: {}",
        status, body
    )))
}
