//! Broker and news feed implementations backed by the Alpaca REST API

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::messages::OrderRequest;
use super::rest::AlpacaRestClient;
use crate::common::errors::{Result, TraderError};
use crate::common::traits::{Broker, NewsFeed};
use crate::common::types::{BracketOrder, OrderHandle};

/// Items requested per news page (API maximum)
const NEWS_PAGE_LIMIT: u32 = 50;
/// Guard against a server that keeps returning page tokens
const MAX_NEWS_PAGES: usize = 10;

/// Alpaca brokerage account
#[derive(Debug, Clone)]
pub struct AlpacaBroker {
    rest: AlpacaRestClient,
}

impl AlpacaBroker {
    pub fn new(rest: AlpacaRestClient) -> Self {
        Self { rest }
    }
}

#[async_trait]
impl Broker for AlpacaBroker {
    async fn cash(&self) -> Result<Decimal> {
        self.rest.get_cash().await
    }

    async fn last_price(&self, symbol: &str) -> Result<Option<Decimal>> {
        self.rest.get_latest_trade_price(symbol).await
    }

    async fn submit(&self, order: &BracketOrder) -> Result<OrderHandle> {
        if order.quantity == 0 {
            return Err(TraderError::BrokerRejection(format!(
                "refusing zero-quantity order for {}",
                order.symbol
            )));
        }
        let response = self.rest.submit_order(&OrderRequest::bracket(order)).await?;
        debug!(order_id = %response.id, status = ?response.status, "Order accepted");
        Ok(OrderHandle::new(response.id))
    }

    async fn flatten(&self, symbol: &str) -> Result<()> {
        // Exit legs hold the shares; Alpaca refuses the close while they work.
        let open = self.rest.list_open_orders(symbol).await?;
        for order in open.iter().filter(|o| o.symbol.eq_ignore_ascii_case(symbol)) {
            if self.rest.cancel_order(&order.id).await? {
                debug!(%symbol, order_id = %order.id, "Cancelled open order");
            }
        }

        if self.rest.close_position(symbol).await? {
            info!(%symbol, "Position close requested");
        } else {
            debug!(%symbol, "No open position to close");
        }
        Ok(())
    }
}

/// Alpaca news API as a headline source
#[derive(Debug, Clone)]
pub struct AlpacaNewsFeed {
    rest: AlpacaRestClient,
}

impl AlpacaNewsFeed {
    pub fn new(rest: AlpacaRestClient) -> Self {
        Self { rest }
    }
}

#[async_trait]
impl NewsFeed for AlpacaNewsFeed {
    async fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<String>> {
        let mut headlines = Vec::new();
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_NEWS_PAGES {
            let page = self
                .rest
                .get_news(symbol, start, end, NEWS_PAGE_LIMIT, page_token.as_deref())
                .await
                .map_err(|e| match e {
                    TraderError::Authentication(_) => e,
                    other => TraderError::NewsFeed(other.to_string()),
                })?;

            headlines.extend(page.news.into_iter().map(|item| item.headline));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => return Ok(headlines),
            }
        }

        warn!(%symbol, pages = MAX_NEWS_PAGES, "News pagination truncated");
        Ok(headlines)
    }
}
