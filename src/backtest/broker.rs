//! In-memory broker filling at the daily close

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::data::PriceSeries;
use crate::common::errors::{Result, TraderError};
use crate::common::traits::Broker;
use crate::common::types::{BracketOrder, OrderHandle, Side};

/// Exit legs still working for an entry
#[derive(Debug, Clone, PartialEq, Eq)]
struct OpenBracket {
    side: Side,
    quantity: u64,
    take_profit: Decimal,
    stop_loss: Decimal,
}

impl OpenBracket {
    fn triggered_at(&self, price: Decimal) -> bool {
        match self.side {
            Side::Buy => price >= self.take_profit || price <= self.stop_loss,
            Side::Sell => price <= self.take_profit || price >= self.stop_loss,
        }
    }
}

#[derive(Debug)]
struct AccountState {
    date: Option<NaiveDate>,
    cash: Decimal,
    /// Signed share count, negative when short
    position: i64,
    brackets: Vec<OpenBracket>,
    orders: u64,
    flattens: u64,
    bracket_exits: u64,
}

/// Account snapshot for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSnapshot {
    pub cash: Decimal,
    pub position: i64,
    pub open_brackets: usize,
    pub orders: u64,
    pub flattens: u64,
    pub bracket_exits: u64,
    /// Cash plus the position marked at the latest known close
    pub portfolio_value: Decimal,
}

/// Simulated single-symbol account
///
/// Orders fill at the current day's close. Bracket exits are checked
/// against each new close and also fill at that close.
pub struct SimulatedBroker {
    symbol: String,
    prices: PriceSeries,
    state: RwLock<AccountState>,
}

impl SimulatedBroker {
    pub fn new(symbol: impl Into<String>, prices: PriceSeries, starting_cash: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            prices,
            state: RwLock::new(AccountState {
                date: None,
                cash: starting_cash,
                position: 0,
                brackets: Vec::new(),
                orders: 0,
                flattens: 0,
                bracket_exits: 0,
            }),
        }
    }

    /// Move to `date` and settle any bracket whose level the close crossed
    pub async fn advance_to(&self, date: NaiveDate) {
        let mut state = self.state.write().await;
        state.date = Some(date);

        let Some(price) = self.prices.close_on(date) else {
            debug!(%date, "No bar for date");
            return;
        };

        let (hit, open): (Vec<_>, Vec<_>) = std::mem::take(&mut state.brackets)
            .into_iter()
            .partition(|b| b.triggered_at(price));
        state.brackets = open;

        for bracket in hit {
            let qty = Decimal::from(bracket.quantity);
            match bracket.side {
                Side::Buy => {
                    state.cash += qty * price;
                    state.position -= bracket.quantity as i64;
                }
                Side::Sell => {
                    state.cash -= qty * price;
                    state.position += bracket.quantity as i64;
                }
            }
            state.bracket_exits += 1;
            info!(%date, side = %bracket.side, quantity = bracket.quantity, %price, "Bracket exit");
        }
    }

    pub async fn snapshot(&self) -> AccountSnapshot {
        let state = self.state.read().await;
        let mark = state
            .date
            .and_then(|d| self.prices.close_on_or_before(d))
            .unwrap_or(Decimal::ZERO);

        AccountSnapshot {
            cash: state.cash,
            position: state.position,
            open_brackets: state.brackets.len(),
            orders: state.orders,
            flattens: state.flattens,
            bracket_exits: state.bracket_exits,
            portfolio_value: state.cash + Decimal::from(state.position) * mark,
        }
    }

    fn price_today(&self, state: &AccountState) -> Result<Decimal> {
        state
            .date
            .and_then(|d| self.prices.close_on(d))
            .ok_or_else(|| TraderError::BrokerRejection(format!("no market for {} today", self.symbol)))
    }

    fn check_symbol(&self, symbol: &str) -> Result<()> {
        if symbol.eq_ignore_ascii_case(&self.symbol) {
            Ok(())
        } else {
            Err(TraderError::BrokerRejection(format!("unknown symbol {}", symbol)))
        }
    }
}

#[async_trait]
impl Broker for SimulatedBroker {
    async fn cash(&self) -> Result<Decimal> {
        Ok(self.state.read().await.cash)
    }

    async fn last_price(&self, symbol: &str) -> Result<Option<Decimal>> {
        self.check_symbol(symbol)?;
        let state = self.state.read().await;
        Ok(state.date.and_then(|d| self.prices.close_on(d)))
    }

    async fn submit(&self, order: &BracketOrder) -> Result<OrderHandle> {
        self.check_symbol(&order.symbol)?;
        if order.quantity == 0 {
            return Err(TraderError::BrokerRejection("zero quantity".to_string()));
        }

        let mut state = self.state.write().await;
        let price = self.price_today(&state)?;
        let notional = Decimal::from(order.quantity) * price;
        let shares = i64::try_from(order.quantity)
            .map_err(|_| TraderError::BrokerRejection(format!("quantity {} too large", order.quantity)))?;

        match order.side {
            Side::Buy => {
                if notional > state.cash {
                    return Err(TraderError::BrokerRejection(format!(
                        "insufficient buying power: {} needed, {} available",
                        notional, state.cash
                    )));
                }
                state.cash -= notional;
                state.position += shares;
            }
            Side::Sell => {
                state.cash += notional;
                state.position -= shares;
            }
        }

        state.brackets.push(OpenBracket {
            side: order.side,
            quantity: order.quantity,
            take_profit: order.take_profit_price,
            stop_loss: order.stop_loss_price,
        });
        state.orders += 1;

        Ok(OrderHandle::new(format!("sim-{}", state.orders)))
    }

    async fn flatten(&self, symbol: &str) -> Result<()> {
        self.check_symbol(symbol)?;
        let mut state = self.state.write().await;
        let price = self.price_today(&state)?;

        let held = Decimal::from(state.position);
        state.cash += held * price;
        state.position = 0;
        state.brackets.clear();
        state.flattens += 1;
        Ok(())
    }
}
