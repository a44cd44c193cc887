use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::types::{BracketOrder, PositionSide, SentimentReading};

/// Everything the decision core needs for one iteration
///
/// Built fresh by the controller each time; nothing in here survives
/// into the next iteration.
#[derive(Debug, Clone)]
pub struct IterationContext {
    pub now: DateTime<Utc>,
    pub cash: Decimal,
    /// `None` when the broker has no quote
    pub last_price: Option<Decimal>,
    pub sentiment: SentimentReading,
}

/// A single broker-facing step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Close the whole position in the symbol
    Flatten { symbol: String },
    /// Open a new bracketed position
    Submit(BracketOrder),
}

/// Why an iteration produced no orders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldReason {
    /// Neutral label or confidence at/below the threshold
    NoConviction,
    /// Signal was strong but sizing rounded down to zero shares
    ZeroQuantity,
}

/// Strategy decision output
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// No action should be taken
    Hold(HoldReason),
    /// Open `order`, closing the opposite side first when `flatten` is set
    Trade {
        flatten: bool,
        order: BracketOrder,
        next_side: PositionSide,
    },
}

impl Decision {
    pub fn hold(reason: HoldReason) -> Self {
        Self::Hold(reason)
    }

    /// Returns true if this decision sends anything to the broker
    pub fn is_trade(&self) -> bool {
        matches!(self, Self::Trade { .. })
    }

    /// Broker steps in execution order
    pub fn actions(&self) -> Vec<Action> {
        match self {
            Decision::Hold(_) => Vec::new(),
            Decision::Trade { flatten, order, .. } => {
                let mut actions = Vec::with_capacity(2);
                if *flatten {
                    actions.push(Action::Flatten {
                        symbol: order.symbol.clone(),
                    });
                }
                actions.push(Action::Submit(order.clone()));
                actions
            }
        }
    }
}
