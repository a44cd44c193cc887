use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::common::errors::{Result, TraderError};

/// Whole-share position sizing from a fixed fraction of cash
///
/// quantity = floor(cash × risk_fraction / last_price)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionSizer {
    risk_fraction: Decimal,
}

impl PositionSizer {
    /// `risk_fraction` must be in (0, 1]; anything else is a startup error
    pub fn new(risk_fraction: Decimal) -> Result<Self> {
        if risk_fraction <= Decimal::ZERO || risk_fraction > Decimal::ONE {
            return Err(TraderError::Configuration(format!(
                "risk fraction must be in (0, 1], got {}",
                risk_fraction
            )));
        }
        Ok(Self { risk_fraction })
    }

    /// Number of shares to trade
    ///
    /// Fails with `PriceUnavailable` when there is no positive price.
    /// Non-positive cash sizes to zero.
    pub fn size(&self, symbol: &str, cash: Decimal, last_price: Option<Decimal>) -> Result<u64> {
        let price = match last_price {
            Some(p) if p > Decimal::ZERO => p,
            _ => return Err(TraderError::PriceUnavailable(symbol.to_string())),
        };

        if cash <= Decimal::ZERO {
            return Ok(0);
        }

        let budget = cash
            .checked_mul(self.risk_fraction)
            .ok_or_else(|| TraderError::Internal(format!("cash overflow sizing {}", symbol)))?;
        let shares = budget
            .checked_div(price)
            .ok_or_else(|| TraderError::Internal(format!("division overflow sizing {}", symbol)))?
            .floor();

        // Anything past u64 is not a real account; saturate rather than fail.
        Ok(shares.to_u64().unwrap_or(u64::MAX))
    }
}
