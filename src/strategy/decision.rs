//! Sentiment-driven decision state machine
//!
//! ```text
//!            positive > threshold              negative > threshold
//!   None ───────────────────────► Long   None ───────────────────────► Short
//!   Short ── flatten, then buy ─► Long   Long ── flatten, then sell ──► Short
//!   Long  ── buy (add) ─────────► Long   Short ── sell (add) ─────────► Short
//! ```
//!
//! Anything else holds. Affordability (cash > last price) is checked before
//! the sentiment is even looked at.

use tracing::{debug, warn};

use crate::common::errors::{Result, TraderError};
use crate::common::types::{BracketOrder, PositionSide, SentimentLabel, Side};
use crate::config::types::StrategyConfig;
use crate::strategy::bracket::BracketCalculator;
use crate::strategy::size_calculator::PositionSizer;
use crate::strategy::traits::Strategy;
use crate::strategy::types::{Decision, HoldReason, IterationContext};

/// Single-symbol strategy trading on high-conviction news sentiment
#[derive(Debug, Clone)]
pub struct SentimentStrategy {
    symbol: String,
    conviction_threshold: f64,
    sizer: PositionSizer,
    brackets: BracketCalculator,
    side: PositionSide,
}

impl SentimentStrategy {
    pub fn new(cfg: &StrategyConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            symbol: cfg.symbol.clone(),
            conviction_threshold: cfg.conviction_threshold,
            sizer: PositionSizer::new(cfg.cash_at_risk)?,
            brackets: BracketCalculator::new(cfg.bracket.clone())?,
            side: PositionSide::None,
        })
    }

    /// Side the strategy believes it holds
    pub fn side(&self) -> PositionSide {
        self.side
    }

    /// Decide the next action without touching state
    pub fn decide(&self, ctx: &IterationContext) -> Result<Decision> {
        let price = match ctx.last_price {
            Some(p) if p > rust_decimal::Decimal::ZERO => p,
            _ => return Err(TraderError::PriceUnavailable(self.symbol.clone())),
        };

        if ctx.cash <= price {
            return Err(TraderError::InsufficientCash {
                cash: ctx.cash,
                price,
            });
        }

        let sentiment = ctx.sentiment;
        let convinced = sentiment.confidence > self.conviction_threshold;
        let side = match sentiment.label {
            SentimentLabel::Positive if convinced => Side::Buy,
            SentimentLabel::Negative if convinced => Side::Sell,
            _ => {
                debug!(
                    label = ?sentiment.label,
                    confidence = sentiment.confidence,
                    "Below conviction threshold, holding"
                );
                return Ok(Decision::hold(HoldReason::NoConviction));
            }
        };

        let quantity = self.sizer.size(&self.symbol, ctx.cash, Some(price))?;
        if quantity == 0 {
            warn!(
                symbol = %self.symbol,
                cash = %ctx.cash,
                price = %price,
                %side,
                "Signal sized to zero shares, holding"
            );
            return Ok(Decision::hold(HoldReason::ZeroQuantity));
        }

        let levels = self.brackets.bracket(price, side)?;

        Ok(Decision::Trade {
            flatten: self.side.opposes(side),
            order: BracketOrder {
                symbol: self.symbol.clone(),
                side,
                quantity,
                reference_price: price,
                take_profit_price: levels.take_profit,
                stop_loss_price: levels.stop_loss,
            },
            next_side: PositionSide::after(side),
        })
    }

    /// Apply the side transition of an executed decision
    pub fn commit(&mut self, decision: &Decision) {
        if let Decision::Trade { next_side, .. } = decision {
            debug!(from = %self.side, to = %next_side, "Position side transition");
            self.side = *next_side;
        }
    }
}

impl Strategy for SentimentStrategy {
    fn name(&self) -> &str {
        "news_sentiment"
    }

    fn configure(&mut self, cfg: &StrategyConfig) -> Result<()> {
        let side = self.side;
        *self = Self::new(cfg)?;
        self.side = side;
        Ok(())
    }

    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn on_iteration(&self, ctx: &IterationContext) -> Result<Decision> {
        self.decide(ctx)
    }

    fn on_submitted(&mut self, decision: &Decision) {
        self.commit(decision);
    }
}
