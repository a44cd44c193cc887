use rust_decimal::Decimal;

use crate::common::errors::{Result, TraderError};
use crate::common::types::{BracketLevels, Side};
use crate::config::types::BracketConfig;

/// Fixed-percentage take-profit / stop-loss levels
///
/// Long:  tp = p·(1 + long_tp), sl = p·(1 − long_sl)
/// Short: tp = p·(1 − short_tp), sl = p·(1 + short_sl)
#[derive(Debug, Clone)]
pub struct BracketCalculator {
    config: BracketConfig,
}

impl BracketCalculator {
    pub fn new(config: BracketConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn bracket(&self, reference_price: Decimal, side: Side) -> Result<BracketLevels> {
        if reference_price <= Decimal::ZERO {
            return Err(TraderError::InvalidReferencePrice(reference_price));
        }

        let (tp_multiplier, sl_multiplier) = match side {
            Side::Buy => (
                Decimal::ONE + self.config.long_take_profit_pct,
                Decimal::ONE - self.config.long_stop_loss_pct,
            ),
            Side::Sell => (
                Decimal::ONE - self.config.short_take_profit_pct,
                Decimal::ONE + self.config.short_stop_loss_pct,
            ),
        };

        Ok(BracketLevels {
            take_profit: reference_price * tp_multiplier,
            stop_loss: reference_price * sl_multiplier,
        })
    }
}

impl Default for BracketCalculator {
    fn default() -> Self {
        Self {
            config: BracketConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_long_levels() {
        let levels = BracketCalculator::default().bracket(dec!(100), Side::Buy).unwrap();
        assert_eq!(levels.take_profit, dec!(120));
        assert_eq!(levels.stop_loss, dec!(95));
    }

    #[test]
    fn test_short_levels() {
        let levels = BracketCalculator::default().bracket(dec!(100), Side::Sell).unwrap();
        assert_eq!(levels.take_profit, dec!(80));
        assert_eq!(levels.stop_loss, dec!(105));
    }

    #[test]
    fn test_multipliers_hold_across_prices() {
        let calc = BracketCalculator::default();
        for p in [dec!(0.01), dec!(1), dec!(47.13), dec!(472.65), dec!(100000)] {
            let long = calc.bracket(p, Side::Buy).unwrap();
            assert_eq!(long.take_profit, p * dec!(1.20));
            assert_eq!(long.stop_loss, p * dec!(0.95));
            assert!(long.take_profit > p && p > long.stop_loss);

            let short = calc.bracket(p, Side::Sell).unwrap();
            assert_eq!(short.take_profit, p * dec!(0.80));
            assert_eq!(short.stop_loss, p * dec!(1.05));
            assert!(short.take_profit < p && p < short.stop_loss);
        }
    }

    #[test]
    fn test_custom_percentages() {
        let calc = BracketCalculator::new(BracketConfig {
            long_take_profit_pct: dec!(0.10),
            long_stop_loss_pct: dec!(0.02),
            short_take_profit_pct: dec!(0.15),
            short_stop_loss_pct: dec!(0.03),
        })
        .unwrap();

        let long = calc.bracket(dec!(200), Side::Buy).unwrap();
        assert_eq!((long.take_profit, long.stop_loss), (dec!(220), dec!(196)));

        let short = calc.bracket(dec!(200), Side::Sell).unwrap();
        assert_eq!((short.take_profit, short.stop_loss), (dec!(170), dec!(206)));
    }

    #[test]
    fn test_rejects_non_positive_reference() {
        let calc = BracketCalculator::default();
        for p in [dec!(0), dec!(-1)] {
            let err = calc.bracket(p, Side::Buy).unwrap_err();
            assert!(matches!(err, TraderError::InvalidReferencePrice(v) if v == p));
        }
    }
}
