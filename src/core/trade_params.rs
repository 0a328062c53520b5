use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::config::LevelConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{Decision, TradeLevels, TradeParameters};

/// Maps a composite decision onto entry, stop-loss and take-profit prices.
///
/// Higher confidence tightens the stop and widens the target. Confidence
/// scales the fractions before they touch a price.
pub struct TradeParameterCalculator {
    levels: LevelConfig,
}

impl TradeParameterCalculator {
    pub fn new(levels: LevelConfig) -> Self {
        Self { levels }
    }

    pub fn compute(
        &self,
        price: Decimal,
        decision: Decision,
        confidence: Decimal,
    ) -> EngineResult<TradeParameters> {
        if decision == Decision::Hold {
            return Ok(TradeParameters::none());
        }
        if price <= Decimal::ZERO {
            return Err(EngineError::Validation(format!(
                "price must be positive, got {}",
                price
            )));
        }
        if confidence < Decimal::ZERO || confidence > Decimal::ONE {
            return Err(EngineError::Validation(format!(
                "confidence must be within [0, 1], got {}",
                confidence
            )));
        }

        let cfg = &self.levels;
        let stop_fraction = cfg.stop_loss_base - confidence * cfg.stop_loss_confidence_step;
        let target_fraction = cfg.take_profit_base + confidence * cfg.take_profit_confidence_step;

        let (entry, stop_loss, take_profit) = match decision {
            Decision::Buy => {
                let entry = price * cfg.buy_entry_factor;
                (
                    entry,
                    entry * (Decimal::ONE - stop_fraction),
                    entry * (Decimal::ONE + target_fraction),
                )
            }
            Decision::Sell => {
                let entry = price * cfg.sell_entry_factor;
                (
                    entry,
                    entry * (Decimal::ONE + stop_fraction),
                    entry * (Decimal::ONE - target_fraction),
                )
            }
            Decision::Hold => return Ok(TradeParameters::none()),
        };

        let (risk, reward) = match decision {
            Decision::Buy => (entry - stop_loss, take_profit - entry),
            _ => (stop_loss - entry, entry - take_profit),
        };

        Ok(TradeLevels {
            entry_price: entry,
            stop_loss,
            take_profit,
            potential_gain_percent: target_fraction * dec!(100),
            risk_reward_ratio: risk_reward(risk, reward),
        }
        .into())
    }
}

impl Default for TradeParameterCalculator {
    fn default() -> Self {
        Self::new(LevelConfig::default())
    }
}

/// Reward over risk. A non-positive risk yields zero, not infinity.
pub fn risk_reward(risk: Decimal, reward: Decimal) -> Decimal {
    if risk > Decimal::ZERO {
        reward / risk
    } else {
        Decimal::ZERO
    }
}
