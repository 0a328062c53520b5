use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::core::{FallbackStrategy, IndicatorSource, TradeParameterCalculator, WeightAggregator};
use crate::error::{EngineError, EngineResult};
use crate::models::{CompositeDecision, PairKey, SignalRecord};
use crate::store::{SignalStore, WeightStore};

/// Turns a pair's weight configuration and current price into a signal
/// with trade parameters.
///
/// Holds no mutable state of its own; evaluations for different keys are
/// independent and may run concurrently.
pub struct SignalDecisionEngine {
    weights: Arc<dyn WeightStore>,
    signals: Arc<dyn SignalStore>,
    aggregator: WeightAggregator,
    calculator: TradeParameterCalculator,
    fallback: FallbackStrategy,
}

impl SignalDecisionEngine {
    pub fn new(
        cfg: &Config,
        weights: Arc<dyn WeightStore>,
        signals: Arc<dyn SignalStore>,
        source: Arc<dyn IndicatorSource>,
    ) -> Self {
        Self {
            weights,
            signals,
            aggregator: WeightAggregator::new(source),
            calculator: TradeParameterCalculator::new(cfg.levels.clone()),
            fallback: FallbackStrategy::new(cfg.fallback.clone()),
        }
    }

    pub fn aggregator(&self) -> &WeightAggregator {
        &self.aggregator
    }

    pub fn calculator(&self) -> &TradeParameterCalculator {
        &self.calculator
    }

    /// Decide and record a signal for `key` at `price`.
    pub async fn generate_signal(
        &self,
        key: &PairKey,
        price: Decimal,
    ) -> EngineResult<SignalRecord> {
        let signal = self.preview_signal(key, price).await?;
        let signal = self.signals.record(signal).await?;

        info!(
            "Generated {} signal #{} for {} at {} (confidence {:.2}%)",
            signal.decision,
            signal.id,
            key,
            price,
            signal.confidence_percent()
        );
        if let Some(l) = signal.params.levels() {
            info!(
                "  entry {} | SL {} | TP {} | gain {:.2}% | R:R {:.2}",
                l.entry_price.round_dp(8),
                l.stop_loss.round_dp(8),
                l.take_profit.round_dp(8),
                l.potential_gain_percent,
                l.risk_reward_ratio
            );
        }
        Ok(signal)
    }

    /// Same decision as [`generate_signal`](Self::generate_signal) without
    /// recording it.
    pub async fn preview_signal(
        &self,
        key: &PairKey,
        price: Decimal,
    ) -> EngineResult<SignalRecord> {
        if price <= Decimal::ZERO {
            return Err(EngineError::Validation(format!(
                "price must be positive, got {}",
                price
            )));
        }

        let composite = self.decide(key, price).await?;
        let params = self
            .calculator
            .compute(price, composite.decision, composite.confidence)?;

        Ok(SignalRecord::new(
            key.clone(),
            price,
            composite,
            params,
            Utc::now(),
        ))
    }

    async fn decide(&self, key: &PairKey, price: Decimal) -> EngineResult<CompositeDecision> {
        let active = self.weights.active_weights(key).await?;
        match self.aggregator.aggregate(&active, price) {
            Err(EngineError::Configuration(_)) => {
                warn!("No weighted indicators for {}, using fallback strategy", key);
                let previous = self.signals.latest_decision(key).await?;
                Ok(self.fallback.decide(previous))
            }
            other => other,
        }
    }

    /// Mark a recorded signal as executed now.
    pub async fn execute_signal(&self, id: u64) -> EngineResult<SignalRecord> {
        let signal = self
            .signals
            .get(id)
            .await?
            .ok_or_else(|| EngineError::Validation(format!("unknown signal #{}", id)))?;
        if !signal.decision.is_trade() {
            return Err(EngineError::Validation(format!(
                "signal #{} is {} and has nothing to execute",
                id, signal.decision
            )));
        }

        info!("Executing {} signal #{} for {}", signal.decision, id, signal.key);
        self.signals.mark_executed(id, Utc::now()).await
    }
}
