use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tracing::debug;

use crate::core::indicators::IndicatorSource;
use crate::error::{EngineError, EngineResult};
use crate::models::{CompositeDecision, Decision, IndicatorSignal, IndicatorWeight};

/// Combines weighted indicator votes into one composite decision.
///
/// Each weight is taken as a fraction of 100 and scales that indicator's
/// buy/sell/hold scores into three running totals. The strictly greatest
/// total wins and becomes the confidence; any tie resolves to HOLD, whose
/// confidence is the hold total.
/// Weights need not sum to 100, a partial configuration just yields
/// smaller totals.
pub struct WeightAggregator {
    source: Arc<dyn IndicatorSource>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteTotals {
    pub buy: Decimal,
    pub sell: Decimal,
    pub hold: Decimal,
}

impl VoteTotals {
    fn add(&mut self, fraction: Decimal, vote: &IndicatorSignal) {
        self.buy += fraction * vote.buy;
        self.sell += fraction * vote.sell;
        self.hold += fraction * vote.hold;
    }

    pub fn decide(&self) -> CompositeDecision {
        if self.buy > self.sell && self.buy > self.hold {
            CompositeDecision::new(Decision::Buy, self.buy)
        } else if self.sell > self.buy && self.sell > self.hold {
            CompositeDecision::new(Decision::Sell, self.sell)
        } else {
            // HOLD wins outright or breaks a tie; confidence is the hold total either way.
            CompositeDecision::new(Decision::Hold, self.hold)
        }
    }
}

impl WeightAggregator {
    pub fn new(source: Arc<dyn IndicatorSource>) -> Self {
        Self { source }
    }

    pub fn aggregate(
        &self,
        weights: &[IndicatorWeight],
        price: Decimal,
    ) -> EngineResult<CompositeDecision> {
        Ok(self.totals(weights, price)?.decide())
    }

    pub fn totals(&self, weights: &[IndicatorWeight], price: Decimal) -> EngineResult<VoteTotals> {
        if weights.is_empty() {
            return Err(EngineError::Configuration(
                "no weighted indicators to aggregate".to_string(),
            ));
        }

        let mut totals = VoteTotals::default();
        for w in weights {
            if !w.weight_in_range() {
                return Err(EngineError::Validation(format!(
                    "weight {} for indicator '{}' outside 1..=100",
                    w.weight, w.indicator_id
                )));
            }

            let vote = self.vote(&w.indicator_id, price);
            if !vote.in_unit_range() {
                return Err(EngineError::Validation(format!(
                    "indicator '{}' scored {}/{}/{}, each score must be within [0, 1]",
                    w.indicator_id, vote.buy, vote.sell, vote.hold
                )));
            }

            let fraction = Decimal::from(w.weight) / dec!(100);
            totals.add(fraction, &vote);
        }

        Ok(totals)
    }

    fn vote(&self, indicator_id: &str, price: Decimal) -> IndicatorSignal {
        match self.source.signal(indicator_id, price) {
            Some(s) => s,
            None => {
                debug!("Unknown indicator '{}', using neutral vote", indicator_id);
                IndicatorSignal::neutral()
            }
        }
    }
}
