use rust_decimal::Decimal;
use std::collections::HashMap;

use signal_engine::core::IndicatorSource;
use signal_engine::models::{IndicatorSignal, PairKey};

/// Indicator source that scores by a price threshold: above it votes
/// sell, at or below it votes buy. Unlisted indicators are unknown.
pub struct ThresholdSource {
    thresholds: HashMap<String, Decimal>,
}

impl ThresholdSource {
    pub fn new(entries: &[(&str, Decimal)]) -> Self {
        Self {
            thresholds: entries
                .iter()
                .map(|(id, t)| (id.to_string(), *t))
                .collect(),
        }
    }
}

impl IndicatorSource for ThresholdSource {
    fn signal(&self, indicator_id: &str, price: Decimal) -> Option<IndicatorSignal> {
        let threshold = self.thresholds.get(indicator_id)?;
        Some(if price > *threshold {
            IndicatorSignal::new(Decimal::ZERO, Decimal::ONE, Decimal::ZERO)
        } else {
            IndicatorSignal::new(Decimal::ONE, Decimal::ZERO, Decimal::ZERO)
        })
    }
}

pub fn key(user: &str, pair: &str) -> PairKey {
    PairKey::new(user, pair)
}
