use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::config::Config;
use crate::core::IndicatorSource;
use crate::models::{
    CompositeDecision, Decision, IndicatorSignal, PairKey, SignalRecord, TradeParameters,
};

/// Indicator source with hand-set votes. Unknown ids return `None`.
pub struct FixedSource {
    votes: HashMap<String, IndicatorSignal>,
}

impl FixedSource {
    pub fn new() -> Self {
        Self {
            votes: HashMap::new(),
        }
    }

    /// Integer shorthand for votes of 0 or 1.
    pub fn with(self, id: &str, (buy, sell, hold): (i64, i64, i64)) -> Self {
        self.with_signal(
            id,
            IndicatorSignal::new(Decimal::from(buy), Decimal::from(sell), Decimal::from(hold)),
        )
    }

    pub fn with_signal(mut self, id: &str, signal: IndicatorSignal) -> Self {
        self.votes.insert(id.to_string(), signal);
        self
    }
}

impl Default for FixedSource {
    fn default() -> Self {
        Self::new()
    }
}

impl IndicatorSource for FixedSource {
    fn signal(&self, indicator_id: &str, _price: Decimal) -> Option<IndicatorSignal> {
        self.votes.get(indicator_id).copied()
    }
}

pub fn btc_key() -> PairKey {
    PairKey::new("alice", "BTC/USD")
}

/// A signal with no trade parameters, for history tests.
pub fn record_at(key: &PairKey, decision: Decision, at: DateTime<Utc>) -> SignalRecord {
    SignalRecord::new(
        key.clone(),
        Decimal::ONE_HUNDRED,
        CompositeDecision::new(decision, Decimal::ZERO),
        TradeParameters::none(),
        at,
    )
}

/// A Config suitable for testing: default limits and levels, quiet logging.
pub fn default_test_config() -> Config {
    Config {
        signals_file: std::env::temp_dir()
            .join("signal_engine_test.json")
            .to_string_lossy()
            .to_string(),
        log_level: "ERROR".to_string(),
        ..Config::default()
    }
}
