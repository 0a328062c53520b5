pub mod memory;

pub use memory::InMemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::EngineResult;
use crate::models::{Decision, IndicatorWeight, PairKey, SignalRecord};

/// Per-(user, pair) indicator weight configuration.
///
/// Writes must check the instrument-count and weight-sum limits against the
/// post-write state and apply atomically: a rejected write leaves the stored
/// set untouched.
#[async_trait]
pub trait WeightStore: Send + Sync {
    /// Every entry, active or not.
    async fn weights(&self, key: &PairKey) -> EngineResult<Vec<IndicatorWeight>>;
    async fn active_weights(&self, key: &PairKey) -> EngineResult<Vec<IndicatorWeight>>;
    /// Insert or update the entry for `weight.indicator_id`.
    async fn upsert_weight(&self, key: &PairKey, weight: IndicatorWeight) -> EngineResult<()>;
    /// Returns whether an entry was removed.
    async fn remove_weight(&self, key: &PairKey, indicator_id: &str) -> EngineResult<bool>;
    async fn replace_weights(&self, key: &PairKey, weights: Vec<IndicatorWeight>)
        -> EngineResult<()>;
}

/// History of generated signals and their execution state.
#[async_trait]
pub trait SignalStore: Send + Sync {
    async fn latest_decision(&self, key: &PairKey) -> EngineResult<Option<Decision>>;
    /// Persist a new signal and return it with its assigned id.
    async fn record(&self, signal: SignalRecord) -> EngineResult<SignalRecord>;
    async fn get(&self, id: u64) -> EngineResult<Option<SignalRecord>>;
    async fn mark_executed(&self, id: u64, at: DateTime<Utc>) -> EngineResult<SignalRecord>;
    /// Signals with `from <= timestamp <= to`, optionally for one key, oldest first.
    async fn signals_between(
        &self,
        key: Option<&PairKey>,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> EngineResult<Vec<SignalRecord>>;
}
