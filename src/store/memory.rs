use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::Config;
use crate::core::indicators::normalize_id;
use crate::error::{EngineError, EngineResult};
use crate::models::{Decision, IndicatorWeight, PairKey, SignalRecord};
use crate::store::{SignalStore, WeightStore};

/// Process-local weight configuration and signal history.
///
/// Every weight write validates the candidate set and swaps it in under one
/// write-lock acquisition, so concurrent writers serialize and can never
/// push a pair past its limits.
pub struct InMemoryStore {
    max_indicators: usize,
    max_total_weight: u32,
    weights: RwLock<HashMap<PairKey, Vec<IndicatorWeight>>>,
    signals: RwLock<SignalLog>,
}

#[derive(Default)]
struct SignalLog {
    next_id: u64,
    records: Vec<SignalRecord>,
}

impl InMemoryStore {
    pub fn new(cfg: &Config) -> Self {
        Self::with_limits(cfg.max_indicators_per_pair, cfg.max_total_weight)
    }

    pub fn with_limits(max_indicators: usize, max_total_weight: u32) -> Self {
        Self {
            max_indicators,
            max_total_weight,
            weights: RwLock::new(HashMap::new()),
            signals: RwLock::new(SignalLog::default()),
        }
    }

    fn validate(&self, key: &PairKey, set: &[IndicatorWeight]) -> EngineResult<()> {
        let mut seen = HashSet::new();
        for w in set {
            if !w.weight_in_range() {
                return Err(EngineError::Validation(format!(
                    "weight {} for indicator '{}' outside 1..=100",
                    w.weight, w.indicator_id
                )));
            }
            if !seen.insert(normalize_id(&w.indicator_id)) {
                return Err(EngineError::Validation(format!(
                    "indicator '{}' configured twice for {}",
                    w.indicator_id, key
                )));
            }
        }

        if set.len() > self.max_indicators {
            return Err(EngineError::InvariantViolation(format!(
                "maximum of {} indicators allowed for {}, got {}",
                self.max_indicators,
                key,
                set.len()
            )));
        }

        let total: u32 = set.iter().map(|w| w.weight).sum();
        if total > self.max_total_weight {
            return Err(EngineError::InvariantViolation(format!(
                "total weight {} exceeds {} for {}",
                total, self.max_total_weight, key
            )));
        }

        Ok(())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

#[async_trait]
impl WeightStore for InMemoryStore {
    async fn weights(&self, key: &PairKey) -> EngineResult<Vec<IndicatorWeight>> {
        let map = self.weights.read().await;
        Ok(map.get(key).cloned().unwrap_or_default())
    }

    async fn active_weights(&self, key: &PairKey) -> EngineResult<Vec<IndicatorWeight>> {
        let map = self.weights.read().await;
        Ok(map
            .get(key)
            .map(|set| set.iter().filter(|w| w.is_active).cloned().collect())
            .unwrap_or_default())
    }

    async fn upsert_weight(&self, key: &PairKey, weight: IndicatorWeight) -> EngineResult<()> {
        let mut map = self.weights.write().await;

        let mut candidate = map.get(key).cloned().unwrap_or_default();
        let id = normalize_id(&weight.indicator_id);
        match candidate
            .iter_mut()
            .find(|w| normalize_id(&w.indicator_id) == id)
        {
            Some(existing) => *existing = weight,
            None => candidate.push(weight),
        }

        self.validate(key, &candidate)?;
        debug!("Weights for {} now {} entries", key, candidate.len());
        map.insert(key.clone(), candidate);
        Ok(())
    }

    async fn remove_weight(&self, key: &PairKey, indicator_id: &str) -> EngineResult<bool> {
        let mut map = self.weights.write().await;
        let Some(set) = map.get_mut(key) else {
            return Ok(false);
        };

        let id = normalize_id(indicator_id);
        let before = set.len();
        set.retain(|w| normalize_id(&w.indicator_id) != id);
        let removed = set.len() != before;
        if set.is_empty() {
            map.remove(key);
        }
        Ok(removed)
    }

    async fn replace_weights(
        &self,
        key: &PairKey,
        weights: Vec<IndicatorWeight>,
    ) -> EngineResult<()> {
        let mut map = self.weights.write().await;
        self.validate(key, &weights)?;
        if weights.is_empty() {
            map.remove(key);
        } else {
            map.insert(key.clone(), weights);
        }
        Ok(())
    }
}

#[async_trait]
impl SignalStore for InMemoryStore {
    async fn latest_decision(&self, key: &PairKey) -> EngineResult<Option<Decision>> {
        let log = self.signals.read().await;
        Ok(log
            .records
            .iter()
            .filter(|r| &r.key == key)
            .max_by_key(|r| (r.timestamp, r.id))
            .map(|r| r.decision))
    }

    async fn record(&self, mut signal: SignalRecord) -> EngineResult<SignalRecord> {
        let mut log = self.signals.write().await;
        log.next_id += 1;
        signal.id = log.next_id;
        log.records.push(signal.clone());
        Ok(signal)
    }

    async fn get(&self, id: u64) -> EngineResult<Option<SignalRecord>> {
        let log = self.signals.read().await;
        Ok(log.records.iter().find(|r| r.id == id).cloned())
    }

    async fn mark_executed(&self, id: u64, at: DateTime<Utc>) -> EngineResult<SignalRecord> {
        let mut log = self.signals.write().await;
        let record = log
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| EngineError::Validation(format!("unknown signal #{}", id)))?;

        if record.is_executed {
            return Err(EngineError::Validation(format!(
                "signal #{} already executed",
                id
            )));
        }

        record.is_executed = true;
        record.execution_time = Some(at);
        info!("Signal #{} for {} marked executed", id, record.key);
        Ok(record.clone())
    }

    async fn signals_between(
        &self,
        key: Option<&PairKey>,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> EngineResult<Vec<SignalRecord>> {
        let log = self.signals.read().await;
        let mut out: Vec<SignalRecord> = log
            .records
            .iter()
            .filter(|r| key.map_or(true, |k| &r.key == k))
            .filter(|r| r.timestamp >= from && r.timestamp <= to)
            .cloned()
            .collect();
        out.sort_by_key(|r| (r.timestamp, r.id));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{btc_key, record_at};
    use chrono::Duration;
    use std::sync::Arc;

    #[tokio::test]
    async fn upsert_updates_existing_entry() {
        let store = InMemoryStore::default();
        let key = btc_key();
        store.upsert_weight(&key, IndicatorWeight::new("RSI", 40)).await.unwrap();
        store.upsert_weight(&key, IndicatorWeight::new("rsi", 60)).await.unwrap();
        let ws = store.weights(&key).await.unwrap();
        assert_eq!(ws.len(), 1);
        assert_eq!(ws[0].weight, 60);
    }

    #[tokio::test]
    async fn sixth_indicator_rejected_and_state_kept() {
        let store = InMemoryStore::default();
        let key = btc_key();
        for id in ["a", "b", "c", "d", "e"] {
            store.upsert_weight(&key, IndicatorWeight::new(id, 10)).await.unwrap();
        }
        let before = store.weights(&key).await.unwrap();

        let err = store
            .upsert_weight(&key, IndicatorWeight::new("f", 10))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvariantViolation(_)));
        assert_eq!(store.weights(&key).await.unwrap(), before);
    }

    #[tokio::test]
    async fn weight_sum_over_limit_rejected_and_state_kept() {
        let store = InMemoryStore::default();
        let key = btc_key();
        store.upsert_weight(&key, IndicatorWeight::new("rsi", 70)).await.unwrap();
        let err = store
            .upsert_weight(&key, IndicatorWeight::new("macd", 31))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvariantViolation(_)));
        // Out-of-range update of an existing entry is rejected as well.
        let err = store
            .upsert_weight(&key, IndicatorWeight::new("rsi", 101))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(store.weights(&key).await.unwrap(), vec![IndicatorWeight::new("rsi", 70)]);
    }

    #[tokio::test]
    async fn inactive_entries_count_but_are_not_active() {
        let store = InMemoryStore::default();
        let key = btc_key();
        store.upsert_weight(&key, IndicatorWeight::inactive("atr", 60)).await.unwrap();
        store.upsert_weight(&key, IndicatorWeight::new("ema", 40)).await.unwrap();
        let active = store.active_weights(&key).await.unwrap();
        assert_eq!(active, vec![IndicatorWeight::new("ema", 40)]);
        assert!(store
            .upsert_weight(&key, IndicatorWeight::new("sma", 1))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn replace_is_all_or_nothing() {
        let store = InMemoryStore::default();
        let key = btc_key();
        store
            .replace_weights(&key, vec![IndicatorWeight::new("rsi", 50)])
            .await
            .unwrap();
        let dup = vec![IndicatorWeight::new("rsi", 10), IndicatorWeight::new("RSI", 10)];
        assert!(matches!(
            store.replace_weights(&key, dup).await.unwrap_err(),
            EngineError::Validation(_)
        ));
        assert_eq!(store.weights(&key).await.unwrap(), vec![IndicatorWeight::new("rsi", 50)]);
        assert!(store.remove_weight(&key, "RSI").await.unwrap());
        assert!(!store.remove_weight(&key, "rsi").await.unwrap());
        assert!(store.weights(&key).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_writers_never_overshoot() {
        let store = Arc::new(InMemoryStore::default());
        let key = btc_key();

        let mut handles = Vec::new();
        for i in 0..12 {
            let store = store.clone();
            let key = key.clone();
            handles.push(tokio::spawn(async move {
                store
                    .upsert_weight(&key, IndicatorWeight::new(format!("ind{}", i), 30))
                    .await
                    .is_ok()
            }));
        }

        let mut accepted = 0;
        for h in handles {
            if h.await.unwrap() {
                accepted += 1;
            }
        }

        let ws = store.weights(&key).await.unwrap();
        let total: u32 = ws.iter().map(|w| w.weight).sum();
        assert_eq!(accepted, 3);
        assert_eq!(ws.len(), 3);
        assert!(total <= 100);
    }

    #[tokio::test]
    async fn signal_history_and_execution() {
        let store = InMemoryStore::default();
        let key = btc_key();
        let t0 = Utc::now();
        assert_eq!(store.latest_decision(&key).await.unwrap(), None);

        store.record(record_at(&key, Decision::Buy, t0)).await.unwrap();
        let second = store
            .record(record_at(&key, Decision::Sell, t0 + Duration::minutes(1)))
            .await
            .unwrap();
        assert_eq!(second.id, 2);
        assert_eq!(store.latest_decision(&key).await.unwrap(), Some(Decision::Sell));

        let executed = store.mark_executed(second.id, t0).await.unwrap();
        assert!(executed.is_executed);
        assert_eq!(executed.execution_time, Some(t0));
        assert!(store.mark_executed(second.id, t0).await.is_err());
        assert!(store.mark_executed(99, t0).await.is_err());

        let window = store
            .signals_between(Some(&key), t0 + Duration::seconds(30), t0 + Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].decision, Decision::Sell);
        let other = PairKey::new("bob", "ETH/USD");
        assert!(store
            .signals_between(Some(&other), t0, t0 + Duration::hours(1))
            .await
            .unwrap()
            .is_empty());
    }
}
