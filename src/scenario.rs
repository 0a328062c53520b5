use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::models::{IndicatorWeight, PairKey, SignalFilter};
use crate::store::WeightStore;

/// Batch input: current prices and every user's weight configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub pairs: Vec<PairQuote>,
    #[serde(default)]
    pub users: Vec<UserSetup>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairQuote {
    pub pair: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSetup {
    pub user: String,
    #[serde(default)]
    pub pairs: Vec<PairWeights>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairWeights {
    pub pair: String,
    #[serde(default)]
    pub weights: Vec<IndicatorWeight>,
}

impl Scenario {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("parsing scenario {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Write every configured weight set. Sets breaking the store's limits
    /// are logged and skipped; returns how many were accepted.
    pub async fn seed(&self, store: &dyn WeightStore) -> Result<usize> {
        let mut accepted = 0;
        for u in &self.users {
            for pw in &u.pairs {
                let key = PairKey::new(&u.user, &pw.pair);
                match store.replace_weights(&key, pw.weights.clone()).await {
                    Ok(()) => accepted += 1,
                    Err(e) => warn!("Rejected weights for {}: {}", key, e),
                }
            }
        }
        info!("Seeded {} weight configuration(s)", accepted);
        Ok(accepted)
    }

    /// Every (user, pair) passing `filter` that has a known price and at
    /// least one stored weight, in file order. Pairs whose set is empty or
    /// was rejected at seed time are skipped.
    pub async fn evaluations(
        &self,
        store: &dyn WeightStore,
        filter: &SignalFilter,
    ) -> Result<Vec<(PairKey, Decimal)>> {
        let prices: HashMap<&str, Decimal> = self
            .pairs
            .iter()
            .map(|q| (q.pair.as_str(), q.price))
            .collect();

        let mut out = Vec::new();
        for u in &self.users {
            for pw in &u.pairs {
                let key = PairKey::new(&u.user, &pw.pair);
                if !filter.matches(&key) {
                    continue;
                }
                let Some(&price) = prices.get(pw.pair.as_str()) else {
                    warn!("No price for {} (user {}), skipping", pw.pair, u.user);
                    continue;
                };
                if store.weights(&key).await?.is_empty() {
                    debug!("No weighted indicators for {}, skipping", key);
                    continue;
                }
                out.push((key, price));
            }
        }
        Ok(out)
    }
}
