use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{CompositeDecision, Decision, TradeParameters};

/// Identity of one weight configuration: a user trading a pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    pub user: String,
    pub pair: String,
}

impl PairKey {
    pub fn new(user: impl Into<String>, pair: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            pair: pair.into(),
        }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user, self.pair)
    }
}

/// Optional restriction of a run or report to one pair and/or one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalFilter {
    pub pair: Option<String>,
    pub user: Option<String>,
}

impl SignalFilter {
    pub fn matches(&self, key: &PairKey) -> bool {
        self.pair.as_ref().map_or(true, |p| *p == key.pair)
            && self.user.as_ref().map_or(true, |u| *u == key.user)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub id: u64,
    pub key: PairKey,
    pub decision: Decision,
    pub price: Decimal,
    pub params: TradeParameters,
    /// Composite confidence in `[0, 1]`.
    pub confidence: Decimal,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub is_executed: bool,
    #[serde(default)]
    pub execution_time: Option<DateTime<Utc>>,
}

impl SignalRecord {
    pub fn new(
        key: PairKey,
        price: Decimal,
        composite: CompositeDecision,
        params: TradeParameters,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: 0,
            key,
            decision: composite.decision,
            price,
            params,
            confidence: composite.confidence,
            timestamp,
            is_executed: false,
            execution_time: None,
        }
    }

    pub fn composite(&self) -> CompositeDecision {
        CompositeDecision::new(self.decision, self.confidence)
    }

    /// Confidence on the 0-100 scale shown to users.
    pub fn confidence_percent(&self) -> Decimal {
        self.confidence * dec!(100)
    }
}
