use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Buy => "BUY",
            Decision::Sell => "SELL",
            Decision::Hold => "HOLD",
        }
    }

    /// The opposite trade side. HOLD has no opposite and maps to BUY.
    pub fn alternate(self) -> Decision {
        match self {
            Decision::Buy => Decision::Sell,
            Decision::Sell | Decision::Hold => Decision::Buy,
        }
    }

    pub fn is_trade(self) -> bool {
        !matches!(self, Decision::Hold)
    }
}

/// Aggregated decision and its confidence in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeDecision {
    pub decision: Decision,
    pub confidence: Decimal,
}

impl CompositeDecision {
    pub fn new(decision: Decision, confidence: Decimal) -> Self {
        Self {
            decision,
            confidence,
        }
    }
}
