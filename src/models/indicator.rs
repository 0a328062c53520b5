use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

pub const MIN_WEIGHT: u32 = 1;
pub const MAX_WEIGHT: u32 = 100;

/// One indicator in a user's configuration for a pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorWeight {
    pub indicator_id: String,
    pub weight: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl IndicatorWeight {
    pub fn new(indicator_id: impl Into<String>, weight: u32) -> Self {
        Self {
            indicator_id: indicator_id.into(),
            weight,
            is_active: true,
        }
    }

    pub fn inactive(indicator_id: impl Into<String>, weight: u32) -> Self {
        Self {
            is_active: false,
            ..Self::new(indicator_id, weight)
        }
    }

    pub fn weight_in_range(&self) -> bool {
        (MIN_WEIGHT..=MAX_WEIGHT).contains(&self.weight)
    }
}

/// Per-indicator vote. Each score lies in `[0, 1]`; the three are relative
/// weights inside one indicator and need not sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorSignal {
    pub buy: Decimal,
    pub sell: Decimal,
    pub hold: Decimal,
}

impl IndicatorSignal {
    pub const fn new(buy: Decimal, sell: Decimal, hold: Decimal) -> Self {
        Self { buy, sell, hold }
    }

    /// Vote substituted for indicators nobody knows how to score.
    pub fn neutral() -> Self {
        Self::new(dec!(0.33), dec!(0.33), dec!(0.34))
    }

    /// Each score within `[0, 1]`.
    pub fn in_unit_range(&self) -> bool {
        [self.buy, self.sell, self.hold]
            .iter()
            .all(|s| *s >= Decimal::ZERO && *s <= Decimal::ONE)
    }
}
