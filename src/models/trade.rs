use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Concrete levels for one BUY or SELL decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeLevels {
    pub entry_price: Decimal,
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
    pub potential_gain_percent: Decimal,
    pub risk_reward_ratio: Decimal,
}

/// Trade parameters attached to a signal. HOLD decisions carry none, so
/// the whole group is absent together rather than field by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeParameters(pub Option<TradeLevels>);

impl TradeParameters {
    pub fn none() -> Self {
        Self(None)
    }

    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    pub fn levels(&self) -> Option<&TradeLevels> {
        self.0.as_ref()
    }

    pub fn entry_price(&self) -> Option<Decimal> {
        self.0.map(|l| l.entry_price)
    }

    pub fn stop_loss(&self) -> Option<Decimal> {
        self.0.map(|l| l.stop_loss)
    }

    pub fn take_profit(&self) -> Option<Decimal> {
        self.0.map(|l| l.take_profit)
    }

    pub fn potential_gain_percent(&self) -> Option<Decimal> {
        self.0.map(|l| l.potential_gain_percent)
    }

    pub fn risk_reward_ratio(&self) -> Option<Decimal> {
        self.0.map(|l| l.risk_reward_ratio)
    }
}

impl From<TradeLevels> for TradeParameters {
    fn from(levels: TradeLevels) -> Self {
        Self(Some(levels))
    }
}
