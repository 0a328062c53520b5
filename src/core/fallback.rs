use crate::config::FallbackConfig;
use crate::models::{CompositeDecision, Decision};

/// Decision source for pairs with no active weighted indicators.
///
/// Alternates against the previous decision with a fixed confidence so a
/// pair always gets some signal. It carries no trading rationale and is a
/// placeholder until product defines a real default.
pub struct FallbackStrategy {
    cfg: FallbackConfig,
}

impl FallbackStrategy {
    pub fn new(cfg: FallbackConfig) -> Self {
        Self { cfg }
    }

    pub fn decide(&self, previous: Option<Decision>) -> CompositeDecision {
        match previous {
            None => CompositeDecision::new(Decision::Buy, self.cfg.initial_confidence),
            Some(prev) => CompositeDecision::new(prev.alternate(), self.cfg.alternate_confidence),
        }
    }
}

impl Default for FallbackStrategy {
    fn default() -> Self {
        Self::new(FallbackConfig::default())
    }
}
