pub mod decision;
pub mod indicator;
pub mod signal;
pub mod trade;

pub use decision::{CompositeDecision, Decision};
pub use indicator::{IndicatorSignal, IndicatorWeight, MAX_WEIGHT, MIN_WEIGHT};
pub use signal::{PairKey, SignalFilter, SignalRecord};
pub use trade::{TradeLevels, TradeParameters};
