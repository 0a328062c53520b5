pub mod aggregator;
pub mod fallback;
pub mod indicators;
pub mod trade_params;

pub use aggregator::{VoteTotals, WeightAggregator};
pub use fallback::FallbackStrategy;
pub use indicators::{CatalogEntry, CatalogIndicatorSource, IndicatorSource};
pub use trade_params::TradeParameterCalculator;
