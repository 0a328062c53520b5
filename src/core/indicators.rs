use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

use crate::models::IndicatorSignal;

/// Scores one indicator at the current price.
///
/// Returns `None` for identities the source does not know; the aggregator
/// substitutes [`IndicatorSignal::neutral`] so one unknown indicator never
/// aborts an evaluation.
pub trait IndicatorSource: Send + Sync {
    fn signal(&self, indicator_id: &str, price: Decimal) -> Option<IndicatorSignal>;
}

#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub signal: IndicatorSignal,
}

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        id: "rsi",
        name: "RSI",
        description: "Relative Strength Index, momentum oscillator on a 0-100 scale",
        signal: IndicatorSignal::new(dec!(0.8), dec!(0.1), dec!(0.1)),
    },
    CatalogEntry {
        id: "macd",
        name: "MACD",
        description: "Moving Average Convergence Divergence, trend-following momentum",
        signal: IndicatorSignal::new(dec!(0.2), dec!(0.7), dec!(0.1)),
    },
    CatalogEntry {
        id: "ema",
        name: "EMA",
        description: "Exponential Moving Average, weighted toward recent closes",
        signal: IndicatorSignal::new(dec!(0.7), dec!(0.2), dec!(0.1)),
    },
    CatalogEntry {
        id: "sma",
        name: "SMA",
        description: "Simple Moving Average of recent closes",
        signal: IndicatorSignal::new(dec!(0.3), dec!(0.6), dec!(0.1)),
    },
    CatalogEntry {
        id: "bollinger_bands",
        name: "Bollinger Bands",
        description: "SMA with bands two standard deviations above and below",
        signal: IndicatorSignal::new(dec!(0.75), dec!(0.15), dec!(0.1)),
    },
    CatalogEntry {
        id: "ichimoku_cloud",
        name: "Ichimoku Cloud",
        description: "Support, resistance, trend direction and momentum in one view",
        signal: IndicatorSignal::new(dec!(0.6), dec!(0.3), dec!(0.1)),
    },
    CatalogEntry {
        id: "stochastic_oscillator",
        name: "Stochastic Oscillator",
        description: "Close relative to the recent range, overbought/oversold",
        signal: IndicatorSignal::new(dec!(0.2), dec!(0.7), dec!(0.1)),
    },
    CatalogEntry {
        id: "fibonacci_retracement",
        name: "Fibonacci Retracement",
        description: "Support and resistance at Fibonacci ratios of the last swing",
        signal: IndicatorSignal::new(dec!(0.65), dec!(0.25), dec!(0.1)),
    },
    CatalogEntry {
        id: "atr",
        name: "ATR",
        description: "Average True Range, volatility without direction",
        signal: IndicatorSignal::new(dec!(0.3), dec!(0.3), dec!(0.4)),
    },
    CatalogEntry {
        id: "moving_average",
        name: "Moving Average",
        description: "Generic moving average, price near the mean",
        signal: IndicatorSignal::new(dec!(0.3), dec!(0.3), dec!(0.4)),
    },
];

/// Lowercase, with spaces and hyphens folded to underscores.
pub fn normalize_id(indicator_id: &str) -> String {
    indicator_id
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Fixed-score source over the built-in indicator catalog.
///
/// Stands in for real indicator math: scores do not depend on price.
pub struct CatalogIndicatorSource {
    entries: HashMap<String, CatalogEntry>,
}

impl CatalogIndicatorSource {
    pub fn new() -> Self {
        let entries = CATALOG
            .iter()
            .map(|e| (e.id.to_string(), e.clone()))
            .collect();
        Self { entries }
    }

    /// Add or replace an entry, keyed by its normalised id.
    pub fn with_entry(mut self, entry: CatalogEntry) -> Self {
        self.entries.insert(normalize_id(entry.id), entry);
        self
    }

    pub fn entry(&self, indicator_id: &str) -> Option<&CatalogEntry> {
        self.entries.get(&normalize_id(indicator_id))
    }

    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }
}

impl Default for CatalogIndicatorSource {
    fn default() -> Self {
        Self::new()
    }
}

impl IndicatorSource for CatalogIndicatorSource {
    fn signal(&self, indicator_id: &str, _price: Decimal) -> Option<IndicatorSignal> {
        self.entry(indicator_id).map(|e| e.signal)
    }
}
