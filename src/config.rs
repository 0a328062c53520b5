use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::models::{SignalFilter, MAX_WEIGHT, MIN_WEIGHT};

/// Hard ceiling on indicators per (user, pair); configuration may only lower it.
pub const MAX_INDICATORS_PER_PAIR: usize = 5;

/// Offsets used to turn a decision into entry, stop and target prices.
/// All values are fractions, e.g. `0.001` = 0.1%.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelConfig {
    pub buy_entry_factor: Decimal,
    pub sell_entry_factor: Decimal,
    pub stop_loss_base: Decimal,
    pub stop_loss_confidence_step: Decimal,
    pub take_profit_base: Decimal,
    pub take_profit_confidence_step: Decimal,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            buy_entry_factor: dec!(1.001),
            sell_entry_factor: dec!(0.999),
            stop_loss_base: dec!(0.05),
            stop_loss_confidence_step: dec!(0.03),
            take_profit_base: dec!(0.05),
            take_profit_confidence_step: dec!(0.10),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    /// Confidence of the very first signal for a pair.
    pub initial_confidence: Decimal,
    /// Confidence of every alternated signal after that.
    pub alternate_confidence: Decimal,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            initial_confidence: dec!(0.75),
            alternate_confidence: dec!(0.70),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Weight configuration limits
    pub max_indicators_per_pair: usize,
    pub max_total_weight: u32,

    // Trade levels
    pub levels: LevelConfig,

    // No-configuration strategy
    pub fallback: FallbackConfig,

    // Batch run
    pub signals_file: String,
    pub dry_run: bool,
    pub filter: SignalFilter,

    // Reports
    pub report_hours: u32,

    // Logging
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_indicators_per_pair: MAX_INDICATORS_PER_PAIR,
            max_total_weight: MAX_WEIGHT,
            levels: LevelConfig::default(),
            fallback: FallbackConfig::default(),
            signals_file: "signals.json".to_string(),
            dry_run: false,
            filter: SignalFilter::default(),
            report_hours: 1,
            log_level: "INFO".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Values that fail to parse or fall outside
    /// their allowed range keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let env = |key: &str, default: &str| -> String {
            lookup(key).unwrap_or_else(|| default.to_string())
        };
        let dec_env = |key: &str, default: Decimal| -> Decimal {
            env(key, &default.to_string()).parse().unwrap_or(default)
        };
        let unit_env = |key: &str, default: Decimal| -> Decimal {
            let v = dec_env(key, default);
            if v >= Decimal::ZERO && v <= Decimal::ONE {
                v
            } else {
                default
            }
        };
        let opt_env = |key: &str| -> Option<String> {
            lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
        };

        let defaults = Config::default();
        let levels = LevelConfig {
            buy_entry_factor: dec_env("BUY_ENTRY_FACTOR", defaults.levels.buy_entry_factor),
            sell_entry_factor: dec_env("SELL_ENTRY_FACTOR", defaults.levels.sell_entry_factor),
            stop_loss_base: dec_env("STOP_LOSS_BASE", defaults.levels.stop_loss_base),
            stop_loss_confidence_step: dec_env(
                "STOP_LOSS_CONFIDENCE_STEP",
                defaults.levels.stop_loss_confidence_step,
            ),
            take_profit_base: dec_env("TAKE_PROFIT_BASE", defaults.levels.take_profit_base),
            take_profit_confidence_step: dec_env(
                "TAKE_PROFIT_CONFIDENCE_STEP",
                defaults.levels.take_profit_confidence_step,
            ),
        };
        let fallback = FallbackConfig {
            initial_confidence: unit_env(
                "FALLBACK_INITIAL_CONFIDENCE",
                defaults.fallback.initial_confidence,
            ),
            alternate_confidence: unit_env(
                "FALLBACK_ALTERNATE_CONFIDENCE",
                defaults.fallback.alternate_confidence,
            ),
        };

        // Limits may only tighten the 5-indicator / 100-weight invariants.
        let max_indicators_per_pair = env("MAX_INDICATORS_PER_PAIR", "5")
            .parse()
            .ok()
            .filter(|n| (1..=MAX_INDICATORS_PER_PAIR).contains(n))
            .unwrap_or(defaults.max_indicators_per_pair);
        let max_total_weight = env("MAX_TOTAL_WEIGHT", "100")
            .parse()
            .ok()
            .filter(|w| (MIN_WEIGHT..=MAX_WEIGHT).contains(w))
            .unwrap_or(defaults.max_total_weight);

        Config {
            max_indicators_per_pair,
            max_total_weight,
            levels,
            fallback,
            signals_file: env("SIGNALS_FILE", &defaults.signals_file),
            dry_run: env("DRY_RUN", "false").to_lowercase() == "true",
            filter: SignalFilter {
                pair: opt_env("SIGNAL_PAIR"),
                user: opt_env("SIGNAL_USER"),
            },
            report_hours: env("REPORT_HOURS_AGO", "1")
                .parse()
                .ok()
                .filter(|h| *h > 0)
                .unwrap_or(defaults.report_hours),
            log_level: env("LOG_LEVEL", &defaults.log_level),
        }
    }
}
