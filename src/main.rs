use anyhow::Result;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use signal_engine::config::Config;
use signal_engine::core::CatalogIndicatorSource;
use signal_engine::scenario::Scenario;
use signal_engine::store::{InMemoryStore, SignalStore};
use signal_engine::trading::{SignalDecisionEngine, SignalReport};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    // Optional first argument overrides SIGNALS_FILE
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| cfg.signals_file.clone());

    let scenario = Scenario::load(&path)?;
    let store = Arc::new(InMemoryStore::new(&cfg));
    scenario.seed(store.as_ref()).await?;

    let engine = SignalDecisionEngine::new(
        &cfg,
        store.clone(),
        store.clone(),
        Arc::new(CatalogIndicatorSource::new()),
    );

    info!("{}", "=".repeat(60));
    info!(
        "Signal run: {} pair(s), {} user(s){}",
        scenario.pairs.len(),
        scenario.users.len(),
        if cfg.dry_run { " [DRY RUN]" } else { "" }
    );
    if let Some(pair) = &cfg.filter.pair {
        info!("Pair filter: {}", pair);
    }
    if let Some(user) = &cfg.filter.user {
        info!("User filter: {}", user);
    }
    info!("{}", "=".repeat(60));

    let mut generated = 0;
    for (key, price) in scenario.evaluations(store.as_ref(), &cfg.filter).await? {
        if cfg.dry_run {
            match engine.preview_signal(&key, price).await {
                Ok(s) => info!(
                    "[DRY RUN] Would generate {} for {} (confidence {:.2}%)",
                    s.decision,
                    key,
                    s.confidence_percent()
                ),
                Err(e) => error!("Error previewing signal for {}: {}", key, e),
            }
            continue;
        }

        match engine.generate_signal(&key, price).await {
            Ok(_) => generated += 1,
            Err(e) => error!("Error generating signal for {}: {}", key, e),
        }
    }
    info!("Signal generation complete. Generated {} signal(s).", generated);

    if generated > 0 {
        let now = Utc::now();
        let hours = cfg.report_hours;
        let signals: Vec<_> = store
            .signals_between(None, now - Duration::hours(i64::from(hours)), now)
            .await?
            .into_iter()
            .filter(|s| cfg.filter.matches(&s.key))
            .collect();

        info!("--- Signal Reports (last {}h) ---", hours);
        for r in SignalReport::per_key(&signals, hours, now) {
            log_report(&r);
        }
        if cfg.filter.user.is_none() {
            info!("--- Pair Reports (last {}h) ---", hours);
            for r in SignalReport::per_pair(&signals, hours, now) {
                log_report(&r);
            }
        }
    }

    Ok(())
}

fn log_report(r: &SignalReport) {
    info!(
        "{} ({} user(s)): BUY {} / SELL {} / HOLD {} | executed {}/{}",
        r.label(),
        r.user_count,
        r.buy_signals,
        r.sell_signals,
        r.hold_signals,
        r.executed_count,
        r.total_signals
    );
    info!(
        "    avg confidence {:.2}% | avg R:R {} | last price {}",
        r.avg_confidence,
        r.avg_risk_reward
            .map(|v| format!("{:.2}", v))
            .unwrap_or_else(|| "n/a".to_string()),
        r.price
    );
}
