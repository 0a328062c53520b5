use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{Decision, PairKey, SignalRecord};

/// Summary of the signals generated over a period, either for one
/// (user, pair) or for a pair across all users (`user` is `None`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalReport {
    pub pair: String,
    pub user: Option<String>,
    /// Distinct users contributing signals.
    pub user_count: usize,
    pub timestamp: DateTime<Utc>,
    pub price: Decimal,

    // Counts
    pub buy_signals: usize,
    pub sell_signals: usize,
    pub hold_signals: usize,
    pub executed_count: usize,
    pub total_signals: usize,

    // Averages
    /// Mean confidence on the 0-100 scale.
    pub avg_confidence: Decimal,
    /// Mean risk/reward of BUY and SELL signals, `None` without any.
    pub avg_risk_reward: Option<Decimal>,

    pub report_period_hours: u32,
}

impl SignalReport {
    /// Build a report from one key's signals. Returns `None` for an empty slice.
    pub fn from_signals(
        key: &PairKey,
        signals: &[SignalRecord],
        report_period_hours: u32,
        timestamp: DateTime<Utc>,
    ) -> Option<Self> {
        Self::build(
            &key.pair,
            Some(&key.user),
            signals,
            report_period_hours,
            timestamp,
        )
    }

    fn build(
        pair: &str,
        user: Option<&str>,
        signals: &[SignalRecord],
        report_period_hours: u32,
        timestamp: DateTime<Utc>,
    ) -> Option<Self> {
        let latest = signals.iter().max_by_key(|s| (s.timestamp, s.id))?;

        let count = |d: Decision| signals.iter().filter(|s| s.decision == d).count();
        let total = signals.len();

        let confidence_sum: Decimal = signals.iter().map(|s| s.confidence_percent()).sum();
        let avg_confidence = confidence_sum / Decimal::from(total);

        let ratios: Vec<Decimal> = signals
            .iter()
            .filter(|s| s.decision.is_trade())
            .filter_map(|s| s.params.risk_reward_ratio())
            .collect();
        let avg_risk_reward = if ratios.is_empty() {
            None
        } else {
            Some(ratios.iter().copied().sum::<Decimal>() / Decimal::from(ratios.len()))
        };

        let users: BTreeSet<&str> = signals.iter().map(|s| s.key.user.as_str()).collect();

        Some(Self {
            pair: pair.to_string(),
            user: user.map(str::to_string),
            user_count: users.len(),
            timestamp,
            price: latest.price,
            buy_signals: count(Decision::Buy),
            sell_signals: count(Decision::Sell),
            hold_signals: count(Decision::Hold),
            executed_count: signals.iter().filter(|s| s.is_executed).count(),
            total_signals: total,
            avg_confidence,
            avg_risk_reward,
            report_period_hours,
        })
    }

    /// One report per key present in `signals`, ordered by key.
    pub fn per_key(
        signals: &[SignalRecord],
        report_period_hours: u32,
        timestamp: DateTime<Utc>,
    ) -> Vec<Self> {
        let mut grouped: BTreeMap<&PairKey, Vec<SignalRecord>> = BTreeMap::new();
        for s in signals {
            grouped.entry(&s.key).or_default().push(s.clone());
        }

        grouped
            .into_iter()
            .filter_map(|(key, group)| {
                Self::from_signals(key, &group, report_period_hours, timestamp)
            })
            .collect()
    }

    /// One report per pair present in `signals`, aggregated across users.
    pub fn per_pair(
        signals: &[SignalRecord],
        report_period_hours: u32,
        timestamp: DateTime<Utc>,
    ) -> Vec<Self> {
        let mut grouped: BTreeMap<&str, Vec<SignalRecord>> = BTreeMap::new();
        for s in signals {
            grouped.entry(s.key.pair.as_str()).or_default().push(s.clone());
        }

        grouped
            .into_iter()
            .filter_map(|(pair, group)| {
                Self::build(pair, None, &group, report_period_hours, timestamp)
            })
            .collect()
    }

    /// `user/pair`, or just the pair for a cross-user report.
    pub fn label(&self) -> String {
        match &self.user {
            Some(user) => format!("{}/{}", user, self.pair),
            None => self.pair.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TradeParameterCalculator;
    use crate::models::{CompositeDecision, TradeParameters};
    use crate::test_helpers::btc_key;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn signal(
        key: &PairKey,
        decision: Decision,
        confidence: Decimal,
        price: Decimal,
        at: DateTime<Utc>,
    ) -> SignalRecord {
        let params = TradeParameterCalculator::default()
            .compute(price, decision, confidence)
            .unwrap();
        SignalRecord::new(
            key.clone(),
            price,
            CompositeDecision::new(decision, confidence),
            params,
            at,
        )
    }

    #[test]
    fn empty_input_has_no_report() {
        assert!(SignalReport::from_signals(&btc_key(), &[], 1, Utc::now()).is_none());
    }

    #[test]
    fn counts_and_averages() {
        let key = btc_key();
        let t0 = Utc::now();
        let t1 = t0 + Duration::minutes(1);
        let mut executed = signal(&key, Decision::Sell, dec!(0), dec!(100), t1);
        executed.is_executed = true;
        let signals = vec![
            signal(&key, Decision::Buy, dec!(1), dec!(100), t0),
            executed,
            signal(&key, Decision::Hold, dec!(0.4), dec!(105), t0 + Duration::minutes(2)),
        ];

        let r = SignalReport::from_signals(&key, &signals, 1, t0).unwrap();
        assert_eq!((r.buy_signals, r.sell_signals, r.hold_signals), (1, 1, 1));
        assert_eq!(r.total_signals, 3);
        assert_eq!(r.executed_count, 1);
        assert_eq!(r.price, dec!(105));
        // (100 + 0 + 40) / 3
        assert_eq!(r.avg_confidence.round_dp(2), dec!(46.67));
        // (7.5 + 1) / 2
        assert_eq!(r.avg_risk_reward, Some(dec!(4.25)));
    }

    #[test]
    fn hold_only_has_no_risk_reward() {
        let key = btc_key();
        let s = SignalRecord::new(
            key.clone(),
            dec!(10),
            CompositeDecision::new(Decision::Hold, dec!(0.5)),
            TradeParameters::none(),
            Utc::now(),
        );
        let r = SignalReport::from_signals(&key, &[s], 1, Utc::now()).unwrap();
        assert_eq!(r.avg_risk_reward, None);
        assert_eq!(r.avg_confidence, dec!(50));
    }

    #[test]
    fn groups_by_key() {
        let t0 = Utc::now();
        let eth = PairKey::new("alice", "ETH/USD");
        let signals = vec![
            signal(&btc_key(), Decision::Buy, dec!(0.5), dec!(100), t0),
            signal(&eth, Decision::Sell, dec!(0.5), dec!(10), t0),
            signal(&eth, Decision::Buy, dec!(0.5), dec!(11), t0 + Duration::minutes(1)),
        ];
        let reports = SignalReport::per_key(&signals, 2, t0);
        assert_eq!(reports.len(), 2);
        let eth_report = reports.iter().find(|r| r.pair == "ETH/USD").unwrap();
        assert_eq!(eth_report.user.as_deref(), Some("alice"));
        assert_eq!(eth_report.user_count, 1);
        assert_eq!(eth_report.total_signals, 2);
        assert_eq!(eth_report.price, dec!(11));
        assert_eq!(eth_report.report_period_hours, 2);
        assert_eq!(eth_report.label(), "alice/ETH/USD");
    }

    #[test]
    fn pair_report_spans_users() {
        let t0 = Utc::now();
        let bob = PairKey::new("bob", "BTC/USD");
        let eth = PairKey::new("alice", "ETH/USD");
        let signals = vec![
            signal(&btc_key(), Decision::Buy, dec!(0.6), dec!(100), t0),
            signal(&bob, Decision::Sell, dec!(0.2), dec!(101), t0 + Duration::minutes(1)),
            signal(&btc_key(), Decision::Hold, dec!(0.4), dec!(99), t0 - Duration::minutes(1)),
            signal(&eth, Decision::Buy, dec!(1), dec!(10), t0),
        ];

        let reports = SignalReport::per_pair(&signals, 24, t0);
        assert_eq!(reports.len(), 2);

        let btc = &reports[0];
        assert_eq!(btc.pair, "BTC/USD");
        assert_eq!(btc.user, None);
        assert_eq!(btc.user_count, 2);
        assert_eq!((btc.buy_signals, btc.sell_signals, btc.hold_signals), (1, 1, 1));
        assert_eq!(btc.total_signals, 3);
        // latest across users is bob's
        assert_eq!(btc.price, dec!(101));
        // (60 + 20 + 40) / 3
        assert_eq!(btc.avg_confidence, dec!(40));
        assert_eq!(btc.report_period_hours, 24);
        assert_eq!(btc.label(), "BTC/USD");

        assert_eq!(reports[1].pair, "ETH/USD");
        assert_eq!(reports[1].user_count, 1);
    }
}
