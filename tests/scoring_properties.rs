// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! Property tests for normalization, scoring and period ordering

use proptest::prelude::*;
use riskscore_rs::benchmark::{compare_metric, ComparisonVerdict};
use riskscore_rs::normalizer::{normalize, MetricKind};
use riskscore_rs::period::{compare_periods, Period};
use riskscore_rs::scoring::{color_band, composite_score, NormalizedSubScores, WeightSet};
use riskscore_rs::series::build_series;
use riskscore_rs::models::FinancialRecord;
use std::cmp::Ordering;

fn metric_kind() -> impl Strategy<Value = MetricKind> {
    prop::sample::select(MetricKind::ALL.to_vec())
}

fn sub_scores() -> impl Strategy<Value = NormalizedSubScores> {
    (0.0..=100.0f64, 0.0..=100.0f64, 0.0..=100.0f64, 0.0..=100.0f64).prop_map(
        |(liquidity, stability, profitability, activity)| NormalizedSubScores {
            liquidity,
            stability,
            profitability,
            activity,
        },
    )
}

fn weights() -> impl Strategy<Value = WeightSet> {
    (0..=100u32, 0..=100u32, 0..=100u32, 0..=100u32)
        .prop_map(|(l, s, p, a)| WeightSet::new(l, s, p, a).unwrap())
}

fn period_label() -> impl Strategy<Value = String> {
    let tag = prop::sample::select(vec!["1Q", "2Q", "Semi", "3Q", "4Q", "Annual", "XX"]);
    let sep = prop::sample::select(vec!["-", "/"]);
    (2015..2026i32, sep, tag).prop_map(|(year, sep, tag)| format!("{}{}{}", year, sep, tag))
}

proptest! {
    #[test]
    fn normalize_stays_in_bounds(kind in metric_kind(), raw in prop::num::f64::ANY) {
        let score = normalize(kind, raw);
        prop_assert!((0.0..=100.0).contains(&score));
    }

    #[test]
    fn normalize_respects_direction(kind in metric_kind(), a in -1000.0..1000.0f64, b in -1000.0..1000.0f64) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        match kind {
            MetricKind::Stability => prop_assert!(normalize(kind, lo) >= normalize(kind, hi)),
            _ => prop_assert!(normalize(kind, lo) <= normalize(kind, hi)),
        }
    }

    #[test]
    fn composite_is_deterministic(sub in sub_scores(), w in weights()) {
        prop_assert_eq!(composite_score(&sub, &w), composite_score(&sub, &w));
    }

    #[test]
    fn composite_is_monotonic_in_each_sub_score(
        sub in sub_scores(),
        w in weights(),
        kind in metric_kind(),
        bump in 0.0..=100.0f64,
    ) {
        let mut better = sub;
        match kind {
            MetricKind::Liquidity => better.liquidity = (sub.liquidity + bump).min(100.0),
            MetricKind::Stability => better.stability = (sub.stability + bump).min(100.0),
            MetricKind::Profitability => better.profitability = (sub.profitability + bump).min(100.0),
            MetricKind::Activity => better.activity = (sub.activity + bump).min(100.0),
        }
        prop_assert!(composite_score(&better, &w) >= composite_score(&sub, &w));
    }

    #[test]
    fn default_weights_keep_score_within_range(sub in sub_scores()) {
        let score = composite_score(&sub, &WeightSet::default());
        prop_assert!(score <= 100);
        // every score maps to exactly one band
        let _ = color_band(score);
    }

    #[test]
    fn period_comparison_is_antisymmetric(a in period_label(), b in period_label()) {
        let (pa, pb) = (Period::parse(&a), Period::parse(&b));
        prop_assert_eq!(compare_periods(&pa, &pb), compare_periods(&pb, &pa).reverse());
    }

    #[test]
    fn series_is_sorted_and_complete(labels in prop::collection::vec(period_label(), 1..12)) {
        let records: Vec<FinancialRecord> = labels
            .iter()
            .map(|label| FinancialRecord::empty("A000001", label))
            .collect();
        let series = build_series(records);

        prop_assert_eq!(series.len(), labels.len());
        prop_assert!(!series.is_fallback());
        for pair in series.records().windows(2) {
            prop_assert_ne!(compare_periods(&pair[0].period, &pair[1].period), Ordering::Greater);
        }
    }

    #[test]
    fn ties_are_never_favorable(kind in metric_kind(), value in -500.0..500.0f64) {
        prop_assert_eq!(compare_metric(kind, value, value).verdict, ComparisonVerdict::Unfavorable);
    }
}
