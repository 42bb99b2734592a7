// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! Chronological time series of financial records for trend analysis.

use serde::Serialize;

use crate::models::FinancialRecord;
use crate::normalizer::MetricKind;
use crate::period::compare_periods;

/// Ordered records of one company, oldest first. Never empty.
#[derive(Debug, Clone, Serialize)]
pub struct TimeSeries {
    records: Vec<FinancialRecord>,
    is_fallback: bool,
}

/// One x-axis point of the four-metric trend chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub name: String,
    pub liquidity: f64,
    pub stability: f64,
    pub profitability: f64,
    pub activity: f64,
}

impl TimeSeries {
    pub fn records(&self) -> &[FinancialRecord] {
        &self.records
    }

    pub fn latest(&self) -> &FinancialRecord {
        // build_series never yields an empty series
        &self.records[self.records.len() - 1]
    }

    pub fn is_fallback(&self) -> bool {
        self.is_fallback
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn chart_points(&self) -> Vec<ChartPoint> {
        self.records
            .iter()
            .map(|record| ChartPoint {
                name: record.period.short_label(),
                liquidity: round1(record.metric(MetricKind::Liquidity)),
                stability: round1(record.metric(MetricKind::Stability)),
                profitability: round1(record.metric(MetricKind::Profitability)),
                activity: round1(record.metric(MetricKind::Activity)),
            })
            .collect()
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Sort records chronologically. An empty input is replaced by
/// [`fallback_records`] so downstream scoring always has data.
pub fn build_series(records: Vec<FinancialRecord>) -> TimeSeries {
    let (mut records, is_fallback) = if records.is_empty() {
        (fallback_records(), true)
    } else {
        (records, false)
    };
    records.sort_by(|a, b| compare_periods(&a.period, &b.period));
    TimeSeries {
        records,
        is_fallback,
    }
}

/// Illustrative series used when no real records exist
pub fn fallback_records() -> Vec<FinancialRecord> {
    const ROWS: [(&str, f64, f64, f64, f64, f64); 6] = [
        // period, roe, current, debt, coverage, z
        ("2020-1Q", 5.0, 100.0, 150.0, 2.0, 1.2),
        ("2021-1Q", 8.0, 110.0, 140.0, 3.0, 1.5),
        ("2022-1Q", 12.0, 130.0, 100.0, 5.0, 2.0),
        ("2023-1Q", 10.0, 125.0, 110.0, 4.0, 1.8),
        ("2024-1Q", 15.0, 150.0, 80.0, 8.0, 3.0),
        ("2025-2Q", 18.0, 200.0, 50.0, 10.0, 3.5),
    ];

    ROWS.iter()
        .map(|&(period, roe, current, debt, coverage, z)| FinancialRecord {
            roe: Some(roe),
            current_ratio: Some(current),
            debt_to_equity_ratio: Some(debt),
            interest_coverage_ratio: Some(coverage),
            altman_z_score: Some(z),
            ..FinancialRecord::empty("", period)
        })
        .collect()
}
