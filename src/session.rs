// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! Session-scoped dashboard state.
//!
//! A session owns the company, its record series and the current weights.
//! Every derived value is recomputed from those inputs on each call to
//! [`DashboardSession::snapshot`]; nothing derived is cached.

use serde::Serialize;

use crate::models::{Company, FinancialRecord};
use crate::normalizer::MetricKind;
use crate::scoring::{
    color_band, composite_score, narrative_verdict, NormalizedSubScores, RiskBand, Verdict,
    WeightError, WeightSet,
};
use crate::series::{build_series, ChartPoint, TimeSeries};

#[derive(Debug, Clone)]
pub struct DashboardSession {
    company: Company,
    series: TimeSeries,
    weights: WeightSet,
}

/// Latest value of one metric as shown on its card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub kind: MetricKind,
    pub label: &'static str,
    pub value: f64,
    pub display: String,
    pub sub_score: f64,
    pub weight: u32,
    pub threshold: &'static str,
}

/// Everything the dashboard view renders
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub company: Company,
    pub period: String,
    pub is_fallback: bool,
    pub weights: WeightSet,
    pub sub_scores: NormalizedSubScores,
    pub score: u32,
    pub band: RiskBand,
    pub verdict: Verdict,
    pub verdict_message: &'static str,
    pub metrics: Vec<MetricCard>,
    pub chart: Vec<ChartPoint>,
}

/// Display string of a raw ratio: whole percent, or one decimal for ROE and coverage
pub fn format_metric(kind: MetricKind, value: f64) -> String {
    match kind {
        MetricKind::Liquidity | MetricKind::Stability => format!("{:.0}{}", value, kind.unit()),
        MetricKind::Profitability | MetricKind::Activity => {
            format!("{:.1}{}", value, kind.unit())
        }
    }
}

impl DashboardSession {
    pub fn new(company: Company, records: Vec<FinancialRecord>) -> Self {
        Self::from_series(company, build_series(records))
    }

    pub fn from_series(company: Company, series: TimeSeries) -> Self {
        Self {
            company,
            series,
            weights: WeightSet::default(),
        }
    }

    pub fn with_weights(mut self, weights: WeightSet) -> Self {
        self.weights = weights;
        self
    }

    pub fn company(&self) -> &Company {
        &self.company
    }

    pub fn series(&self) -> &TimeSeries {
        &self.series
    }

    pub fn latest(&self) -> &FinancialRecord {
        self.series.latest()
    }

    pub fn weights(&self) -> &WeightSet {
        &self.weights
    }

    pub fn set_weight(&mut self, kind: MetricKind, value: u32) -> Result<(), WeightError> {
        self.weights.set(kind, value)
    }

    pub fn reset_weights(&mut self) {
        self.weights.reset();
    }

    /// Swap in a freshly fetched record set; weights are kept
    pub fn replace_records(&mut self, records: Vec<FinancialRecord>) {
        self.series = build_series(records);
    }

    pub fn sub_scores(&self) -> NormalizedSubScores {
        NormalizedSubScores::from_record(self.latest())
    }

    pub fn score(&self) -> u32 {
        composite_score(&self.sub_scores(), &self.weights)
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let latest = self.latest();
        let sub_scores = NormalizedSubScores::from_record(latest);
        let score = composite_score(&sub_scores, &self.weights);
        let verdict = narrative_verdict(score);

        let metrics = MetricKind::ALL
            .iter()
            .map(|&kind| {
                let value = latest.metric(kind);
                MetricCard {
                    kind,
                    label: kind.ratio_name(),
                    value,
                    display: format_metric(kind, value),
                    sub_score: sub_scores.get(kind),
                    weight: self.weights.get(kind),
                    threshold: kind.threshold_text(),
                }
            })
            .collect();

        DashboardSnapshot {
            company: self.company.clone(),
            period: latest.period.label().to_string(),
            is_fallback: self.series.is_fallback(),
            weights: self.weights,
            sub_scores,
            score,
            band: color_band(score),
            verdict,
            verdict_message: verdict.message(),
            metrics,
            chart: self.series.chart_points(),
        }
    }
}
