// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! Company vs. peer-group comparison
//!
//! Each of the four ratios is compared against the peer average. A metric is
//! favorable only on a strict improvement in its better direction, so a tie
//! counts as unfavorable.

use serde::{Deserialize, Serialize};

use crate::models::FinancialRecord;
use crate::normalizer::{Direction, MetricKind};

pub const DEMO_LABEL: &str = "Demo industry";

/// Peer-group averages of the four ratios
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkAggregate {
    pub label: String,
    pub current_ratio: f64,
    pub debt_to_equity_ratio: f64,
    pub roe: f64,
    pub interest_coverage_ratio: f64,
    /// False when the figures are the demo fallback
    pub authoritative: bool,
}

impl BenchmarkAggregate {
    pub fn metric(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::Liquidity => self.current_ratio,
            MetricKind::Stability => self.debt_to_equity_ratio,
            MetricKind::Profitability => self.roe,
            MetricKind::Activity => self.interest_coverage_ratio,
        }
    }
}

/// Demo aggregate shown when the peer average cannot be loaded
pub fn fallback_aggregate(label: Option<&str>) -> BenchmarkAggregate {
    BenchmarkAggregate {
        label: label.unwrap_or(DEMO_LABEL).to_string(),
        current_ratio: 170.0,
        debt_to_equity_ratio: 100.0,
        roe: 12.0,
        interest_coverage_ratio: 7.0,
        authoritative: false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonVerdict {
    Favorable,
    Unfavorable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricComparison {
    pub kind: MetricKind,
    pub company: f64,
    pub peer: f64,
    pub delta: f64,
    pub verdict: ComparisonVerdict,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkComparison {
    pub label: String,
    pub authoritative: bool,
    pub metrics: Vec<MetricComparison>,
}

impl BenchmarkComparison {
    pub fn get(&self, kind: MetricKind) -> Option<&MetricComparison> {
        self.metrics.iter().find(|m| m.kind == kind)
    }

    pub fn favorable_count(&self) -> usize {
        self.metrics
            .iter()
            .filter(|m| m.verdict == ComparisonVerdict::Favorable)
            .count()
    }
}

pub fn compare_metric(kind: MetricKind, company: f64, peer: f64) -> MetricComparison {
    let better = match kind.direction() {
        Direction::HigherIsBetter => company > peer,
        Direction::LowerIsBetter => company < peer,
    };
    MetricComparison {
        kind,
        company,
        peer,
        delta: company - peer,
        verdict: if better {
            ComparisonVerdict::Favorable
        } else {
            ComparisonVerdict::Unfavorable
        },
    }
}

/// Compare a company's record against a peer aggregate, absent ratios read as 0
pub fn compare(company: &FinancialRecord, peer: &BenchmarkAggregate) -> BenchmarkComparison {
    BenchmarkComparison {
        label: peer.label.clone(),
        authoritative: peer.authoritative,
        metrics: MetricKind::ALL
            .iter()
            .map(|&kind| compare_metric(kind, company.metric(kind), peer.metric(kind)))
            .collect(),
    }
}

/// One sentence per metric summarising the comparison
pub fn narrative(comparison: &BenchmarkComparison) -> Vec<String> {
    comparison
        .metrics
        .iter()
        .map(|m| {
            let good = m.verdict == ComparisonVerdict::Favorable;
            match m.kind {
                MetricKind::Liquidity => format!(
                    "Liquidity: {:.0}% against a peer average of {:.0}%, {}. Short-term funding is {}.",
                    m.company,
                    m.peer,
                    if good { "clearly stronger" } else { "on the low side" },
                    if good { "comfortable" } else { "worth watching" },
                ),
                MetricKind::Stability => format!(
                    "Stability: the debt ratio is {} than the peer average of {:.0}%, {}.",
                    if good { "lower" } else { "higher" },
                    m.peer,
                    if good { "a very sound structure" } else { "leverage needs managing" },
                ),
                MetricKind::Profitability => format!(
                    "Profitability: ROE is {} than the peer average of {:.1}%, management efficiency {}.",
                    if good { "higher" } else { "lower" },
                    m.peer,
                    if good { "is strong" } else { "needs improvement" },
                ),
                MetricKind::Activity => format!(
                    "Activity: interest coverage is {} than the peer average of {:.1}x, {}.",
                    if good { "higher" } else { "lower" },
                    m.peer,
                    if good { "operations look healthy" } else { "a warning sign for operations" },
                ),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn company() -> FinancialRecord {
        FinancialRecord {
            current_ratio: Some(180.0),
            debt_to_equity_ratio: Some(60.0),
            roe: Some(14.0),
            interest_coverage_ratio: Some(9.0),
            ..FinancialRecord::empty("005930", "2023-4Q")
        }
    }

    #[test]
    fn test_compare_against_demo_aggregate() {
        let result = compare(&company(), &fallback_aggregate(None));

        let liquidity = result.get(MetricKind::Liquidity).unwrap();
        assert_relative_eq!(liquidity.delta, 10.0);
        assert_eq!(liquidity.verdict, ComparisonVerdict::Favorable);

        let stability = result.get(MetricKind::Stability).unwrap();
        assert_relative_eq!(stability.delta, -40.0);
        assert_eq!(stability.verdict, ComparisonVerdict::Favorable);

        assert_eq!(result.favorable_count(), 4);
        assert_eq!(result.label, DEMO_LABEL);
        assert!(!result.authoritative);
    }

    #[test]
    fn test_ties_are_unfavorable() {
        for kind in MetricKind::ALL {
            assert_eq!(
                compare_metric(kind, 100.0, 100.0).verdict,
                ComparisonVerdict::Unfavorable
            );
        }
    }

    #[test]
    fn test_higher_debt_is_unfavorable() {
        let result = compare_metric(MetricKind::Stability, 140.0, 100.0);
        assert_eq!(result.verdict, ComparisonVerdict::Unfavorable);
        assert_relative_eq!(result.delta, 40.0);
    }

    #[test]
    fn test_missing_company_ratio_compares_as_zero() {
        let record = FinancialRecord::empty("000000", "2023-4Q");
        let result = compare(&record, &fallback_aggregate(Some("Chemicals")));
        assert_eq!(result.label, "Chemicals");
        assert_eq!(
            result.get(MetricKind::Stability).unwrap().verdict,
            ComparisonVerdict::Favorable
        );
        assert_eq!(result.favorable_count(), 1);
    }

    #[test]
    fn test_narrative_has_one_line_per_metric() {
        let lines = narrative(&compare(&company(), &fallback_aggregate(None)));
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Liquidity: 180% against a peer average of 170%"));
        assert!(lines[1].contains("lower than the peer average of 100%"));
    }
}
