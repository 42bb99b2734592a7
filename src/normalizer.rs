// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! Maps raw financial ratios onto comparable 0-100 sub-scores.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four risk dimensions and the ratio backing each one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Current ratio (%)
    Liquidity,
    /// Debt-to-equity ratio (%)
    Stability,
    /// Return on equity (%)
    Profitability,
    /// Interest coverage (x)
    Activity,
}

/// Which way a raw ratio has to move to be an improvement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        MetricKind::Liquidity,
        MetricKind::Stability,
        MetricKind::Profitability,
        MetricKind::Activity,
    ];

    pub fn direction(&self) -> Direction {
        match self {
            MetricKind::Stability => Direction::LowerIsBetter,
            _ => Direction::HigherIsBetter,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MetricKind::Liquidity => "liquidity",
            MetricKind::Stability => "stability",
            MetricKind::Profitability => "profitability",
            MetricKind::Activity => "activity",
        }
    }

    pub fn ratio_name(&self) -> &'static str {
        match self {
            MetricKind::Liquidity => "Current ratio",
            MetricKind::Stability => "Debt-to-equity ratio",
            MetricKind::Profitability => "Return on equity",
            MetricKind::Activity => "Interest coverage ratio",
        }
    }

    /// Display unit of the raw ratio
    pub fn unit(&self) -> &'static str {
        match self {
            MetricKind::Activity => "x",
            _ => "%",
        }
    }

    /// Evaluation threshold shown next to the raw value
    pub fn threshold_text(&self) -> &'static str {
        match self {
            MetricKind::Liquidity => "200% or more is excellent; higher is safer",
            MetricKind::Stability => "100% or less is ideal; lower is sounder",
            MetricKind::Profitability => "15% or more, or above the industry average, is excellent",
            MetricKind::Activity => "1.5x or more is stable; 3x or more is very sound",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Normalize a raw ratio to a sub-score in `[0, 100]`.
///
/// Non-finite input scores as if the ratio were 0.
pub fn normalize(kind: MetricKind, raw: f64) -> f64 {
    let raw = if raw.is_finite() { raw } else { 0.0 };
    let score = match kind {
        MetricKind::Liquidity => (raw / 200.0 * 100.0).min(100.0),
        MetricKind::Stability => (100.0 - (raw - 100.0).max(0.0) / 3.0).max(0.0),
        MetricKind::Profitability => (raw * 5.0).min(100.0),
        MetricKind::Activity => (raw * 10.0).min(100.0),
    };
    score.clamp(0.0, 100.0)
}

/// Normalize an optional ratio; absent values count as 0.
pub fn normalize_opt(kind: MetricKind, raw: Option<f64>) -> f64 {
    normalize(kind, raw.unwrap_or(0.0))
}
