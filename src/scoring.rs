// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! Weighted composite risk score and its display bands.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::FinancialRecord;
use crate::normalizer::{normalize_opt, MetricKind};

pub const DEFAULT_WEIGHT: u32 = 25;
pub const MAX_WEIGHT: u32 = 100;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum WeightError {
    #[error("weight for {kind} must be between 0 and 100, got {value}")]
    OutOfRange { kind: MetricKind, value: u32 },
}

/// User-adjustable weights, one per metric. The sum is unconstrained.
///
/// Every value stays within `0..=MAX_WEIGHT`; deserialization goes through
/// [`WeightSet::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WeightFields")]
pub struct WeightSet {
    liquidity: u32,
    stability: u32,
    profitability: u32,
    activity: u32,
}

fn default_weight() -> u32 {
    DEFAULT_WEIGHT
}

#[derive(Deserialize)]
struct WeightFields {
    #[serde(default = "default_weight")]
    liquidity: u32,
    #[serde(default = "default_weight")]
    stability: u32,
    #[serde(default = "default_weight")]
    profitability: u32,
    #[serde(default = "default_weight")]
    activity: u32,
}

impl TryFrom<WeightFields> for WeightSet {
    type Error = WeightError;

    fn try_from(fields: WeightFields) -> Result<Self, Self::Error> {
        WeightSet::new(
            fields.liquidity,
            fields.stability,
            fields.profitability,
            fields.activity,
        )
    }
}

impl Default for WeightSet {
    fn default() -> Self {
        Self {
            liquidity: DEFAULT_WEIGHT,
            stability: DEFAULT_WEIGHT,
            profitability: DEFAULT_WEIGHT,
            activity: DEFAULT_WEIGHT,
        }
    }
}

impl WeightSet {
    pub fn new(
        liquidity: u32,
        stability: u32,
        profitability: u32,
        activity: u32,
    ) -> Result<Self, WeightError> {
        let mut weights = Self::default();
        weights.set(MetricKind::Liquidity, liquidity)?;
        weights.set(MetricKind::Stability, stability)?;
        weights.set(MetricKind::Profitability, profitability)?;
        weights.set(MetricKind::Activity, activity)?;
        Ok(weights)
    }

    pub fn liquidity(&self) -> u32 {
        self.liquidity
    }

    pub fn stability(&self) -> u32 {
        self.stability
    }

    pub fn profitability(&self) -> u32 {
        self.profitability
    }

    pub fn activity(&self) -> u32 {
        self.activity
    }

    pub fn get(&self, kind: MetricKind) -> u32 {
        match kind {
            MetricKind::Liquidity => self.liquidity,
            MetricKind::Stability => self.stability,
            MetricKind::Profitability => self.profitability,
            MetricKind::Activity => self.activity,
        }
    }

    pub fn set(&mut self, kind: MetricKind, value: u32) -> Result<(), WeightError> {
        if value > MAX_WEIGHT {
            return Err(WeightError::OutOfRange { kind, value });
        }
        let slot = match kind {
            MetricKind::Liquidity => &mut self.liquidity,
            MetricKind::Stability => &mut self.stability,
            MetricKind::Profitability => &mut self.profitability,
            MetricKind::Activity => &mut self.activity,
        };
        *slot = value;
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn total(&self) -> u32 {
        MetricKind::ALL
            .iter()
            .fold(0u32, |sum, &kind| sum.saturating_add(self.get(kind)))
    }
}

/// The four normalized sub-scores, each in `[0, 100]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSubScores {
    pub liquidity: f64,
    pub stability: f64,
    pub profitability: f64,
    pub activity: f64,
}

impl NormalizedSubScores {
    pub fn from_record(record: &FinancialRecord) -> Self {
        Self {
            liquidity: normalize_opt(MetricKind::Liquidity, record.current_ratio),
            stability: normalize_opt(MetricKind::Stability, record.debt_to_equity_ratio),
            profitability: normalize_opt(MetricKind::Profitability, record.roe),
            activity: normalize_opt(MetricKind::Activity, record.interest_coverage_ratio),
        }
    }

    pub fn get(&self, kind: MetricKind) -> f64 {
        match kind {
            MetricKind::Liquidity => self.liquidity,
            MetricKind::Stability => self.stability,
            MetricKind::Profitability => self.profitability,
            MetricKind::Activity => self.activity,
        }
    }
}

/// `round(sum(sub_i * w_i) / 100)`. Weights summing above 100 can push the
/// result past 100; that is accepted, not an error.
pub fn composite_score(sub_scores: &NormalizedSubScores, weights: &WeightSet) -> u32 {
    let weighted: f64 = MetricKind::ALL
        .iter()
        .map(|&kind| sub_scores.get(kind) * f64::from(weights.get(kind)))
        .sum();
    (weighted / 100.0).round() as u32
}

/// Score banding used for colouring the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    Risk,
    Caution,
    Safe,
}

impl RiskBand {
    pub fn color(&self) -> &'static str {
        match self {
            RiskBand::Risk => "#ff0000",
            RiskBand::Caution => "#ffc107",
            RiskBand::Safe => "#00cc66",
        }
    }
}

/// `< 50` risk, `< 70` caution, otherwise safe.
pub fn color_band(score: u32) -> RiskBand {
    if score < 50 {
        RiskBand::Risk
    } else if score < 70 {
        RiskBand::Caution
    } else {
        RiskBand::Safe
    }
}

/// Score banding used for the narrative verdict sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    VerySafe,
    Caution,
    Risk,
}

impl Verdict {
    pub fn message(&self) -> &'static str {
        match self {
            Verdict::VerySafe => "Financially very safe.",
            Verdict::Caution => "Needs attention.",
            Verdict::Risk => "At a risky level.",
        }
    }
}

/// `>= 80` very safe, `>= 50` caution, otherwise risk.
pub fn narrative_verdict(score: u32) -> Verdict {
    if score >= 80 {
        Verdict::VerySafe
    } else if score >= 50 {
        Verdict::Caution
    } else {
        Verdict::Risk
    }
}
