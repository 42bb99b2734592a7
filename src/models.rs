// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::normalizer::MetricKind;
use crate::period::Period;

/// One fiscal period's reported figures for one company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub stock_code: String,
    pub period: Period,
    pub current_ratio: Option<f64>,
    pub debt_to_equity_ratio: Option<f64>,
    pub roe: Option<f64>,
    pub interest_coverage_ratio: Option<f64>,
    pub roa: Option<f64>,
    pub altman_z_score: Option<f64>,
    pub piotroski_f_score: Option<f64>,
    pub total_assets: Option<f64>,
    pub total_liabilities: Option<f64>,
    pub total_equity: Option<f64>,
    pub operating_cash_flow: Option<f64>,
    pub revenue: Option<f64>,
}

impl FinancialRecord {
    /// A record with every figure absent
    pub fn empty(stock_code: &str, period: &str) -> Self {
        Self {
            stock_code: stock_code.to_string(),
            period: Period::parse(period),
            current_ratio: None,
            debt_to_equity_ratio: None,
            roe: None,
            interest_coverage_ratio: None,
            roa: None,
            altman_z_score: None,
            piotroski_f_score: None,
            total_assets: None,
            total_liabilities: None,
            total_equity: None,
            operating_cash_flow: None,
            revenue: None,
        }
    }

    /// Raw ratio behind a metric, absent values read as 0
    pub fn metric(&self, kind: MetricKind) -> f64 {
        self.metric_opt(kind).unwrap_or(0.0)
    }

    pub fn metric_opt(&self, kind: MetricKind) -> Option<f64> {
        match kind {
            MetricKind::Liquidity => self.current_ratio,
            MetricKind::Stability => self.debt_to_equity_ratio,
            MetricKind::Profitability => self.roe,
            MetricKind::Activity => self.interest_coverage_ratio,
        }
    }
}

/// Listed company metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    pub stock_code: String,
    pub company_name: String,
    pub industry: Option<String>,
    pub region: Option<String>,
    pub address: Option<String>,
    pub market_type: Option<String>,
    pub market_cap_recent: Option<f64>,
}

impl Company {
    /// Placeholder used when a company code is not in the database
    pub fn unknown(stock_code: &str) -> Self {
        Self {
            stock_code: stock_code.to_string(),
            company_name: stock_code.to_string(),
            industry: None,
            region: None,
            address: None,
            market_type: None,
            market_cap_recent: None,
        }
    }
}

/// Comparison group for benchmark aggregates
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum PeerGroup {
    Industry(String),
    Region(String),
}

impl PeerGroup {
    pub fn name(&self) -> &str {
        match self {
            PeerGroup::Industry(name) | PeerGroup::Region(name) => name,
        }
    }

    /// Peer group of a company for the requested grouping, if known
    pub fn for_company(company: &Company, by_region: bool) -> Option<Self> {
        if by_region {
            company.region.clone().map(PeerGroup::Region)
        } else {
            company.industry.clone().map(PeerGroup::Industry)
        }
    }
}

impl fmt::Display for PeerGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeerGroup::Industry(name) => write!(f, "industry {}", name),
            PeerGroup::Region(name) => write!(f, "region {}", name),
        }
    }
}
