// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! Derive risk ratios from raw statement figures.
//!
//! Every ratio is `None` when an input is missing or the division does not
//! produce a finite number (zero denominators in particular).

use serde::Deserialize;

use crate::models::FinancialRecord;
use crate::period::Period;

/// Raw statement figures for one company and period, as imported
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawStatement {
    pub stock_code: String,
    pub period: String,
    pub current_assets: Option<f64>,
    pub current_liabilities: Option<f64>,
    pub total_assets: Option<f64>,
    pub total_liabilities: Option<f64>,
    pub total_equity: Option<f64>,
    pub net_income: Option<f64>,
    pub operating_income: Option<f64>,
    pub interest_expense: Option<f64>,
    pub retained_earnings: Option<f64>,
    pub revenue: Option<f64>,
    pub operating_cash_flow: Option<f64>,
}

fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    finite(numerator? / denominator?)
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

fn percent(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    ratio(numerator, denominator).and_then(|r| finite(r * 100.0))
}

impl RawStatement {
    pub fn current_ratio(&self) -> Option<f64> {
        percent(self.current_assets, self.current_liabilities)
    }

    pub fn debt_to_equity_ratio(&self) -> Option<f64> {
        percent(self.total_liabilities, self.total_equity)
    }

    pub fn roe(&self) -> Option<f64> {
        percent(self.net_income, self.total_equity)
    }

    pub fn roa(&self) -> Option<f64> {
        percent(self.operating_income, self.total_assets)
    }

    pub fn interest_coverage_ratio(&self) -> Option<f64> {
        ratio(self.operating_income, self.interest_expense)
    }

    /// Altman Z-score: 1.2A + 1.4B + 3.3C + 0.6D + 1.0E
    pub fn altman_z_score(&self) -> Option<f64> {
        let working_capital = Some(self.current_assets? - self.current_liabilities?);
        let a = ratio(working_capital, self.total_assets)?;
        let b = ratio(self.retained_earnings, self.total_assets)?;
        let c = ratio(self.operating_income, self.total_assets)?;
        let d = ratio(self.total_equity, self.total_liabilities)?;
        let e = ratio(self.revenue, self.total_assets)?;
        finite(1.2 * a + 1.4 * b + 3.3 * c + 0.6 * d + 1.0 * e)
    }

    pub fn into_record(self) -> FinancialRecord {
        FinancialRecord {
            current_ratio: self.current_ratio(),
            debt_to_equity_ratio: self.debt_to_equity_ratio(),
            roe: self.roe(),
            interest_coverage_ratio: self.interest_coverage_ratio(),
            roa: self.roa(),
            altman_z_score: self.altman_z_score(),
            piotroski_f_score: None,
            total_assets: self.total_assets,
            total_liabilities: self.total_liabilities,
            total_equity: self.total_equity,
            operating_cash_flow: self.operating_cash_flow,
            revenue: self.revenue,
            period: Period::parse(&self.period),
            stock_code: self.stock_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn statement() -> RawStatement {
        RawStatement {
            stock_code: "A000020".to_string(),
            period: "2023/Annual".to_string(),
            current_assets: Some(300.0),
            current_liabilities: Some(150.0),
            total_assets: Some(1000.0),
            total_liabilities: Some(400.0),
            total_equity: Some(600.0),
            net_income: Some(90.0),
            operating_income: Some(120.0),
            interest_expense: Some(20.0),
            retained_earnings: Some(250.0),
            revenue: Some(800.0),
            operating_cash_flow: Some(110.0),
        }
    }

    #[test]
    fn test_ratios() {
        let s = statement();
        assert_relative_eq!(s.current_ratio().unwrap(), 200.0);
        assert_relative_eq!(s.debt_to_equity_ratio().unwrap(), 66.666, epsilon = 0.001);
        assert_relative_eq!(s.roe().unwrap(), 15.0);
        assert_relative_eq!(s.roa().unwrap(), 12.0);
        assert_relative_eq!(s.interest_coverage_ratio().unwrap(), 6.0);
    }

    #[test]
    fn test_altman_z_score() {
        // A=0.15 B=0.25 C=0.12 D=1.5 E=0.8
        let expected = 1.2 * 0.15 + 1.4 * 0.25 + 3.3 * 0.12 + 0.6 * 1.5 + 0.8;
        assert_relative_eq!(statement().altman_z_score().unwrap(), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_denominator_yields_none() {
        let s = RawStatement {
            interest_expense: Some(0.0),
            total_equity: Some(0.0),
            ..statement()
        };
        assert_eq!(s.interest_coverage_ratio(), None);
        assert_eq!(s.debt_to_equity_ratio(), None);
        assert_eq!(s.roe(), None);
        // D collapses to 0 but the score is still defined
        let expected = 1.2 * 0.15 + 1.4 * 0.25 + 3.3 * 0.12 + 0.8;
        assert_relative_eq!(s.altman_z_score().unwrap(), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_missing_input_yields_none() {
        let s = RawStatement {
            retained_earnings: None,
            ..statement()
        };
        assert_eq!(s.altman_z_score(), None);
        assert!(s.current_ratio().is_some());
    }

    #[test]
    fn test_into_record_keeps_balance_sheet_figures() {
        let record = statement().into_record();
        assert_eq!(record.period.label(), "2023/Annual");
        assert_eq!(record.total_assets, Some(1000.0));
        assert_eq!(record.operating_cash_flow, Some(110.0));
        assert_eq!(record.piotroski_f_score, None);
    }
}
