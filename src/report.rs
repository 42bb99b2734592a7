// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! Exportable risk report: composite score, per-metric table and the raw
//! balance-sheet figures of the latest period.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use csv::Writer;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::FinancialRecord;
use crate::normalizer::MetricKind;
use crate::scoring::{RiskBand, Verdict};
use crate::session::DashboardSession;

#[derive(Debug, Clone, Serialize)]
pub struct MetricRow {
    pub metric: MetricKind,
    pub ratio: &'static str,
    pub value: f64,
    pub unit: &'static str,
    pub sub_score: f64,
    pub weight: u32,
    pub threshold: &'static str,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BalanceSheet {
    pub total_assets: Option<f64>,
    pub total_liabilities: Option<f64>,
    pub total_equity: Option<f64>,
    pub operating_cash_flow: Option<f64>,
    pub revenue: Option<f64>,
    pub altman_z_score: Option<f64>,
    pub piotroski_f_score: Option<f64>,
}

impl From<&FinancialRecord> for BalanceSheet {
    fn from(record: &FinancialRecord) -> Self {
        Self {
            total_assets: record.total_assets,
            total_liabilities: record.total_liabilities,
            total_equity: record.total_equity,
            operating_cash_flow: record.operating_cash_flow,
            revenue: record.revenue,
            altman_z_score: record.altman_z_score,
            piotroski_f_score: record.piotroski_f_score,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskReport {
    pub stock_code: String,
    pub company_name: String,
    pub period: String,
    pub is_fallback: bool,
    pub score: u32,
    pub band: RiskBand,
    pub verdict: Verdict,
    pub metrics: Vec<MetricRow>,
    pub balance_sheet: BalanceSheet,
    pub commentary: Option<String>,
    pub generated_at: DateTime<Utc>,
}

impl RiskReport {
    pub fn from_session(session: &DashboardSession) -> Self {
        let snapshot = session.snapshot();
        let metrics = snapshot
            .metrics
            .iter()
            .map(|card| MetricRow {
                metric: card.kind,
                ratio: card.label,
                value: card.value,
                unit: card.kind.unit(),
                sub_score: card.sub_score,
                weight: card.weight,
                threshold: card.threshold,
            })
            .collect();

        Self {
            stock_code: snapshot.company.stock_code.clone(),
            company_name: snapshot.company.company_name.clone(),
            period: snapshot.period,
            is_fallback: snapshot.is_fallback,
            score: snapshot.score,
            band: snapshot.band,
            verdict: snapshot.verdict,
            metrics,
            balance_sheet: BalanceSheet::from(session.latest()),
            commentary: None,
            generated_at: Utc::now(),
        }
    }

    pub fn with_commentary(mut self, commentary: String) -> Self {
        self.commentary = Some(commentary);
        self
    }

    fn file_stem(&self) -> String {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        format!("risk_report_{}_{}", sanitize(&self.stock_code), timestamp)
    }

    pub fn write_json(&self, output_dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create {}", output_dir.display()))?;
        let path = output_dir.join(format!("{}.json", self.file_stem()));
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote JSON report");
        Ok(path)
    }

    /// One row per metric followed by the balance-sheet figures
    pub fn write_csv(&self, output_dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create {}", output_dir.display()))?;
        let path = output_dir.join(format!("{}.csv", self.file_stem()));
        let mut writer = Writer::from_path(&path)?;

        writer.write_record(["Section", "Item", "Value", "Sub-score", "Weight", "Evaluation"])?;
        writer.write_record([
            "Summary",
            "Composite risk score",
            self.score.to_string().as_str(),
            "",
            "",
            self.verdict.message(),
        ])?;
        for row in &self.metrics {
            writer.write_record([
                "Metric",
                row.ratio,
                format!("{:.2}{}", row.value, row.unit).as_str(),
                format!("{:.1}", row.sub_score).as_str(),
                row.weight.to_string().as_str(),
                row.threshold,
            ])?;
        }

        let sheet = &self.balance_sheet;
        let figures = [
            ("Total assets", sheet.total_assets),
            ("Total liabilities", sheet.total_liabilities),
            ("Total equity", sheet.total_equity),
            ("Operating cash flow", sheet.operating_cash_flow),
            ("Revenue", sheet.revenue),
            ("Altman Z-score", sheet.altman_z_score),
            ("Piotroski F-score", sheet.piotroski_f_score),
        ];
        for (item, value) in figures {
            let value = value.map(|v| v.to_string()).unwrap_or_else(|| "NA".to_string());
            writer.write_record(["Balance sheet", item, value.as_str(), "", "", ""])?;
        }

        writer.flush()?;
        tracing::info!(path = %path.display(), "wrote CSV report");
        Ok(path)
    }
}

fn sanitize(code: &str) -> String {
    code.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
