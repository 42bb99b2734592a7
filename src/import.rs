// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! CSV ingestion of company info and raw financial statements.
//!
//! Company files are `company_info*.csv`; statement files are
//! `finance_data*.csv`. Ratios are derived on the way in.

use anyhow::{Context, Result};
use csv::Reader;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use sqlx::sqlite::SqlitePool;
use std::path::{Path, PathBuf};

use crate::models::Company;
use crate::ratios::RawStatement;
use crate::repository::{upsert_company, upsert_financial_record};

#[derive(Debug, Deserialize)]
struct CompanyCsvRow {
    stock_code: String,
    company_name: String,
    industry: Option<String>,
    address: Option<String>,
    market_type: Option<String>,
    market_cap_recent: Option<f64>,
}

impl From<CompanyCsvRow> for Company {
    fn from(row: CompanyCsvRow) -> Self {
        let region = row.address.as_deref().and_then(extract_region);
        Self {
            stock_code: row.stock_code,
            company_name: row.company_name,
            industry: row.industry.filter(|s| !s.trim().is_empty()),
            region,
            address: row.address,
            market_type: row.market_type,
            market_cap_recent: row.market_cap_recent,
        }
    }
}

/// Summary of one import run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub companies: usize,
    pub statements: usize,
    pub skipped: usize,
}

/// Region name from a head-office address.
///
/// A leading postal code closed by `)` is dropped, the first word is taken,
/// and the common short forms are expanded.
pub fn extract_region(address: &str) -> Option<String> {
    let cleaned = address.rsplit(')').next().unwrap_or(address).trim();
    let first = cleaned.split_whitespace().next()?;
    let region = match first {
        "서울" => "서울시",
        "경기" => "경기도",
        "인천" => "인천광역시",
        "부산" => "부산광역시",
        other => other,
    };
    Some(region.to_string())
}

fn progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb.set_message(label.to_string());
    pb
}

pub async fn import_companies(pool: &SqlitePool, path: &Path) -> Result<usize> {
    let mut reader = Reader::from_path(path)
        .with_context(|| format!("Failed to open company file {}", path.display()))?;
    let rows: Vec<CompanyCsvRow> = reader
        .deserialize()
        .collect::<Result<_, _>>()
        .with_context(|| format!("Failed to parse company file {}", path.display()))?;

    let pb = progress_bar(rows.len() as u64, "companies");
    let mut count = 0;
    for row in rows {
        upsert_company(pool, &Company::from(row)).await?;
        count += 1;
        pb.inc(1);
    }
    pb.finish_and_clear();

    tracing::info!(path = %path.display(), count, "imported companies");
    Ok(count)
}

/// Import raw statements; rows without a period are skipped.
pub async fn import_statements(pool: &SqlitePool, path: &Path) -> Result<(usize, usize)> {
    let mut reader = Reader::from_path(path)
        .with_context(|| format!("Failed to open statement file {}", path.display()))?;
    let rows: Vec<RawStatement> = reader
        .deserialize()
        .collect::<Result<_, _>>()
        .with_context(|| format!("Failed to parse statement file {}", path.display()))?;

    let pb = progress_bar(rows.len() as u64, "statements");
    let (mut imported, mut skipped) = (0, 0);
    for row in rows {
        pb.inc(1);
        if row.period.trim().is_empty() || row.stock_code.trim().is_empty() {
            skipped += 1;
            continue;
        }
        upsert_financial_record(pool, &row.into_record()).await?;
        imported += 1;
    }
    pb.finish_and_clear();

    if skipped > 0 {
        tracing::warn!(path = %path.display(), skipped, "skipped statements without code or period");
    }
    tracing::info!(path = %path.display(), imported, "imported statements");
    Ok((imported, skipped))
}

fn find_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let full = dir.join(pattern);
    let mut files: Vec<PathBuf> = glob::glob(&full.to_string_lossy())
        .context("Invalid import pattern")?
        .filter_map(|entry| entry.ok())
        .collect();
    files.sort();
    Ok(files)
}

/// Import every company and statement file found in `dir`
pub async fn import_directory(pool: &SqlitePool, dir: &Path) -> Result<ImportSummary> {
    let company_files = find_files(dir, "company_info*.csv")?;
    let statement_files = find_files(dir, "finance_data*.csv")?;

    if company_files.is_empty() && statement_files.is_empty() {
        anyhow::bail!("No company_info*.csv or finance_data*.csv files in {}", dir.display());
    }

    let mut summary = ImportSummary::default();
    for file in &company_files {
        summary.companies += import_companies(pool, file).await?;
    }
    for file in &statement_files {
        let (imported, skipped) = import_statements(pool, file).await?;
        summary.statements += imported;
        summary.skipped += skipped;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_region_normalizes_short_names() {
        assert_eq!(extract_region("서울 강남구 테헤란로 1").as_deref(), Some("서울시"));
        assert_eq!(extract_region("경기 성남시 분당구").as_deref(), Some("경기도"));
        assert_eq!(extract_region("부산 해운대구").as_deref(), Some("부산광역시"));
    }

    #[test]
    fn test_extract_region_strips_postal_code() {
        assert_eq!(
            extract_region("(06164) 인천 연수구 송도동").as_deref(),
            Some("인천광역시")
        );
        assert_eq!(extract_region("(12345) 충청북도 청주시").as_deref(), Some("충청북도"));
    }

    #[test]
    fn test_extract_region_empty() {
        assert_eq!(extract_region(""), None);
        assert_eq!(extract_region("   "), None);
        assert_eq!(extract_region("(12345)"), None);
    }

    #[test]
    fn test_company_row_conversion_derives_region() {
        let row = CompanyCsvRow {
            stock_code: "A000020".to_string(),
            company_name: "Dongwha Pharm".to_string(),
            industry: Some(" ".to_string()),
            address: Some("서울 중구".to_string()),
            market_type: Some("KOSPI".to_string()),
            market_cap_recent: None,
        };
        let company = Company::from(row);
        assert_eq!(company.region.as_deref(), Some("서울시"));
        assert_eq!(company.industry, None);
    }
}
