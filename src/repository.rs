// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! Queries against the companies / financial_reports tables.
//!
//! The `load_*` functions never fail: an empty result and a query error both
//! degrade to fallback data, which is what the dashboard renders.

use anyhow::Result;
use serde::Serialize;
use sqlx::sqlite::SqlitePool;

use crate::benchmark::{fallback_aggregate, BenchmarkAggregate};
use crate::models::{Company, FinancialRecord, PeerGroup};
use crate::period::Period;
use crate::series::{build_series, TimeSeries};

#[derive(Debug, sqlx::FromRow)]
struct FinancialReportRow {
    stock_code: String,
    period: String,
    current_ratio: Option<f64>,
    debt_to_equity_ratio: Option<f64>,
    roe: Option<f64>,
    interest_coverage_ratio: Option<f64>,
    roa: Option<f64>,
    altman_z_score: Option<f64>,
    piotroski_f_score: Option<f64>,
    total_assets: Option<f64>,
    total_liabilities: Option<f64>,
    total_equity: Option<f64>,
    operating_cash_flow: Option<f64>,
    revenue: Option<f64>,
}

impl From<FinancialReportRow> for FinancialRecord {
    fn from(row: FinancialReportRow) -> Self {
        Self {
            stock_code: row.stock_code,
            period: Period::from(row.period),
            current_ratio: row.current_ratio,
            debt_to_equity_ratio: row.debt_to_equity_ratio,
            roe: row.roe,
            interest_coverage_ratio: row.interest_coverage_ratio,
            roa: row.roa,
            altman_z_score: row.altman_z_score,
            piotroski_f_score: row.piotroski_f_score,
            total_assets: row.total_assets,
            total_liabilities: row.total_liabilities,
            total_equity: row.total_equity,
            operating_cash_flow: row.operating_cash_flow,
            revenue: row.revenue,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AverageRow {
    avg_current_ratio: Option<f64>,
    avg_debt_to_equity_ratio: Option<f64>,
    avg_roe: Option<f64>,
    avg_interest_coverage_ratio: Option<f64>,
}

/// Low-leverage ranking entry
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LeverageEntry {
    pub stock_code: String,
    pub company_name: String,
    pub industry: Option<String>,
    pub period: String,
    pub current_ratio: Option<f64>,
    pub debt_to_equity_ratio: f64,
    pub altman_z_score: Option<f64>,
    pub market_cap_recent: Option<f64>,
}

/// All financial records of one company, in storage order
pub async fn fetch_financial_records(
    pool: &SqlitePool,
    stock_code: &str,
) -> Result<Vec<FinancialRecord>> {
    let rows = sqlx::query_as::<_, FinancialReportRow>(
        r#"
        SELECT stock_code, period, current_ratio, debt_to_equity_ratio, roe,
               interest_coverage_ratio, roa, altman_z_score, piotroski_f_score,
               total_assets, total_liabilities, total_equity, operating_cash_flow, revenue
        FROM financial_reports
        WHERE stock_code = ?
        ORDER BY period
        "#,
    )
    .bind(stock_code)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(FinancialRecord::from).collect())
}

/// Insert or replace the record for its (stock_code, period)
pub async fn upsert_financial_record(pool: &SqlitePool, record: &FinancialRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO financial_reports (
            stock_code, period, current_ratio, debt_to_equity_ratio, roe,
            interest_coverage_ratio, roa, altman_z_score, piotroski_f_score,
            total_assets, total_liabilities, total_equity, operating_cash_flow, revenue
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(stock_code, period) DO UPDATE SET
            current_ratio = excluded.current_ratio,
            debt_to_equity_ratio = excluded.debt_to_equity_ratio,
            roe = excluded.roe,
            interest_coverage_ratio = excluded.interest_coverage_ratio,
            roa = excluded.roa,
            altman_z_score = excluded.altman_z_score,
            piotroski_f_score = excluded.piotroski_f_score,
            total_assets = excluded.total_assets,
            total_liabilities = excluded.total_liabilities,
            total_equity = excluded.total_equity,
            operating_cash_flow = excluded.operating_cash_flow,
            revenue = excluded.revenue,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(&record.stock_code)
    .bind(record.period.label())
    .bind(record.current_ratio)
    .bind(record.debt_to_equity_ratio)
    .bind(record.roe)
    .bind(record.interest_coverage_ratio)
    .bind(record.roa)
    .bind(record.altman_z_score)
    .bind(record.piotroski_f_score)
    .bind(record.total_assets)
    .bind(record.total_liabilities)
    .bind(record.total_equity)
    .bind(record.operating_cash_flow)
    .bind(record.revenue)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn fetch_company(pool: &SqlitePool, stock_code: &str) -> Result<Option<Company>> {
    let company = sqlx::query_as::<_, Company>(
        r#"
        SELECT stock_code, company_name, industry, region, address, market_type, market_cap_recent
        FROM companies
        WHERE stock_code = ?
        "#,
    )
    .bind(stock_code)
    .fetch_optional(pool)
    .await?;

    Ok(company)
}

pub async fn upsert_company(pool: &SqlitePool, company: &Company) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO companies (
            stock_code, company_name, industry, region, address, market_type, market_cap_recent
        )
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(stock_code) DO UPDATE SET
            company_name = excluded.company_name,
            industry = excluded.industry,
            region = excluded.region,
            address = excluded.address,
            market_type = excluded.market_type,
            market_cap_recent = excluded.market_cap_recent,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(&company.stock_code)
    .bind(&company.company_name)
    .bind(&company.industry)
    .bind(&company.region)
    .bind(&company.address)
    .bind(&company.market_type)
    .bind(company.market_cap_recent)
    .execute(pool)
    .await?;

    Ok(())
}

/// Companies whose name or code contains `term` (case-insensitive), at most `limit`
pub async fn search_companies(pool: &SqlitePool, term: &str, limit: u32) -> Result<Vec<Company>> {
    let pattern = format!("%{}%", escape_like(term.trim()));
    let companies = sqlx::query_as::<_, Company>(
        r#"
        SELECT stock_code, company_name, industry, region, address, market_type, market_cap_recent
        FROM companies
        WHERE company_name LIKE ?1 ESCAPE '\' OR stock_code LIKE ?1 ESCAPE '\'
        ORDER BY company_name
        LIMIT ?2
        "#,
    )
    .bind(pattern)
    .bind(i64::from(limit))
    .fetch_all(pool)
    .await?;

    Ok(companies)
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Average ratios across the peer group; `None` when the group has no rows
pub async fn fetch_peer_aggregate(
    pool: &SqlitePool,
    group: &PeerGroup,
) -> Result<Option<BenchmarkAggregate>> {
    let sql = match group {
        PeerGroup::Industry(_) => {
            r#"
            SELECT avg_current_ratio, avg_debt_to_equity_ratio, avg_roe, avg_interest_coverage_ratio
            FROM industry_averages
            WHERE industry = ?
            "#
        }
        PeerGroup::Region(_) => {
            r#"
            SELECT avg_current_ratio, avg_debt_to_equity_ratio, avg_roe, avg_interest_coverage_ratio
            FROM region_averages
            WHERE region = ?
            "#
        }
    };

    let row = sqlx::query_as::<_, AverageRow>(sql)
        .bind(group.name())
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|avg| BenchmarkAggregate {
        label: group.name().to_string(),
        current_ratio: avg.avg_current_ratio.unwrap_or(0.0),
        debt_to_equity_ratio: avg.avg_debt_to_equity_ratio.unwrap_or(0.0),
        roe: avg.avg_roe.unwrap_or(0.0),
        interest_coverage_ratio: avg.avg_interest_coverage_ratio.unwrap_or(0.0),
        authoritative: true,
    }))
}

/// Records with a debt ratio, lowest leverage first
pub async fn low_leverage_leaders(pool: &SqlitePool, limit: u32) -> Result<Vec<LeverageEntry>> {
    let entries = sqlx::query_as::<_, LeverageEntry>(
        r#"
        SELECT f.stock_code, c.company_name, c.industry, f.period, f.current_ratio,
               f.debt_to_equity_ratio, f.altman_z_score, c.market_cap_recent
        FROM financial_reports f
        JOIN companies c ON c.stock_code = f.stock_code
        WHERE f.debt_to_equity_ratio IS NOT NULL
        ORDER BY f.debt_to_equity_ratio ASC
        LIMIT ?
        "#,
    )
    .bind(i64::from(limit))
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

/// Company metadata, or a placeholder named after the code
pub async fn load_company(pool: &SqlitePool, stock_code: &str) -> Company {
    match fetch_company(pool, stock_code).await {
        Ok(Some(company)) => company,
        Ok(None) => Company::unknown(stock_code),
        Err(e) => {
            tracing::warn!(stock_code, error = %e, "company lookup failed");
            Company::unknown(stock_code)
        }
    }
}

/// Chronological series for a company, falling back to the synthetic series
pub async fn load_series(pool: &SqlitePool, stock_code: &str) -> TimeSeries {
    let records = match fetch_financial_records(pool, stock_code).await {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(stock_code, error = %e, "financial records query failed");
            Vec::new()
        }
    };
    let series = build_series(records);
    if series.is_fallback() {
        tracing::info!(stock_code, "no financial records, using fallback series");
    }
    series
}

/// Peer aggregate for the group, or the non-authoritative demo aggregate
pub async fn load_benchmark(pool: &SqlitePool, group: Option<&PeerGroup>) -> BenchmarkAggregate {
    let Some(group) = group else {
        return fallback_aggregate(None);
    };

    match fetch_peer_aggregate(pool, group).await {
        Ok(Some(aggregate)) => aggregate,
        Ok(None) => {
            tracing::info!(%group, "no peer average, using demo aggregate");
            fallback_aggregate(Some(group.name()))
        }
        Err(e) => {
            tracing::warn!(%group, error = %e, "peer average query failed");
            fallback_aggregate(Some(group.name()))
        }
    }
}
