// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! Common test utilities and helpers
//!
//! Temporary SQLite databases with the migrations applied, optionally seeded
//! with a small set of companies across two industries and two regions.

#![allow(dead_code)]

use anyhow::Result;
use riskscore_rs::models::{Company, FinancialRecord};
use riskscore_rs::repository::{upsert_company, upsert_financial_record};
use sqlx::sqlite::SqlitePool;
use tempfile::TempDir;

/// Creates a temporary SQLite database with the schema applied
pub async fn create_test_db() -> Result<(SqlitePool, TempDir)> {
    let temp_dir = tempfile::tempdir()?;
    let db_path = temp_dir.path().join("test.db");
    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let pool = SqlitePool::connect(&db_url).await?;

    // Run migrations
    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok((pool, temp_dir))
}

pub fn company(code: &str, name: &str, industry: &str, region: &str) -> Company {
    Company {
        industry: Some(industry.to_string()),
        region: Some(region.to_string()),
        company_name: name.to_string(),
        ..Company::unknown(code)
    }
}

pub fn record(
    code: &str,
    period: &str,
    current: f64,
    debt: f64,
    roe: f64,
    coverage: f64,
) -> FinancialRecord {
    FinancialRecord {
        current_ratio: Some(current),
        debt_to_equity_ratio: Some(debt),
        roe: Some(roe),
        interest_coverage_ratio: Some(coverage),
        ..FinancialRecord::empty(code, period)
    }
}

/// Creates a test database populated with sample companies and reports
///
/// Electronics: A005930 (two periods) and A000660, both in 경기도.
/// Internet: A035420 in 경기도. Automobiles: A005380 in 서울시.
pub async fn create_seeded_db() -> Result<(SqlitePool, TempDir)> {
    let (pool, temp_dir) = create_test_db().await?;

    let companies = vec![
        company("A005930", "Samsung Electronics", "Electronics", "경기도"),
        company("A000660", "SK hynix", "Electronics", "경기도"),
        company("A035420", "NAVER", "Internet", "경기도"),
        company("A005380", "Hyundai Motor", "Automobiles", "서울시"),
    ];
    for c in &companies {
        upsert_company(&pool, c).await?;
    }

    let records = vec![
        // inserted newest first to exercise ordering
        record("A005930", "2023-4Q", 150.0, 80.0, 12.0, 12.0),
        record("A005930", "2022-4Q", 100.0, 200.0, 2.0, 1.0),
        record("A000660", "2023-4Q", 130.0, 60.0, 8.0, 5.0),
        record("A035420", "2023-4Q", 200.0, 40.0, 6.0, 20.0),
        record("A005380", "2023-4Q", 110.0, 180.0, 10.0, 4.0),
    ];
    for r in &records {
        upsert_financial_record(&pool, r).await?;
    }

    Ok((pool, temp_dir))
}
