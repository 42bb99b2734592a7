// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! Integration tests for the web interface
//!
//! Requests go straight into the router with `tower::ServiceExt::oneshot`,
//! backed by a seeded temporary database.

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use riskscore_rs::commentary::{GeminiClient, MISSING_KEY_NOTICE};
use riskscore_rs::config::{CommentaryConfig, Config};
use riskscore_rs::web::{server::create_app, AppState};
use serde_json::Value;
use sqlx::sqlite::SqlitePool;
use std::sync::Arc;
use tower::ServiceExt;

fn test_state(pool: SqlitePool) -> AppState {
    let commentary = Arc::new(GeminiClient::new(None, &CommentaryConfig::default()));
    AppState::with_commentary(pool, Config::builtin(), commentary)
}

async fn get(state: AppState, uri: &str) -> (StatusCode, String) {
    let response = create_app(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn get_json(state: AppState, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get(state, uri).await;
    (status, serde_json::from_str(&body).unwrap_or(Value::Null))
}

/// Test that the health check works
#[tokio::test]
async fn test_health_check() {
    let (pool, _dir) = common::create_test_db().await.unwrap();
    let (status, json) = get_json(test_state(pool), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_dashboard_scores_latest_period() {
    let (pool, _dir) = common::create_seeded_db().await.unwrap();
    let (status, json) = get_json(test_state(pool), "/api/companies/A005930/dashboard").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["period"], "2023-4Q");
    assert_eq!(json["score"], 84);
    assert_eq!(json["band"], "safe");
    assert_eq!(json["is_fallback"], false);
    assert_eq!(json["company"]["company_name"], "Samsung Electronics");
    assert_eq!(json["chart"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_dashboard_applies_weights() {
    let (pool, _dir) = common::create_seeded_db().await.unwrap();
    let (status, json) = get_json(
        test_state(pool),
        "/api/companies/A005930/dashboard?liquidity=0&profitability=0",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["score"], 50);
    assert_eq!(json["band"], "caution");
    assert_eq!(json["weights"]["stability"], 25);
}

#[tokio::test]
async fn test_dashboard_rejects_weight_above_100() {
    let (pool, _dir) = common::create_seeded_db().await.unwrap();
    let (status, json) = get_json(
        test_state(pool),
        "/api/companies/A005930/dashboard?stability=150",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("150"));
}

#[tokio::test]
async fn test_unknown_company_uses_fallback_series() {
    let (pool, _dir) = common::create_seeded_db().await.unwrap();
    let (status, json) = get_json(test_state(pool), "/api/companies/A999999/dashboard").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["is_fallback"], true);
    assert_eq!(json["period"], "2025-2Q");
    assert_eq!(json["company"]["company_name"], "A999999");
}

#[tokio::test]
async fn test_series_endpoint() {
    let (pool, _dir) = common::create_seeded_db().await.unwrap();
    let (status, json) = get_json(test_state(pool), "/api/companies/A005930/series").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["chart"][0]["name"], "2022.4Q");
    assert_eq!(json["chart"][1]["liquidity"], 150.0);
}

#[tokio::test]
async fn test_benchmark_by_industry_and_region() {
    let (pool, _dir) = common::create_seeded_db().await.unwrap();

    let (status, json) =
        get_json(test_state(pool.clone()), "/api/companies/A035420/benchmark").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["aggregate"]["label"], "Internet");
    assert_eq!(json["aggregate"]["authoritative"], true);
    assert_eq!(json["narrative"].as_array().unwrap().len(), 4);

    let (status, json) = get_json(
        test_state(pool),
        "/api/companies/A035420/benchmark?group=region",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["aggregate"]["label"], "경기도");
    assert_eq!(json["aggregate"]["current_ratio"], 145.0);
}

#[tokio::test]
async fn test_benchmark_falls_back_to_demo_aggregate() {
    let (pool, _dir) = common::create_test_db().await.unwrap();
    let (status, json) = get_json(test_state(pool), "/api/companies/A005930/benchmark").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["aggregate"]["label"], "Demo industry");
    assert_eq!(json["aggregate"]["authoritative"], false);
    assert_eq!(json["aggregate"]["current_ratio"], 170.0);
}

#[tokio::test]
async fn test_benchmark_rejects_unknown_group() {
    let (pool, _dir) = common::create_seeded_db().await.unwrap();
    let (status, _) = get(test_state(pool), "/api/companies/A005930/benchmark?group=sector").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_endpoint() {
    let (pool, _dir) = common::create_seeded_db().await.unwrap();

    let (status, json) = get_json(test_state(pool.clone()), "/api/companies?q=naver").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["companies"][0]["stock_code"], "A035420");

    let (_, json) = get_json(test_state(pool), "/api/companies?q=").await;
    assert!(json["companies"].as_array().unwrap().is_empty());
}

/// A failing search query answers like a search with no match
#[tokio::test]
async fn test_search_failure_returns_empty_list() {
    let (pool, _dir) = common::create_seeded_db().await.unwrap();
    pool.close().await;

    let (status, json) = get_json(test_state(pool.clone()), "/api/companies?q=samsung").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["companies"].as_array().unwrap().is_empty());

    let (status, html) = get(test_state(pool), "/?q=samsung").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("No companies match"));
    assert!(!html.contains("Samsung Electronics"));
}

#[tokio::test]
async fn test_commentary_without_key_returns_notice() {
    let (pool, _dir) = common::create_seeded_db().await.unwrap();
    let (status, json) = get_json(test_state(pool), "/api/companies/A005930/commentary").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["commentary"], MISSING_KEY_NOTICE);
}

#[tokio::test]
async fn test_report_and_default_weights() {
    let (pool, _dir) = common::create_seeded_db().await.unwrap();

    let (status, json) = get_json(test_state(pool.clone()), "/api/companies/A005930/report").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["score"], 84);
    assert_eq!(json["metrics"].as_array().unwrap().len(), 4);

    let (_, json) = get_json(test_state(pool), "/api/weights/default").await;
    assert_eq!(json["liquidity"], 25);
    assert_eq!(json["activity"], 25);
}

#[tokio::test]
async fn test_pages_render() {
    let (pool, _dir) = common::create_seeded_db().await.unwrap();

    let (status, html) = get(test_state(pool.clone()), "/?q=samsung").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Samsung Electronics"));
    assert!(html.contains("Lowest debt ratios"));

    let (status, html) = get(test_state(pool.clone()), "/companies/A005930").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Composite risk score"));
    assert!(html.contains("Financially very safe."));

    let (status, _) = get(test_state(pool), "/companies/A005930?activity=101").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
