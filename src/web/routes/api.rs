// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::benchmark::{compare, narrative};
use crate::commentary::CommentaryMetrics;
use crate::models::PeerGroup;
use crate::report::RiskReport;
use crate::repository;
use crate::scoring::{WeightError, WeightSet};
use crate::session::{DashboardSession, DashboardSnapshot};
use crate::web::state::AppState;

pub type ApiError = (StatusCode, Json<Value>);

fn error_response(status: StatusCode, message: impl ToString) -> ApiError {
    (status, Json(json!({ "error": message.to_string() })))
}

/// Optional weight overrides; omitted weights stay at their default
#[derive(Debug, Default, Deserialize)]
pub struct WeightQuery {
    pub liquidity: Option<u32>,
    pub stability: Option<u32>,
    pub profitability: Option<u32>,
    pub activity: Option<u32>,
}

impl WeightQuery {
    pub fn into_weights(self) -> Result<WeightSet, WeightError> {
        let defaults = WeightSet::default();
        WeightSet::new(
            self.liquidity.unwrap_or(defaults.liquidity()),
            self.stability.unwrap_or(defaults.stability()),
            self.profitability.unwrap_or(defaults.profitability()),
            self.activity.unwrap_or(defaults.activity()),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct BenchmarkQuery {
    pub group: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LeadersQuery {
    pub limit: Option<u32>,
}

/// Build a fresh session for one request
pub async fn load_session(state: &AppState, stock_code: &str) -> DashboardSession {
    let (company, series) = futures::join!(
        repository::load_company(&state.db_pool, stock_code),
        repository::load_series(&state.db_pool, stock_code),
    );
    DashboardSession::from_series(company, series)
}

/// Search companies by name or code; a failed query answers like no match
pub async fn search_companies(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Value> {
    let term = query.q.unwrap_or_default();
    if term.trim().is_empty() {
        return Json(json!({ "companies": [] }));
    }

    let limit = query
        .limit
        .unwrap_or(state.config.search_limit)
        .min(state.config.search_limit);
    let companies = repository::search_companies(&state.db_pool, &term, limit)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(%term, error = %e, "company search failed");
            Vec::new()
        });

    Json(json!({ "companies": companies }))
}

/// Dashboard snapshot for a company under the requested weights
pub async fn get_dashboard(
    State(state): State<AppState>,
    Path(stock_code): Path<String>,
    Query(weights): Query<WeightQuery>,
) -> Result<Json<DashboardSnapshot>, ApiError> {
    let weights = weights
        .into_weights()
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, e))?;

    let session = load_session(&state, &stock_code).await.with_weights(weights);
    Ok(Json(session.snapshot()))
}

/// Chronological records and chart points
pub async fn get_series(
    State(state): State<AppState>,
    Path(stock_code): Path<String>,
) -> Json<Value> {
    let series = repository::load_series(&state.db_pool, &stock_code).await;

    Json(json!({
        "stock_code": stock_code,
        "is_fallback": series.is_fallback(),
        "records": series.records(),
        "chart": series.chart_points(),
    }))
}

/// Latest period against the industry or region average
pub async fn get_benchmark(
    State(state): State<AppState>,
    Path(stock_code): Path<String>,
    Query(query): Query<BenchmarkQuery>,
) -> Result<Json<Value>, ApiError> {
    let by_region = match query.group.as_deref() {
        None | Some("industry") => false,
        Some("region") => true,
        Some(other) => {
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                format!("unknown group '{}', expected industry or region", other),
            ));
        }
    };

    let session = load_session(&state, &stock_code).await;
    let group = PeerGroup::for_company(session.company(), by_region);
    let aggregate = repository::load_benchmark(&state.db_pool, group.as_ref()).await;
    let comparison = compare(session.latest(), &aggregate);

    Ok(Json(json!({
        "stock_code": stock_code,
        "period": session.latest().period.label(),
        "group": group,
        "aggregate": aggregate,
        "narrative": narrative(&comparison),
        "comparison": comparison,
    })))
}

/// AI commentary on the latest period; always 200 with display text
pub async fn get_commentary(
    State(state): State<AppState>,
    Path(stock_code): Path<String>,
) -> Json<Value> {
    let session = load_session(&state, &stock_code).await;
    let metrics = CommentaryMetrics::from(session.latest());
    let company_name = session.company().company_name.clone();
    let text = state.commentary.analyze(&company_name, &metrics).await;

    Json(json!({
        "stock_code": stock_code,
        "company_name": company_name,
        "period": session.latest().period.label(),
        "is_fallback": session.series().is_fallback(),
        "commentary": text,
    }))
}

/// Exportable report under the requested weights
pub async fn get_report(
    State(state): State<AppState>,
    Path(stock_code): Path<String>,
    Query(weights): Query<WeightQuery>,
) -> Result<Json<RiskReport>, ApiError> {
    let weights = weights
        .into_weights()
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, e))?;

    let session = load_session(&state, &stock_code).await.with_weights(weights);
    Ok(Json(RiskReport::from_session(&session)))
}

pub async fn default_weights() -> Json<WeightSet> {
    Json(WeightSet::default())
}

/// Lowest debt ratios across all companies
pub async fn list_leaders(
    State(state): State<AppState>,
    Query(query): Query<LeadersQuery>,
) -> Result<Json<Value>, ApiError> {
    let limit = query.limit.unwrap_or(20).min(100);
    let leaders = repository::low_leverage_leaders(&state.db_pool, limit)
        .await
        .map_err(|e| error_response(StatusCode::INTERNAL_SERVER_ERROR, e))?;

    Ok(Json(json!({ "leaders": leaders })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_query_defaults() {
        let weights = WeightQuery::default().into_weights().unwrap();
        assert_eq!(weights, WeightSet::default());
    }

    #[test]
    fn test_weight_query_overrides_and_rejects() {
        let query = WeightQuery {
            profitability: Some(0),
            ..WeightQuery::default()
        };
        assert_eq!(query.into_weights().unwrap().profitability(), 0);

        let query = WeightQuery {
            stability: Some(150),
            ..WeightQuery::default()
        };
        assert!(query.into_weights().is_err());
    }
}
