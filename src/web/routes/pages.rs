// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
};

use crate::benchmark::{compare, narrative, ComparisonVerdict};
use crate::models::{Company, PeerGroup};
use crate::repository::{self, LeverageEntry};
use crate::scoring::WeightSet;
use crate::series::ChartPoint;
use crate::session::MetricCard;
use crate::web::routes::api::{load_session, SearchQuery, WeightQuery};
use crate::web::state::AppState;

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    query: String,
    results: Vec<Company>,
    leaders: Vec<LeverageEntry>,
}

/// Search page with the low-leverage ranking
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Html<String>, StatusCode> {
    let term = query.q.unwrap_or_default();
    let results = if term.trim().is_empty() {
        Vec::new()
    } else {
        repository::search_companies(&state.db_pool, &term, state.config.search_limit)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(%term, error = %e, "company search failed");
                Vec::new()
            })
    };

    // ranking failures leave the list empty
    let leaders = repository::low_leverage_leaders(&state.db_pool, 20)
        .await
        .unwrap_or_default();

    let template = IndexTemplate {
        query: term,
        results,
        leaders,
    };

    Ok(Html(
        template
            .render()
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?,
    ))
}

struct ComparisonRow {
    name: &'static str,
    unit: &'static str,
    company: f64,
    peer: f64,
    favorable: bool,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    stock_code: String,
    company_name: String,
    period: String,
    is_fallback: bool,
    score: u32,
    band_color: &'static str,
    verdict_message: &'static str,
    weights: WeightSet,
    metrics: Vec<MetricCard>,
    chart: Vec<ChartPoint>,
    peer_label: String,
    peer_authoritative: bool,
    by_region: bool,
    comparison: Vec<ComparisonRow>,
    narrative: Vec<String>,
}

/// Weight overrides plus the peer grouping; `serde(flatten)` cannot parse
/// numbers out of a query string.
#[derive(Debug, serde::Deserialize)]
pub struct DashboardQuery {
    liquidity: Option<u32>,
    stability: Option<u32>,
    profitability: Option<u32>,
    activity: Option<u32>,
    group: Option<String>,
}

impl DashboardQuery {
    fn weights(&self) -> WeightQuery {
        WeightQuery {
            liquidity: self.liquidity,
            stability: self.stability,
            profitability: self.profitability,
            activity: self.activity,
        }
    }
}

/// Dashboard page for one company
pub async fn dashboard(
    State(state): State<AppState>,
    Path(stock_code): Path<String>,
    Query(query): Query<DashboardQuery>,
) -> Result<Html<String>, StatusCode> {
    let weights = query
        .weights()
        .into_weights()
        .map_err(|_| StatusCode::BAD_REQUEST)?;
    let by_region = query.group.as_deref() == Some("region");

    let session = load_session(&state, &stock_code).await.with_weights(weights);
    let snapshot = session.snapshot();

    let group = PeerGroup::for_company(session.company(), by_region);
    let aggregate = repository::load_benchmark(&state.db_pool, group.as_ref()).await;
    let result = compare(session.latest(), &aggregate);

    let comparison = result
        .metrics
        .iter()
        .map(|m| ComparisonRow {
            name: m.kind.ratio_name(),
            unit: m.kind.unit(),
            company: m.company,
            peer: m.peer,
            favorable: m.verdict == ComparisonVerdict::Favorable,
        })
        .collect();

    let template = DashboardTemplate {
        stock_code: snapshot.company.stock_code.clone(),
        company_name: snapshot.company.company_name.clone(),
        period: snapshot.period.clone(),
        is_fallback: snapshot.is_fallback,
        score: snapshot.score,
        band_color: snapshot.band.color(),
        verdict_message: snapshot.verdict_message,
        weights: snapshot.weights,
        metrics: snapshot.metrics,
        chart: snapshot.chart,
        peer_label: aggregate.label.clone(),
        peer_authoritative: aggregate.authoritative,
        by_region,
        comparison,
        narrative: narrative(&result),
    };

    Ok(Html(
        template
            .render()
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?,
    ))
}
