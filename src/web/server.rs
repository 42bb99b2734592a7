// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use axum::{Json, Router, routing::get};
use serde_json::json;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::web::{routes, state::AppState};

/// Create the Axum router with all routes
pub fn create_app(state: AppState) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Pages
        .route("/", get(routes::pages::index))
        .route("/companies/:code", get(routes::pages::dashboard))
        // API endpoints
        .route("/api/companies", get(routes::api::search_companies))
        .route(
            "/api/companies/:code/dashboard",
            get(routes::api::get_dashboard),
        )
        .route("/api/companies/:code/series", get(routes::api::get_series))
        .route(
            "/api/companies/:code/benchmark",
            get(routes::api::get_benchmark),
        )
        .route(
            "/api/companies/:code/commentary",
            get(routes::api::get_commentary),
        )
        .route("/api/companies/:code/report", get(routes::api::get_report))
        .route("/api/weights/default", get(routes::api::default_weights))
        .route("/api/leaders", get(routes::api::list_leaders))
        // Static file serving
        .nest_service("/static", ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        // Share app state
        .with_state(state)
}

/// Start the web server
pub async fn start_server(state: AppState, port: u16) -> anyhow::Result<()> {
    let app = create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "server starting");
    println!("🚀 Server starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
