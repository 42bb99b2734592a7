// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use std::sync::Arc;

use crate::commentary::GeminiClient;
use crate::config::Config;
use sqlx::SqlitePool;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub config: Config,
    pub commentary: Arc<GeminiClient>,
}

impl AppState {
    pub fn new(db_pool: SqlitePool, config: Config) -> Self {
        let commentary = Arc::new(GeminiClient::from_env(&config.commentary));
        Self::with_commentary(db_pool, config, commentary)
    }

    pub fn with_commentary(db_pool: SqlitePool, config: Config, commentary: Arc<GeminiClient>) -> Self {
        Self {
            db_pool,
            config,
            commentary,
        }
    }
}
