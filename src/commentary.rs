// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! AI commentary on a company's ratios via the Gemini `generateContent` API.
//!
//! [`GeminiClient::analyze`] always returns display text. Failures become a
//! short explanatory string so the scoring pipeline is never interrupted.

use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use std::env;
use std::time::Duration;
use thiserror::Error;

use crate::config::CommentaryConfig;
use crate::models::FinancialRecord;
use crate::normalizer::MetricKind;

pub const MISSING_KEY_NOTICE: &str = "AI analysis is unavailable because no API key is configured. \
Set GEMINI_API_KEY in the environment or .env file and restart the server.";

const SYSTEM_INSTRUCTION: &str = "You are a professional investment analyst. \
Write in a polite, professional report tone.";

#[derive(Error, Debug)]
pub enum CommentaryError {
    #[error("API key not configured")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API request failed (status: {status}, message: {message})")]
    Status { status: u16, message: String },

    #[error("AI response was empty")]
    EmptyResponse,
}

/// Figures handed to the model; absent ratios are sent as 0
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CommentaryMetrics {
    pub current_ratio: f64,
    pub debt_ratio: f64,
    pub roe: f64,
    pub activity: f64,
    pub z_score: f64,
}

impl From<&FinancialRecord> for CommentaryMetrics {
    fn from(record: &FinancialRecord) -> Self {
        Self {
            current_ratio: record.metric(MetricKind::Liquidity),
            debt_ratio: record.metric(MetricKind::Stability),
            roe: record.metric(MetricKind::Profitability),
            activity: record.metric(MetricKind::Activity),
            z_score: record.altman_z_score.unwrap_or(0.0),
        }
    }
}

pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    api_base: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, config: &CommentaryConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: config.model.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Read the key from `GEMINI_API_KEY`
    pub fn from_env(config: &CommentaryConfig) -> Self {
        Self::new(env::var("GEMINI_API_KEY").ok(), config)
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Commentary text for display, verbatim from the model or a failure notice
    pub async fn analyze(&self, company_name: &str, metrics: &CommentaryMetrics) -> String {
        match self.request_analysis(company_name, metrics).await {
            Ok(text) => text,
            Err(CommentaryError::MissingApiKey) => MISSING_KEY_NOTICE.to_string(),
            Err(e) => {
                tracing::warn!(company_name, error = %e, "AI commentary failed");
                format!("AI analysis server connection failed. (error: {})", e)
            }
        }
    }

    pub async fn request_analysis(
        &self,
        company_name: &str,
        metrics: &CommentaryMetrics,
    ) -> Result<String, CommentaryError> {
        let api_key = self.api_key.as_deref().ok_or(CommentaryError::MissingApiKey)?;

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.api_base, self.model, api_key
        );
        let payload = json!({
            "contents": [{ "parts": [{ "text": build_prompt(company_name, metrics) }] }],
            "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
        });

        let response = self.client.post(&url).json(&payload).send().await?;
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if !status.is_success() {
            let message = body["error"]["message"]
                .as_str()
                .unwrap_or("unknown")
                .to_string();
            return Err(CommentaryError::Status {
                status: status.as_u16(),
                message,
            });
        }

        extract_text(&body).ok_or(CommentaryError::EmptyResponse)
    }
}

/// First candidate's first text part
pub fn extract_text(body: &Value) -> Option<String> {
    body["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
}

pub fn build_prompt(company_name: &str, metrics: &CommentaryMetrics) -> String {
    format!(
        "The financial indicators of {company_name} are as follows:\n\
         - Current ratio: {}%\n\
         - Debt ratio: {}%\n\
         - ROE: {}%\n\
         - Interest coverage ratio: {}x\n\
         - Z-Score: {}\n\n\
         Based on this data, diagnose the company's financial health clearly as one of \
         'very risky', 'caution' or 'safe', and summarise in three lines the risk factors \
         and the positive factors an investor should note, professionally but plainly.",
        metrics.current_ratio, metrics.debt_ratio, metrics.roe, metrics.activity, metrics.z_score,
    )
}
