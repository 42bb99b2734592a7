// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Maximum rows returned by company search
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,
    /// Directory for exported reports and charts
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default)]
    pub commentary: CommentaryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentaryConfig {
    pub model: String,
    pub api_base: String,
}

impl Default for CommentaryConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }
}

fn default_search_limit() -> u32 {
    5
}

fn default_output_dir() -> String {
    "output".to_string()
}

impl Default for Config {
    fn default() -> Self {
        // Try to read from config.toml first
        if let Ok(config) = load_config() {
            return config;
        }

        Self::builtin()
    }
}

impl Config {
    /// Hardcoded defaults, ignoring config.toml
    pub fn builtin() -> Self {
        Self {
            search_limit: default_search_limit(),
            output_dir: default_output_dir(),
            commentary: CommentaryConfig::default(),
        }
    }
}

fn get_config_path() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("config.toml");
    path
}

pub fn load_config() -> anyhow::Result<Config> {
    let config_path = get_config_path();
    match fs::read_to_string(&config_path) {
        Ok(config_str) => match toml::from_str(&config_str) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::error!("Failed to parse config.toml: {}", e);
                Err(e.into())
            }
        },
        Err(e) => {
            tracing::debug!(
                "Failed to read config.toml from path {:?}: {}",
                config_path,
                e
            );
            Err(e.into())
        }
    }
}
