//! Runtime configuration
//!
//! Loaded from an optional TOML file with environment overrides
//! (precedence: CLI > env > file > defaults).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_CONFIG_FILE: &str = "askrepo.toml";

/// Source file extensions ingested when the config does not override them.
pub fn default_include_extensions() -> Vec<String> {
    vec![".js".to_string()]
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Listening port.
    pub port: u16,
    /// Root for cloned working trees and durable session records.
    pub data_dir: PathBuf,
    /// File extensions included during ingestion (leading dot).
    pub include_extensions: Vec<String>,
    pub gemini: GeminiConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub model: String,
    /// API endpoint root; tests point this at a local mock server.
    pub api_base: String,
    /// Prefer the `GEMINI_API_KEY` environment variable over putting the
    /// key in a config file.
    pub api_key: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_dir: PathBuf::from("data"),
            include_extensions: default_include_extensions(),
            gemini: GeminiConfig::default(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-pro".to_string(),
            api_base: "https://generativelanguage.googleapis.com".to_string(),
            api_key: None,
        }
    }
}

impl AppConfig {
    pub fn repos_dir(&self) -> PathBuf {
        self.data_dir.join("repos")
    }

    pub fn sessions_dir(&self) -> PathBuf {
        self.data_dir.join("sessions")
    }
}

/// Load configuration, merging file and environment sources.
///
/// An explicitly provided config path must parse; a parse failure of the
/// auto-discovered `askrepo.toml` is logged and falls back to defaults.
pub fn load_config(config_path: Option<&Path>) -> Result<AppConfig> {
    let config_path_provided = config_path.is_some();

    let discovered = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.exists().then_some(default)
        }
    };

    let mut config = match discovered {
        Some(config_file) => {
            let content = fs::read_to_string(&config_file)
                .with_context(|| format!("Failed reading config file: {}", config_file.display()))?;
            match toml::from_str::<AppConfig>(&content) {
                Ok(cfg) => cfg,
                Err(e) if config_path_provided => {
                    return Err(e).with_context(|| {
                        format!("Invalid TOML config: {}", config_file.display())
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse auto-discovered config {}: {}",
                        config_file.display(),
                        e
                    );
                    AppConfig::default()
                }
            }
        }
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config);
    Ok(config)
}

fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(port) = std::env::var("PORT") {
        match port.parse() {
            Ok(p) => config.port = p,
            Err(_) => tracing::warn!("Ignoring non-numeric PORT value: {port}"),
        }
    }
    if let Ok(key) = std::env::var("GEMINI_API_KEY") {
        if !key.is_empty() {
            config.gemini.api_key = Some(key);
        }
    }
}
