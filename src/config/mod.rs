//! Configuration Management
//!
//! Loads quizforge configuration from TOML files, then applies environment
//! overrides. Configuration includes:
//! - API settings (endpoint, model, credential)
//! - Request timeouts and the retry budget
//! - Quiz defaults (count, difficulty, reveal pace, practice mode)
//! - Export output directory

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::quiz::Difficulty;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    pub api_key: Option<String>,

    #[serde(default)]
    pub request: RequestSettings,

    #[serde(default)]
    pub retry: RetrySettings,

    #[serde(default)]
    pub quiz: QuizSettings,

    #[serde(default)]
    pub export: ExportSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestSettings {
    /// Whole-request timeout for one generation attempt
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

/// Retry budget for transient server statuses (429/500/503)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Additional attempts after the first one
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Delay before the first retry; doubles on every further retry
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSettings {
    #[serde(default = "default_count")]
    pub default_count: i64,
    #[serde(default)]
    pub default_difficulty: Difficulty,
    /// Pause between two progressively revealed questions
    #[serde(default = "default_reveal_interval_ms")]
    pub reveal_interval_ms: u64,
    #[serde(default = "default_true")]
    pub practice_mode: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSettings {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: None,
            request: RequestSettings::default(),
            retry: RetrySettings::default(),
            quiz: QuizSettings::default(),
            export: ExportSettings::default(),
        }
    }
}

impl Default for RequestSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            default_count: default_count(),
            default_difficulty: Difficulty::default(),
            reveal_interval_ms: default_reveal_interval_ms(),
            practice_mode: true,
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
fn default_model() -> String {
    "gemini-2.5-flash-preview-05-20".to_string()
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_connect_timeout_secs() -> u64 {
    30
}
fn default_max_retries() -> u32 {
    2
}
fn default_base_delay_ms() -> u64 {
    1000
}
fn default_max_delay_ms() -> u64 {
    30000
}
fn default_count() -> i64 {
    5
}
fn default_reveal_interval_ms() -> u64 {
    100
}
fn default_true() -> bool {
    true
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Environment variables consulted for the API credential, in order.
pub const API_KEY_VARS: [&str; 2] = ["QUIZFORGE_API_KEY", "GEMINI_API_KEY"];

impl Config {
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(p) => {
                let content = std::fs::read_to_string(p)
                    .with_context(|| format!("Failed to read config from {}", p))?;
                toml::from_str(&content).context("Failed to parse config")?
            }
            None => {
                let mut default_paths = vec![PathBuf::from("quizforge.toml")];
                if let Some(home) = dirs::home_dir() {
                    default_paths.push(home.join(".config/quizforge/config.toml"));
                }

                let mut loaded = None;
                for p in &default_paths {
                    if let Ok(content) = std::fs::read_to_string(p) {
                        debug!("Loading config from {}", p.display());
                        loaded = Some(toml::from_str(&content).with_context(|| {
                            format!("Failed to parse config at {}", p.display())
                        })?);
                        break;
                    }
                }
                loaded.unwrap_or_else(|| {
                    debug!("No config file found, using defaults");
                    Self::default()
                })
            }
        };

        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Override settings from environment-style lookups.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup("QUIZFORGE_ENDPOINT") {
            self.endpoint = endpoint;
        }
        if let Some(model) = lookup("QUIZFORGE_MODEL") {
            self.model = model;
        }
        if let Some(key) = API_KEY_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .find(|v| !v.trim().is_empty())
        {
            self.api_key = Some(key);
        }
        if let Some(timeout) = lookup("QUIZFORGE_TIMEOUT") {
            if let Ok(t) = timeout.parse::<u64>() {
                self.request.timeout_secs = t;
            }
        }
        if let Some(dir) = lookup("QUIZFORGE_OUTPUT_DIR") {
            self.export.output_dir = PathBuf::from(dir);
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    pub fn reveal_interval(&self) -> Duration {
        Duration::from_millis(self.quiz.reveal_interval_ms)
    }
}
