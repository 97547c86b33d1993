use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub youtube: YouTubeConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YouTubeConfig {
    /// Data API key; falls back to the YOUTUBE_API_KEY environment variable
    pub api_key: Option<String>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_timedtext_base")]
    pub timedtext_base: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_comments")]
    pub max_comments: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisBackend {
    /// Built-in word lists, no network access
    #[default]
    Lexicon,
    /// Hosted transformer models
    Huggingface,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub backend: AnalysisBackend,
    pub huggingface_token: Option<String>,
    #[serde(default = "default_huggingface_base")]
    pub huggingface_base: String,
    #[serde(default = "default_top_keywords")]
    pub top_keywords: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            backend: AnalysisBackend::Lexicon,
            huggingface_token: None,
            huggingface_base: default_huggingface_base(),
            top_keywords: default_top_keywords(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

fn default_api_base() -> String {
    "https://www.googleapis.com/youtube/v3".to_string()
}

fn default_timedtext_base() -> String {
    "https://www.youtube.com/api/timedtext".to_string()
}

fn default_huggingface_base() -> String {
    "https://api-inference.huggingface.co".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_fetch_timeout() -> u64 {
    120
}

fn default_max_comments() -> usize {
    300
}

fn default_top_keywords() -> usize {
    15
}

impl Config {
    /// Load from `<path>.toml` (or any format the `config` crate recognizes),
    /// then apply `YT_INSIGHT__SECTION__KEY` environment overrides.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("YT_INSIGHT").separator("__"))
            .build()
            .with_context(|| format!("Failed to read config from {}", path))?;

        let mut cfg: Config = settings
            .try_deserialize()
            .context("Failed to parse configuration")?;

        if cfg.youtube.api_key.is_none() {
            cfg.youtube.api_key = std::env::var("YOUTUBE_API_KEY").ok();
        }

        Ok(cfg)
    }
}
