//! Environment-driven configuration for the HTTP shell.
//!
//! Values are read once at startup and mapped into the core's
//! immutable `PipelineConfig`; the core never reads process state.

use std::time::Duration;

use anyhow::{Context, Result};
use detection::PipelineConfig;

/// Server configuration assembled from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listen port. `PII_PORT`, default 8000.
    pub port: u16,

    /// Allowed CORS origins. `PII_ALLOWED_ORIGINS`, comma separated,
    /// default `*`.
    pub allowed_origins: Vec<String>,

    /// Deterministic-accept threshold. `PII_DETERMINISTIC_THRESHOLD`,
    /// default 0.85.
    pub deterministic_threshold: f32,

    /// Uncertain floor. `PII_LLM_TRIGGER_THRESHOLD`, default 0.6.
    pub llm_trigger_threshold: f32,

    /// Fallback call deadline in seconds. `PII_LLM_TIMEOUT_SECONDS`,
    /// default 15.
    pub llm_timeout_seconds: f32,

    /// Maximum input length in bytes. `PII_MAX_TEXT_LENGTH`,
    /// default 5000.
    pub max_text_length: usize,

    /// Ollama runtime base URL. `OLLAMA_BASE_URL`,
    /// default `http://127.0.0.1:11434`.
    pub ollama_base_url: String,

    /// Ollama model id. `OLLAMA_MODEL`,
    /// default `qwen2.5:1.5b-instruct-q4_0`.
    pub ollama_model: String,

    /// Optional NER sidecar base URL. `PII_NER_BASE_URL`; when unset
    /// the statistical detector is not registered.
    pub ner_base_url: Option<String>,
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Parse the fallback deadline, rejecting values `Duration` cannot
/// represent (negative, non-finite, or absurdly large) at startup.
fn parse_timeout_seconds(raw: &str) -> Result<f32> {
    let seconds: f32 = raw
        .parse()
        .context("PII_LLM_TIMEOUT_SECONDS must be a number")?;
    Duration::try_from_secs_f32(seconds)
        .context("PII_LLM_TIMEOUT_SECONDS must be a representable number of seconds")?;
    Ok(seconds)
}

impl Config {
    /// Load configuration from the environment.
    pub fn from_env() -> Result<Self> {
        let port = env_or("PII_PORT", "8000")
            .parse()
            .context("PII_PORT must be a port number")?;

        let allowed_origins: Vec<String> = env_or("PII_ALLOWED_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let allowed_origins = if allowed_origins.is_empty() {
            vec!["*".to_string()]
        } else {
            allowed_origins
        };

        Ok(Self {
            port,
            allowed_origins,
            deterministic_threshold: env_or("PII_DETERMINISTIC_THRESHOLD", "0.85")
                .parse()
                .context("PII_DETERMINISTIC_THRESHOLD must be a number")?,
            llm_trigger_threshold: env_or("PII_LLM_TRIGGER_THRESHOLD", "0.6")
                .parse()
                .context("PII_LLM_TRIGGER_THRESHOLD must be a number")?,
            llm_timeout_seconds: parse_timeout_seconds(&env_or("PII_LLM_TIMEOUT_SECONDS", "15"))?,
            max_text_length: env_or("PII_MAX_TEXT_LENGTH", "5000")
                .parse()
                .context("PII_MAX_TEXT_LENGTH must be an integer")?,
            ollama_base_url: env_or("OLLAMA_BASE_URL", "http://127.0.0.1:11434"),
            ollama_model: env_or("OLLAMA_MODEL", "qwen2.5:1.5b-instruct-q4_0"),
            ner_base_url: std::env::var("PII_NER_BASE_URL").ok(),
        })
    }

    /// Map into the core pipeline configuration.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::new()
            .with_accept_threshold(self.deterministic_threshold)
            .with_review_threshold(self.llm_trigger_threshold)
            .with_fallback_timeout(self.llm_timeout())
            .with_max_text_len(self.max_text_length)
    }

    /// Fallback deadline as a `Duration`.
    ///
    /// Unrepresentable values map to zero and fail pipeline validation
    /// instead of panicking here.
    pub fn llm_timeout(&self) -> Duration {
        Duration::try_from_secs_f32(self.llm_timeout_seconds).unwrap_or(Duration::ZERO)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            allowed_origins: vec!["*".to_string()],
            deterministic_threshold: 0.85,
            llm_trigger_threshold: 0.6,
            llm_timeout_seconds: 15.0,
            max_text_length: 5000,
            ollama_base_url: "http://127.0.0.1:11434".to_string(),
            ollama_model: "qwen2.5:1.5b-instruct-q4_0".to_string(),
            ner_base_url: None,
        }
    }
}
