use std::path::PathBuf;

use anyhow::{bail, Context, Result};

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Application configuration loaded from environment variables.
/// Startup fails if the Gemini credential is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub llm_timeout_secs: u64,
    pub data_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub max_sessions: usize,
    pub session_idle_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let gemini_api_key = require_env("GEMINI_API_KEY")?;
        if gemini_api_key.trim().is_empty() {
            bail!("GEMINI_API_KEY is set but empty");
        }

        Ok(Config {
            gemini_api_key,
            gemini_model: env_or("GEMINI_MODEL_NAME", DEFAULT_GEMINI_MODEL),
            gemini_base_url: env_or("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            llm_timeout_secs: env_or("LLM_TIMEOUT_SECS", "120")
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            data_dir: PathBuf::from(env_or("DATA_DIR", "candidate_data")),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", "10485760")
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            max_sessions: env_or("MAX_SESSIONS", "1000")
                .parse::<usize>()
                .context("MAX_SESSIONS must be a whole number")?,
            session_idle_secs: env_or("SESSION_IDLE_SECS", "3600")
                .parse::<u64>()
                .context("SESSION_IDLE_SECS must be a whole number of seconds")?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    #[cfg(test)]
    pub fn for_tests(data_dir: impl Into<PathBuf>) -> Self {
        Config {
            gemini_api_key: "test-key".to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            llm_timeout_secs: 5,
            data_dir: data_dir.into(),
            max_upload_bytes: 1024 * 1024,
            max_sessions: 100,
            session_idle_secs: 3600,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
