use anyhow::{Context, Result};

pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
/// Job description used when the start form has no `job_description` field.
/// A field sent empty is kept as an empty string.
pub const DEFAULT_JOB_DESCRIPTION: &str = "Software Engineer - Python";

/// Application configuration loaded from environment variables.
/// Every variable is optional; a missing API key is a valid state that
/// surfaces at call time instead of at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: Option<String>,
    pub gemini_api_url: String,
    pub port: u16,
    pub rust_log: String,
    pub max_upload_mb: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            google_api_key: std::env::var("GOOGLE_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            gemini_api_url: std::env::var("GEMINI_API_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_API_URL.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_upload_mb: std::env::var("MAX_UPLOAD_MB")
                .unwrap_or_else(|_| "200".to_string())
                .parse::<usize>()
                .context("MAX_UPLOAD_MB must be a whole number of megabytes")?,
        })
    }

    /// Picks the credential for a call: a non-empty key typed by the user wins,
    /// otherwise the key from the environment, otherwise an empty string.
    pub fn resolve_credential(&self, supplied: Option<&str>) -> String {
        supplied
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(String::from)
            .or_else(|| self.google_api_key.clone())
            .unwrap_or_default()
    }

    pub fn has_credential(&self) -> bool {
        self.google_api_key.is_some()
    }
}
