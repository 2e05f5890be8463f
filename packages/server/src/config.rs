use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Fallback threshold for distinguishing real street-view imagery from
/// the provider's "not found" placeholder. Empirical: placeholder
/// images are consistently under 5 KB, real photos over 20 KB.
pub const DEFAULT_STREET_VIEW_MIN_IMAGE_BYTES: usize = 5000;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub llm_api_key: String,
    pub llm_base_url: Option<String>,
    pub llm_model: String,
    /// Street-imagery credential; absent means validation degrades to unknown
    pub street_view_api_key: Option<String>,
    pub street_view_min_image_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            llm_api_key: env::var("LLM_API_KEY").context("LLM_API_KEY must be set")?,
            llm_base_url: env::var("LLM_BASE_URL").ok(),
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            street_view_api_key: env::var("STREET_VIEW_API_KEY")
                .ok()
                .filter(|key| !key.is_empty() && key != "placeholder"),
            street_view_min_image_bytes: env::var("STREET_VIEW_MIN_IMAGE_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_STREET_VIEW_MIN_IMAGE_BYTES),
        })
    }
}
