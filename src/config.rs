//! Configuration for the feature gate
//!
//! Configuration is loaded from environment variables. A `.env` file is
//! picked up when present so local development matches deployed behavior.

use anyhow::{Context, Result};
use std::env;

/// Default cache lifetime for feature check results (5 minutes).
pub const DEFAULT_CACHE_TTL_MS: u64 = 300_000;

/// Gate configuration
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Remote feature service base URL
    pub api_url: String,
    /// API key for the remote feature service
    pub api_key: String,

    /// Cache TTL for feature check results (in milliseconds)
    pub cache_ttl_ms: u64,

    /// Timeout for remote calls (in seconds)
    pub http_timeout_secs: u64,
}

impl GateConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            api_url: env::var("FEATURE_API_URL")
                .context("FEATURE_API_URL must be set")?,
            api_key: env::var("FEATURE_API_KEY")
                .context("FEATURE_API_KEY must be set")?,

            cache_ttl_ms: env::var("CACHE_TTL_MS")
                .unwrap_or_else(|_| DEFAULT_CACHE_TTL_MS.to_string())
                .parse()
                .context("Invalid CACHE_TTL_MS")?,

            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("Invalid HTTP_TIMEOUT_SECS")?,
        })
    }

    /// Build a configuration programmatically (for embedding and tests)
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            cache_ttl_ms: DEFAULT_CACHE_TTL_MS,
            http_timeout_secs: 30,
        }
    }

    /// Override the cache TTL (in milliseconds)
    pub fn with_cache_ttl_ms(mut self, ttl_ms: u64) -> Self {
        self.cache_ttl_ms = ttl_ms;
        self
    }
}
