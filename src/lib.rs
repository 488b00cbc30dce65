//! Featuregate - client-side feature usage gate
//!
//! Answers "is action X allowed under the current subscription plan?" by
//! consulting a remote feature service, caching answers briefly, and
//! exposing convenience predicates. Failures never escape as errors: a
//! missing backend route fails open for limit checks so an incompletely
//! deployed backend does not block core flows, and every other failure
//! fails closed with a structured message.

pub mod cache;
pub mod config;
pub mod error;
pub mod gate;
pub mod remote;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

pub use crate::cache::{MemoryCache, UsageCache};
pub use crate::config::GateConfig;
pub use crate::error::{GateError, GateResult};
pub use crate::gate::{
    features, AccessResult, FeatureCheckResult, FeatureGate, FeatureProductCheck, StorageCheck,
    UploadCheck, FAIL_OPEN_LIMIT,
};
pub use crate::remote::FeatureServiceClient;

impl FeatureGate {
    /// Build a gate from configuration: a pooled HTTP client, the remote
    /// service client, and an in-memory cache with the configured TTL.
    pub fn from_config(config: &GateConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        let client = Arc::new(FeatureServiceClient::new(http_client, config));
        let cache = Arc::new(MemoryCache::with_ttl_ms(config.cache_ttl_ms));

        Ok(Self::new(client, cache))
    }
}
