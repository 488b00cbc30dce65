//! Feature gate orchestration
//!
//! Mediates between callers and the remote feature service: cache-first
//! reads, explicit-usage bypass, and a fail-open/fail-closed policy so no
//! error ever escapes to the caller. Callers decide how to render the
//! `message` carried in each result.

use std::sync::Arc;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use crate::{
    cache::{keys, UsageCache},
    error::GateError,
    remote::FeatureServiceClient,
};

/// Synthetic limit returned when the backend route is missing and the gate
/// fails open.
pub const FAIL_OPEN_LIMIT: u64 = 999_999;

/// Well-known feature names understood by the backend
pub mod features {
    pub const MAX_LISTINGS: &str = "max_listings";
    pub const FEATURED_LISTINGS: &str = "featured_listings";
    pub const STORAGE_GB: &str = "storage_gb";
    pub const API_ACCESS: &str = "api_access";
    pub const CUSTOM_BRANDING: &str = "custom_branding";
}

/// Outcome of a feature limit check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureCheckResult {
    pub allowed: bool,
    pub message: String,
    pub limit: u64,
    pub usage: u64,
    /// Always `limit - usage` clamped at zero; never fetched independently.
    pub remaining: u64,
}

impl FeatureCheckResult {
    /// Build a result, deriving `remaining` from limit and usage
    pub fn new(allowed: bool, message: impl Into<String>, limit: u64, usage: u64) -> Self {
        Self {
            allowed,
            message: message.into(),
            limit,
            usage,
            remaining: limit.saturating_sub(usage),
        }
    }

    fn fail_open() -> Self {
        Self::new(
            true,
            "Feature limits are not configured yet; allowing by default.",
            FAIL_OPEN_LIMIT,
            0,
        )
    }

    fn fail_closed() -> Self {
        Self::new(
            false,
            "Unable to verify your feature limits right now. Please try again.",
            0,
            0,
        )
    }
}

/// Outcome of a feature access check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessResult {
    pub has_access: bool,
    pub message: String,
}

impl AccessResult {
    fn fail_closed() -> Self {
        Self {
            has_access: false,
            message: "Unable to verify feature access. Please check your subscription."
                .to_string(),
        }
    }
}

/// Result of [`FeatureGate::can_upload_product`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCheck {
    pub can_upload: bool,
    pub message: String,
    pub remaining: u64,
}

/// Result of [`FeatureGate::can_feature_product`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureProductCheck {
    pub can_feature: bool,
    pub message: String,
    pub remaining: u64,
}

/// Result of [`FeatureGate::check_storage_limit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageCheck {
    pub within_limit: bool,
    pub message: String,
    pub remaining: u64,
}

/// Feature gate
///
/// Owns the remote client and an injected cache. All operations are
/// infallible from the caller's perspective: failures surface as structured
/// results per the fail-open/fail-closed policy.
pub struct FeatureGate {
    client: Arc<FeatureServiceClient>,
    cache: Arc<dyn UsageCache>,
}

impl FeatureGate {
    /// Create a gate from an already-built client and cache
    pub fn new(client: Arc<FeatureServiceClient>, cache: Arc<dyn UsageCache>) -> Self {
        Self { client, cache }
    }

    /// Check whether `feature` may be used under the current plan.
    ///
    /// With `current_usage = None` the cached answer is served when fresh.
    /// Supplying an explicit usage level bypasses the cache read entirely
    /// (the caller is asking about a hypothetical level, so a stale cached
    /// answer would be wrong); the fresh result is still written back.
    #[instrument(skip(self), fields(feature = %feature))]
    pub async fn check_feature_limit(
        &self,
        feature: &str,
        current_usage: Option<u64>,
    ) -> FeatureCheckResult {
        let cache_key = keys::feature_limit(feature);

        if current_usage.is_none() {
            if let Some(cached) = self.read_cached::<FeatureCheckResult>(&cache_key).await {
                debug!("Cache hit for feature limit");
                return cached;
            }
            debug!("Cache miss for feature limit, fetching");
        } else {
            debug!("Explicit usage supplied, bypassing cache");
        }

        match self.client.check_feature_limit(feature, current_usage).await {
            Ok(resp) => {
                let result =
                    FeatureCheckResult::new(resp.allowed, resp.message, resp.limit, resp.current_usage);
                self.write_cached(&cache_key, &result).await;
                result
            }
            Err(GateError::EndpointMissing(url)) => {
                warn!(url = %url, "Feature limit endpoint missing, failing open");
                FeatureCheckResult::fail_open()
            }
            Err(e) => {
                error!(error = %e, "Feature limit check failed, failing closed");
                FeatureCheckResult::fail_closed()
            }
        }
    }

    /// Check whether the current plan grants access to `feature`.
    ///
    /// Fails closed on every error, including a missing endpoint: access
    /// flags gate paid features, so an unreachable backend must not unlock
    /// them.
    #[instrument(skip(self), fields(feature = %feature))]
    pub async fn validate_feature_access(&self, feature: &str) -> AccessResult {
        let cache_key = keys::feature_access(feature);

        if let Some(cached) = self.read_cached::<AccessResult>(&cache_key).await {
            debug!("Cache hit for feature access");
            return cached;
        }
        debug!("Cache miss for feature access, fetching");

        match self.client.validate_feature_access(feature).await {
            Ok(resp) => {
                let result = AccessResult {
                    has_access: resp.has_access,
                    message: resp.message,
                };
                self.write_cached(&cache_key, &result).await;
                result
            }
            Err(e) => {
                error!(error = %e, "Feature access check failed, failing closed");
                AccessResult::fail_closed()
            }
        }
    }

    /// Fetch the account-wide usage snapshot; empty on any failure
    #[instrument(skip(self))]
    pub async fn get_feature_usage(&self) -> serde_json::Map<String, serde_json::Value> {
        if let Some(cached) = self.read_cached(keys::FEATURE_USAGE).await {
            debug!("Cache hit for feature usage");
            return cached;
        }

        match self.client.get_feature_usage().await {
            Ok(usage) => {
                self.write_cached(keys::FEATURE_USAGE, &usage).await;
                usage
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch feature usage");
                serde_json::Map::new()
            }
        }
    }

    /// Fetch the subscription summary; `None` on any failure
    #[instrument(skip(self))]
    pub async fn get_subscription_summary(&self) -> Option<serde_json::Value> {
        if let Some(cached) = self.read_cached(keys::SUBSCRIPTION_SUMMARY).await {
            debug!("Cache hit for subscription summary");
            return Some(cached);
        }

        match self.client.get_subscription_summary().await {
            Ok(summary) => {
                self.write_cached(keys::SUBSCRIPTION_SUMMARY, &summary).await;
                Some(summary)
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch subscription summary");
                None
            }
        }
    }

    /// Drop every cached answer; the next call per key refetches
    pub async fn clear_cache(&self) {
        debug!("Clearing usage cache");
        self.cache.clear().await;
    }

    // =========================================================================
    // Convenience predicates
    // =========================================================================

    /// Whether another product listing may be created
    pub async fn can_upload_product(&self) -> UploadCheck {
        let result = self.check_feature_limit(features::MAX_LISTINGS, None).await;
        UploadCheck {
            can_upload: result.allowed,
            message: result.message,
            remaining: result.remaining,
        }
    }

    /// Whether another product may be featured
    pub async fn can_feature_product(&self) -> FeatureProductCheck {
        let result = self
            .check_feature_limit(features::FEATURED_LISTINGS, None)
            .await;
        FeatureProductCheck {
            can_feature: result.allowed,
            message: result.message,
            remaining: result.remaining,
        }
    }

    /// Whether the plan includes API access
    pub async fn has_api_access(&self) -> AccessResult {
        self.validate_feature_access(features::API_ACCESS).await
    }

    /// Whether the plan includes custom branding
    pub async fn has_custom_branding(&self) -> AccessResult {
        self.validate_feature_access(features::CUSTOM_BRANDING).await
    }

    /// Whether storage usage is within the plan limit, optionally at a
    /// hypothetical usage level in gigabytes
    pub async fn check_storage_limit(&self, current_usage_gb: Option<u64>) -> StorageCheck {
        let result = self
            .check_feature_limit(features::STORAGE_GB, current_usage_gb)
            .await;
        StorageCheck {
            within_limit: result.allowed,
            message: result.message,
            remaining: result.remaining,
        }
    }

    // =========================================================================
    // Upgrade prompt
    // =========================================================================

    /// Build the upgrade message for a feature and hand it to `on_upgrade`
    /// as `(message, feature_name)`. Without a callback the message is
    /// emitted as a warning, the library analog of a blocking alert.
    pub fn show_upgrade_prompt(&self, feature: &str, on_upgrade: Option<&dyn Fn(&str, &str)>) {
        let message = format!(
            "You've reached your {} limit. Upgrade your subscription to get more!",
            display_name(feature)
        );

        match on_upgrade {
            Some(callback) => callback(&message, feature),
            None => warn!(feature = %feature, "{}", message),
        }
    }

    // =========================================================================
    // Cache helpers
    // =========================================================================

    async fn read_cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.cache.get(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                // A stale entry written by an older build; treat as a miss.
                debug!(key = %key, error = %e, "Discarding undeserializable cache entry");
                None
            }
        }
    }

    async fn write_cached<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.cache.set(key, raw).await,
            Err(e) => debug!(key = %key, error = %e, "Skipping cache write"),
        }
    }
}

/// Human-readable display name for a feature; unknown names pass through
pub fn display_name(feature: &str) -> &str {
    match feature {
        features::MAX_LISTINGS => "Product Listings",
        features::FEATURED_LISTINGS => "Featured Products",
        features::STORAGE_GB => "Storage Space",
        features::API_ACCESS => "API Access",
        features::CUSTOM_BRANDING => "Custom Branding",
        other => other,
    }
}
