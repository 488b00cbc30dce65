//! Usage cache
//!
//! Time-expiring storage for the most recent remote answer per cache key.
//! The cache is injected into the gate rather than held as a global, so
//! tests and embedders control its lifetime and isolation.

pub mod memory;

pub use self::memory::MemoryCache;

use async_trait::async_trait;

/// Cache abstraction used by the feature gate.
///
/// Values are JSON strings; (de)serialization happens at the gate layer so
/// implementations stay object-safe and payload-agnostic.
#[async_trait]
pub trait UsageCache: Send + Sync {
    /// Return the stored value for `key` if present and unexpired.
    async fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any existing entry and
    /// restarting its lifetime.
    async fn set(&self, key: &str, value: String);

    /// Remove all entries unconditionally.
    async fn clear(&self);
}

/// Cache key builders
///
/// One key per remote operation; limit and access checks are further keyed
/// by feature name.
pub mod keys {
    /// Key for a feature limit check result
    pub fn feature_limit(feature: &str) -> String {
        format!("feature_limit_{}", feature)
    }

    /// Key for a feature access check result
    pub fn feature_access(feature: &str) -> String {
        format!("feature_access_{}", feature)
    }

    /// Key for the account-wide usage snapshot
    pub const FEATURE_USAGE: &str = "feature_usage";

    /// Key for the subscription summary
    pub const SUBSCRIPTION_SUMMARY: &str = "subscription_summary";
}
