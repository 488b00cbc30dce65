//! Remote feature service data models
//!
//! Response shapes for the feature service endpoints. Every field carries
//! `#[serde(default)]` so a partial payload degrades to safe zero/false
//! values instead of failing the whole check.

use serde::{Deserialize, Serialize};

/// Response from the feature limit endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LimitResponse {
    #[serde(default)]
    pub allowed: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub current_usage: u64,
}

/// Response from the feature access endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessResponse {
    #[serde(default)]
    pub has_access: bool,
    #[serde(default)]
    pub message: String,
}
