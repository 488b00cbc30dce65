//! Error types for the feature gate
//!
//! These errors describe failures of the remote feature service call and
//! never cross the `FeatureGate` public surface: the gate absorbs them into
//! structured results according to its fail-open/fail-closed policy.

use thiserror::Error;

/// Errors raised by the remote feature service client
#[derive(Debug, Error)]
pub enum GateError {
    /// The backend route does not exist (HTTP 404).
    ///
    /// Detected from the typed response status, never by matching substrings
    /// in error text. The gate treats this as "backend not fully deployed"
    /// and fails open for limit checks.
    #[error("Feature endpoint missing: {0}")]
    EndpointMissing(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GateError {
    /// Whether this failure should trigger the fail-open policy.
    pub fn is_endpoint_missing(&self) -> bool {
        matches!(self, GateError::EndpointMissing(_))
    }
}

/// Result type alias for convenience
pub type GateResult<T> = Result<T, GateError>;
