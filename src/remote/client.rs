//! Feature service HTTP client
//!
//! Thin reqwest wrapper for the subscription feature service. A 404 status
//! is surfaced as `GateError::EndpointMissing` so the gate can apply its
//! fail-open policy; every other unsuccessful status is an upstream error.

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument};

use crate::{
    config::GateConfig,
    error::{GateError, GateResult},
    remote::models::{AccessResponse, LimitResponse},
};

/// Feature service client
pub struct FeatureServiceClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FeatureServiceClient {
    /// Create a new feature service client
    pub fn new(client: reqwest::Client, config: &GateConfig) -> Self {
        Self {
            client,
            base_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Check a feature limit, optionally at a hypothetical usage level
    #[instrument(skip(self), fields(feature = %feature))]
    pub async fn check_feature_limit(
        &self,
        feature: &str,
        current_usage: Option<u64>,
    ) -> GateResult<LimitResponse> {
        let mut url = format!("{}/api/v1/features/{}/limit", self.base_url, feature);
        if let Some(usage) = current_usage {
            url.push_str(&format!("?current_usage={}", usage));
        }

        debug!(url = %url, "Checking feature limit");
        self.get_json(&url).await
    }

    /// Check whether the current plan grants access to a feature
    #[instrument(skip(self), fields(feature = %feature))]
    pub async fn validate_feature_access(&self, feature: &str) -> GateResult<AccessResponse> {
        let url = format!("{}/api/v1/features/{}/access", self.base_url, feature);

        debug!(url = %url, "Validating feature access");
        self.get_json(&url).await
    }

    /// Fetch the account-wide feature usage snapshot (shape backend-defined)
    #[instrument(skip(self))]
    pub async fn get_feature_usage(&self) -> GateResult<serde_json::Map<String, serde_json::Value>> {
        let url = format!("{}/api/v1/usage/features", self.base_url);

        debug!(url = %url, "Fetching feature usage");
        self.get_json(&url).await
    }

    /// Fetch the subscription summary (shape backend-defined)
    #[instrument(skip(self))]
    pub async fn get_subscription_summary(&self) -> GateResult<serde_json::Value> {
        let url = format!("{}/api/v1/subscriptions/summary", self.base_url);

        debug!(url = %url, "Fetching subscription summary");
        self.get_json(&url).await
    }

    /// Send a GET request and parse the JSON response
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> GateResult<T> {
        let response = self
            .client
            .get(url)
            .headers(self.api_key_headers())
            .send()
            .await?;

        let status = response.status();
        debug!(status = %status, "Feature service response status");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();

            if status == StatusCode::NOT_FOUND {
                debug!(body = %text, "Feature service route missing");
                return Err(GateError::EndpointMissing(url.to_string()));
            }

            error!(status = %status, body = %text, "Feature service request failed");
            return Err(GateError::Upstream(format!(
                "Feature service error {}: {}",
                status, text
            )));
        }

        let body = response.text().await?;
        debug!(body = %body, "Feature service response body");

        match serde_json::from_str(&body) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                error!(error = %e, body = %body, "Failed to parse feature service response");
                Err(GateError::Upstream(format!(
                    "Failed to parse feature service response: {}",
                    e
                )))
            }
        }
    }

    /// Build headers with API key authentication
    fn api_key_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&self.api_key) {
            headers.insert("x-api-key", value);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }
}
