//! Mock feature service for integration testing
//!
//! Wiremock-based mocks for the feature service endpoints:
//! - GET /api/v1/features/{name}/limit - Check a feature limit
//! - GET /api/v1/features/{name}/access - Check feature access
//! - GET /api/v1/usage/features - Account-wide usage snapshot
//! - GET /api/v1/subscriptions/summary - Subscription summary
//!
//! Helpers cover the scenarios the gate's policy branches on: success,
//! missing route (404), and upstream failure (500).

use serde_json::json;
use wiremock::{
    matchers::{method, path, query_param, query_param_is_missing},
    Mock, MockServer, ResponseTemplate,
};

/// Mock feature service wrapper
pub struct MockFeatureServer {
    server: MockServer,
}

impl MockFeatureServer {
    /// Start a new mock feature service
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Get the mock server URI
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Get all received requests (for assertion in tests)
    pub async fn received_requests(&self) -> Vec<wiremock::Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// Count requests made to the limit endpoint of a feature
    pub async fn limit_request_count(&self, feature: &str) -> usize {
        let wanted = format!("/api/v1/features/{}/limit", feature);
        self.received_requests()
            .await
            .into_iter()
            .filter(|r| r.url.path() == wanted)
            .count()
    }

    /// Count requests made to the access endpoint of a feature
    pub async fn access_request_count(&self, feature: &str) -> usize {
        let wanted = format!("/api/v1/features/{}/access", feature);
        self.received_requests()
            .await
            .into_iter()
            .filter(|r| r.url.path() == wanted)
            .count()
    }

    // =========================================================================
    // GET /api/v1/features/{name}/limit
    // =========================================================================

    /// Mock a successful limit response for any usage level
    pub async fn mock_limit_success(
        &self,
        feature: &str,
        allowed: bool,
        message: &str,
        limit: u64,
        current_usage: u64,
    ) {
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/features/{}/limit", feature)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "allowed": allowed,
                "message": message,
                "limit": limit,
                "current_usage": current_usage,
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock a limit response served only when no usage override is sent
    pub async fn mock_limit_without_override(&self, feature: &str, limit: u64, current_usage: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/features/{}/limit", feature)))
            .and(query_param_is_missing("current_usage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "allowed": current_usage < limit,
                "message": "",
                "limit": limit,
                "current_usage": current_usage,
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock a limit response served only for a specific usage override
    pub async fn mock_limit_with_override(&self, feature: &str, limit: u64, override_usage: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/features/{}/limit", feature)))
            .and(query_param("current_usage", override_usage.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "allowed": override_usage < limit,
                "message": "",
                "limit": limit,
                "current_usage": override_usage,
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock a missing limit route (404)
    pub async fn mock_limit_not_found(&self, feature: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/features/{}/limit", feature)))
            .respond_with(
                ResponseTemplate::new(404).set_body_string("Not found: no such route"),
            )
            .mount(&self.server)
            .await;
    }

    /// Mock an upstream failure on the limit route (500)
    pub async fn mock_limit_server_error(&self, feature: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/features/{}/limit", feature)))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&self.server)
            .await;
    }

    // =========================================================================
    // GET /api/v1/features/{name}/access
    // =========================================================================

    /// Mock a successful access response
    pub async fn mock_access_success(&self, feature: &str, has_access: bool, message: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/features/{}/access", feature)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "has_access": has_access,
                "message": message,
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock a missing access route (404)
    pub async fn mock_access_not_found(&self, feature: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/api/v1/features/{}/access", feature)))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
            .mount(&self.server)
            .await;
    }

    // =========================================================================
    // Usage snapshot and subscription summary
    // =========================================================================

    /// Mock a successful usage snapshot response
    pub async fn mock_usage_success(&self, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/api/v1/usage/features"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Mock an upstream failure on the usage route
    pub async fn mock_usage_server_error(&self) {
        Mock::given(method("GET"))
            .and(path("/api/v1/usage/features"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&self.server)
            .await;
    }

    /// Mock a successful subscription summary response
    pub async fn mock_summary_success(&self, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/api/v1/subscriptions/summary"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Mock a missing subscription summary route (404)
    pub async fn mock_summary_not_found(&self) {
        Mock::given(method("GET"))
            .and(path("/api/v1/subscriptions/summary"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
            .mount(&self.server)
            .await;
    }
}
