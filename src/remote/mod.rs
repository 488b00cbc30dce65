//! Remote feature service integration
//!
//! Provides the HTTP client for the subscription feature service.

pub mod client;
pub mod models;

pub use client::FeatureServiceClient;
pub use models::*;
