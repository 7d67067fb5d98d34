/// API request handlers
use std::sync::Arc;

use axum::Json;

use crate::api::types::ApiResponse;
use crate::api::types::HealthResponse;
use crate::api::types::HoursBucketResponse;
use crate::discovery::DiscoveryService;
use crate::models::HoursBucket;

pub mod discover;

pub use discover::*;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub discovery: Arc<DiscoveryService>,
}

/// Health check handler
pub async fn health() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

/// Workload buckets in survey order (GET /api/hours-buckets)
pub async fn hours_buckets() -> Json<ApiResponse<Vec<HoursBucketResponse>>> {
    Json(ApiResponse::success(
        HoursBucket::ALL
            .iter()
            .map(|bucket| HoursBucketResponse {
                label: bucket.label().to_string(),
                ordinal: bucket.ordinal(),
            })
            .collect(),
    ))
}
