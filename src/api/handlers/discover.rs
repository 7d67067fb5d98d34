/// Discovery API handler
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::error;
use tracing::info;
use tracing::warn;

use super::AppState;
use crate::api::types::ApiError;
use crate::api::types::ApiResponse;
use crate::errors::CourseScoutError;
use crate::models::DiscoveryRequest;
use crate::models::DiscoveryResponse;

/// Course discovery (POST /api/discover)
pub async fn discover_courses(
    State(state): State<AppState>,
    payload: Result<Json<DiscoveryRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<DiscoveryResponse>>, ApiError> {
    // Malformed bodies (e.g. a non-string query) share the invalid_request kind
    let Json(req) =
        payload.map_err(|e| ApiError(CourseScoutError::InvalidRequest(e.body_text())))?;

    info!(
        "POST /api/discover: query={:?} requirements={} hours={}",
        req.query.as_deref().map(|q| crate::cli::output::truncate_str(q, 80)),
        req.requirement_ids.len(),
        req.hours_buckets.len()
    );

    match state.discovery.discover(&req).await {
        Ok(response) => Ok(Json(ApiResponse::success(response))),
        Err(e) if e.is_client_error() => {
            warn!("Rejected discovery request: {}", e);
            Err(ApiError(e))
        }
        Err(e) => {
            error!("Error processing discovery request: {}", e);
            Err(ApiError(e))
        }
    }
}
