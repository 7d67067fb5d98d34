//! API route definitions

use axum::routing::get;
use axum::routing::post;
use axum::Router;

use super::handlers::AppState;
use super::handlers::{
    self,
};

/// Create RESTful API router
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Filter options
        .route("/hours-buckets", get(handlers::hours_buckets))
        // Discovery
        .route("/discover", post(handlers::discover_courses))
        .with_state(state)
}
