//! HTTP server implementation

use std::sync::Arc;

use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::AppState;
use crate::api::routes;
use crate::config::AppConfig;
use crate::database::Database;
use crate::discovery::DiscoveryService;
use crate::Result;

/// Build the application router with middleware layers
pub fn build_app(state: AppState, enable_cors: bool, max_concurrent_requests: usize) -> Router {
    let mut app = Router::new()
        .nest("/api", routes::api_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(ConcurrencyLimitLayer::new(max_concurrent_requests.max(1)));

    if enable_cors {
        info!("✅ CORS enabled");
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// Start the API server
pub async fn serve_api(
    config: &AppConfig,
    host: String,
    port: u16,
    enable_cors: bool,
) -> Result<()> {
    info!("🚀 Starting CourseScout API server...");

    // Initialize services
    let database = Arc::new(Database::from_config(config).await?);
    database.verify_schema_or_error().await?;
    let embedder = crate::embeddings::provider_from_config(config)?;
    let discovery = Arc::new(DiscoveryService::from_database(
        database,
        embedder,
        config.discovery.clone(),
    ));

    let app = build_app(
        AppState { discovery },
        enable_cors,
        config.server.max_concurrent_requests,
    );

    // Start server
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("🌐 API server listening on http://{}", addr);
    info!("Available endpoints:");
    info!("  GET  /api/health         - Health check");
    info!("  GET  /api/hours-buckets  - Workload filter options");
    info!("  POST /api/discover       - Course discovery");

    axum::serve(listener, app).await?;

    Ok(())
}
