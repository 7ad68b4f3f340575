//! Axum router configuration with middleware.
//!
//! API routes live under `/api/`. Middleware: CORS, tracing.
//!
//! The browser front end is served from `server.static_dir` when that
//! directory exists. API routes and `/health` take priority; everything else
//! falls through to the static files (`index.html` for directories). If the
//! directory does not exist, only the API is served.

use std::path::Path;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let static_dir = state.config.server.static_dir.clone();

    let api_routes = Router::new()
        .route("/login", post(handlers::login::login))
        .route(
            "/collection",
            get(handlers::collection::get_collection).post(handlers::collection::update_collection),
        )
        .route("/provision", post(handlers::provision::run_provision));

    let mut router = Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health_check));

    // Layers added below wrap the static fallback as well.
    if Path::new(&static_dir).is_dir() {
        router = router.fallback_service(ServeDir::new(&static_dir));
        tracing::info!(path = %static_dir, "static file serving enabled");
    } else {
        tracing::info!(path = %static_dir, "static directory not found, serving API only");
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
