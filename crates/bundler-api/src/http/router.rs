//! Axum router configuration with middleware.
//!
//! All API routes are under `/api/v1/`. Middleware: CORS, tracing.

use axum::Router;
use axum::extract::State;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route(
            "/cart-transform/run",
            post(handlers::cart_transform::run_cart_transform),
        )
        .route("/bundles", get(handlers::bundle::list_bundles))
        .route("/bundles/{id}", get(handlers::bundle::get_bundle));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Liveness plus a database round-trip.
async fn health_check(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    let database = match ping_database(&state).await {
        Ok(()) => "ok".to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "health check database ping failed");
            "unavailable".to_string()
        }
    };

    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "database": database,
    }))
}

async fn ping_database(state: &AppState) -> Result<(), bundler_types::error::RepositoryError> {
    use bundler_core::repository::bundle::BundleRepository;

    state.bundle_repo.list(Some(1)).await.map(|_| ())
}
