use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Submit
        .route("/", post(handlers::submit_form))
        .route("/analyze", post(handlers::submit_json))
        // Status and results
        .route("/check_status", get(handlers::check_status))
        .route("/results", get(handlers::get_results))
        // Committed artifact files
        .route("/artifacts/:job_id/:file", get(handlers::get_artifact))
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
