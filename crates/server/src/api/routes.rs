use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use super::{handlers, media};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Media operations
        .route("/api/process", post(media::process))
        .route("/api/compare", post(media::compare))
        .route("/api/compress", post(media::compress))
        .route("/api/info", get(media::info))
        // Health (both paths kept for older clients)
        .route("/health", get(handlers::health))
        .route("/api/health", get(handlers::health))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
