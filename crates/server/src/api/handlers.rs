use axum::{extract::State, Json};
use mediadesk_core::{check_tools, HealthReport};
use std::sync::Arc;

use crate::state::AppState;

/// GET /health, GET /api/health
///
/// Always 200; a missing ffmpeg shows up as `"status": "Warning"`.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthReport> {
    Json(check_tools(&state.config().tools).await)
}
