//! Media API handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use mediadesk_core::{CompareResult, MediaInfo, ProcessRequest};
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub output: String,
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub original: String,
    pub processed: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CompressRequest {
    pub input: String,
    pub output: String,
    pub bitrate: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompressResponse {
    pub output: String,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct InfoParams {
    #[serde(default)]
    pub path: Option<String>,
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|_| ApiError::bad_request("Invalid request body"))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/process
///
/// Transcode a file, or with `dry_run` return the ffmpeg command instead.
pub async fn process(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Result<Json<ProcessResponse>, ApiError> {
    let mut req = json_body(payload)?;
    if req.input.is_empty() {
        return Err(ApiError::bad_request("Input path is required"));
    }

    req.input = state.resolve(&req.input).to_string_lossy().into_owned();
    if !req.output.is_empty() {
        req.output = state.resolve(&req.output).to_string_lossy().into_owned();
    }

    let output = state
        .engine()
        .process_media(&req, None)
        .await
        .map_err(|e| ApiError::from_media("Processing failed", e))?;

    Ok(Json(ProcessResponse { output }))
}

/// POST /api/compare
pub async fn compare(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CompareRequest>, JsonRejection>,
) -> Result<Json<CompareResult>, ApiError> {
    let req = json_body(payload)?;
    if req.original.is_empty() || req.processed.is_empty() {
        return Err(ApiError::bad_request(
            "Both original and processed paths are required",
        ));
    }

    let result = state
        .engine()
        .compare_media(&state.resolve(&req.original), &state.resolve(&req.processed))
        .await
        .map_err(|e| ApiError::from_media("Comparison failed", e))?;

    Ok(Json(result))
}

/// POST /api/compress
pub async fn compress(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CompressRequest>, JsonRejection>,
) -> Result<Json<CompressResponse>, ApiError> {
    let req = json_body(payload)?;
    if req.input.is_empty() {
        return Err(ApiError::bad_request("Input path is required"));
    }
    if req.bitrate.is_empty() {
        return Err(ApiError::bad_request("Bitrate is required"));
    }

    let input = state.resolve(&req.input);
    let output = (!req.output.is_empty()).then(|| state.resolve(&req.output));

    let written = state
        .engine()
        .compress_media(&input, output.as_deref(), &req.bitrate)
        .await
        .map_err(|e| ApiError::from_media("Compression failed", e))?;

    Ok(Json(CompressResponse {
        output: written.to_string_lossy().into_owned(),
        status: "success".to_string(),
        message: "Video compressed successfully".to_string(),
    }))
}

/// GET /api/info?path=<path>
pub async fn info(
    State(state): State<Arc<AppState>>,
    Query(params): Query<InfoParams>,
) -> Result<Json<MediaInfo>, ApiError> {
    let path = params
        .path
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing path parameter"))?;

    let info = state
        .engine()
        .get_media_info(&state.resolve(&path))
        .await
        .map_err(|e| ApiError::from_media("Failed to get media info", e))?;

    Ok(Json(info))
}
