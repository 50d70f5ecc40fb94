//! Frame ingest endpoints (/health, /ingest/*)

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::classifier;
use crate::error::ApiError;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/ingest/frame", post(ingest_frame))
        .route("/ingest/frame-with-vision", post(ingest_frame_with_vision))
}

/// A frame submission from the capture extension.
#[derive(Debug, Deserialize)]
pub struct FrameIn {
    #[serde(rename = "pageUrl")]
    pub page_url: String,
    pub ts: i64,
    #[serde(rename = "contentType")]
    pub content_type: String,
    #[serde(rename = "frameB64")]
    pub frame_b64: String,
}

#[derive(Serialize)]
struct FrameResponse {
    ok: bool,
    bytes: usize,
    #[serde(rename = "pageUrl")]
    page_url: String,
    #[serde(rename = "contentType")]
    content_type: String,
}

#[derive(Serialize)]
struct VisionFrameResponse {
    ok: bool,
    bytes: usize,
    #[serde(rename = "pageUrl")]
    page_url: String,
    #[serde(rename = "hasTrigger")]
    has_trigger: bool,
    reason: String,
}

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

fn decode_frame(frame: &FrameIn) -> Result<Vec<u8>, ApiError> {
    let data = base64::engine::general_purpose::STANDARD
        .decode(&frame.frame_b64)
        .map_err(|e| {
            eprintln!("[ingest] Failed to decode base64: {}", e);
            ApiError::BadRequest("invalid base64".to_string())
        })?;

    if data.is_empty() {
        eprintln!("[ingest] Rejected empty frame payload");
        return Err(ApiError::BadRequest("empty frame payload".to_string()));
    }

    Ok(data)
}

/// POST /ingest/frame - validate and echo metadata, no classification
async fn ingest_frame(Json(frame): Json<FrameIn>) -> Result<Json<FrameResponse>, ApiError> {
    println!(
        "[ingest] Received frame from {} at timestamp {}",
        frame.page_url, frame.ts
    );

    let data = decode_frame(&frame)?;
    println!(
        "[ingest] Decoded frame: {} bytes, type={}",
        data.len(),
        frame.content_type
    );

    println!("[ingest] Returning response for {}", frame.page_url);
    Ok(Json(FrameResponse {
        ok: true,
        bytes: data.len(),
        page_url: frame.page_url,
        content_type: frame.content_type,
    }))
}

/// POST /ingest/frame-with-vision - run the frame through the trigger
/// classifier and merge its verdict into the response
async fn ingest_frame_with_vision(
    State(state): State<Arc<AppState>>,
    Json(frame): Json<FrameIn>,
) -> Result<Json<VisionFrameResponse>, ApiError> {
    println!(
        "[ingest] Received frame for vision from {} at timestamp {}",
        frame.page_url, frame.ts
    );

    let data = decode_frame(&frame)?;
    println!("[ingest] Decoded {} bytes", data.len());

    let verdict = classifier::classify(&data, &state.vision).await;
    println!(
        "[ingest] Vision complete: hasTrigger={} error={}",
        verdict.has_trigger, verdict.error
    );

    Ok(Json(VisionFrameResponse {
        ok: true,
        bytes: data.len(),
        page_url: frame.page_url,
        has_trigger: verdict.has_trigger,
        reason: verdict.reason,
    }))
}
