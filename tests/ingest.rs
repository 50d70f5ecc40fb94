//! Integration tests driving the router directly, no network.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use base64::Engine;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use trigger_ingest::{AppState, build_app, config::Config, vision::VisionClient};

fn test_config() -> Config {
    Config {
        livekit_url: String::new(),
        livekit_api_key: String::new(),
        livekit_api_secret: String::new(),
        openai_api_key: String::new(),
        anthropic_api_key: String::new(),
        vision_model: "gpt-4o-mini".to_string(),
        vision_timeout_secs: 5,
        allowed_origins: "*".to_string(),
        ingest_port: 0,
    }
}

fn test_app() -> Router {
    let config = test_config();
    let vision = VisionClient::new("", &config.vision_model, config.vision_timeout_secs);
    build_app(Arc::new(AppState { config, vision }))
}

fn frame_body(frame_b64: &str) -> Value {
    json!({
        "pageUrl": "https://www.tiktok.com/@user/video/123",
        "ts": 0,
        "contentType": "image/jpeg",
        "frameB64": frame_b64,
    })
}

async fn get(app: Router, path: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .uri(path)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    read_json(response).await
}

async fn post_json(app: Router, path: &str, body: &Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    read_json(response).await
}

async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(test_app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
}

#[tokio::test]
async fn test_ingest_accepts_frame() {
    // The literal 4-byte fake jpeg payload from the capture extension
    let data = base64::engine::general_purpose::STANDARD.encode(b"\xff\xd8\xff\xd9");
    let (status, body) = post_json(test_app(), "/ingest/frame", &frame_body(&data)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["bytes"], json!(4));
    assert_eq!(body["pageUrl"], json!("https://www.tiktok.com/@user/video/123"));
    assert_eq!(body["contentType"], json!("image/jpeg"));
}

#[tokio::test]
async fn test_ingest_reports_decoded_byte_count() {
    let payload = vec![0xabu8; 64];
    let data = base64::engine::general_purpose::STANDARD.encode(&payload);
    let (status, body) = post_json(test_app(), "/ingest/frame", &frame_body(&data)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bytes"], json!(64));
}

#[tokio::test]
async fn test_ingest_rejects_invalid_base64() {
    let (status, body) =
        post_json(test_app(), "/ingest/frame", &frame_body("!!not base64!!")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], json!("invalid base64"));
}

#[tokio::test]
async fn test_ingest_rejects_empty_payload() {
    // "" is valid base64 but decodes to zero bytes, which the ingest
    // contract rejects rather than echoing bytes == 0
    let (status, body) = post_json(test_app(), "/ingest/frame", &frame_body("")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], json!("empty frame payload"));
}

#[tokio::test]
async fn test_vision_ingest_rejects_empty_payload() {
    let (status, body) =
        post_json(test_app(), "/ingest/frame-with-vision", &frame_body("")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], json!("empty frame payload"));
}

#[tokio::test]
async fn test_ingest_is_idempotent() {
    let data = base64::engine::general_purpose::STANDARD.encode(b"\xff\xd8\xff\xd9");
    let body = frame_body(&data);

    let (_, first) = post_json(test_app(), "/ingest/frame", &body).await;
    let (_, second) = post_json(test_app(), "/ingest/frame", &body).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_vision_ingest_rejects_invalid_base64() {
    let (status, body) = post_json(
        test_app(),
        "/ingest/frame-with-vision",
        &frame_body("@@@"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_vision_ingest_returns_error_verdict_for_undecodable_frame() {
    // Decode failure is terminal before any remote call, so this runs
    // offline: HTTP 200 with the failure folded into the verdict fields.
    let data = base64::engine::general_purpose::STANDARD.encode(b"\xff\xd8\xff\xd9");
    let (status, body) =
        post_json(test_app(), "/ingest/frame-with-vision", &frame_body(&data)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["bytes"], json!(4));
    assert_eq!(body["hasTrigger"], json!(false));
    let reason = body["reason"].as_str().unwrap();
    assert!(!reason.is_empty());
    assert!(reason.contains("Failed to decode image"));
}
