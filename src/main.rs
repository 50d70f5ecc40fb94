use std::sync::Arc;

use trigger_ingest::{AppState, build_app, classifier, config::Config, vision::VisionClient};

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    println!("[ingest] Starting trigger filter ingest service");
    println!(
        "[ingest] Trigger targets: {}",
        classifier::TRIGGER_LIST.join(", ")
    );
    println!("[ingest] Vision model: {}", config.vision_model);
    println!(
        "[ingest] Allowed origins: {}",
        config.origin_list().join(", ")
    );
    if config.openai_api_key.is_empty() {
        println!("[ingest] OPENAI_API_KEY not set - vision calls will fail at invocation time");
    }

    let vision = VisionClient::new(
        &config.openai_api_key,
        &config.vision_model,
        config.vision_timeout_secs,
    );

    let addr = format!("0.0.0.0:{}", config.ingest_port);
    let state = Arc::new(AppState { config, vision });
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind to {}: {}", addr, e));

    println!("[ingest] Listening on http://{}", addr);
    axum::serve(listener, app).await.expect("Server failed");
}
