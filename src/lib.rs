pub mod classifier;
pub mod config;
pub mod error;
pub mod frame_buffer;
pub mod routes;
pub mod vision;

use axum::Router;
use axum::http::{HeaderValue, Method};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use config::Config;
use vision::VisionClient;

pub struct AppState {
    pub config: Config,
    pub vision: VisionClient,
}

/// Assemble the service router with CORS applied.
pub fn build_app(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config);
    routes::build_routes().layer(cors).with_state(state)
}

/// CORS: configurable origin allow-list, POST/GET/OPTIONS only, all
/// headers, credentials disabled.
fn cors_layer(config: &Config) -> CorsLayer {
    let origins = config.origin_list();
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|o| o.parse::<HeaderValue>().ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
        .allow_headers(Any)
}
