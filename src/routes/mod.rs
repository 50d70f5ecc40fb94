pub mod ingest;

use axum::Router;
use std::sync::Arc;

use crate::AppState;

/// Build all routes for the service
pub fn build_routes() -> Router<Arc<AppState>> {
    Router::new().merge(ingest::routes())
}
