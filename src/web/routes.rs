use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::state::AppState;

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    // Id-less routes serve the default camera of single-camera deployments
    let stream_routes = Router::new()
        .route("/stream", get(handlers::default_stream))
        .route("/stream/:camera_id", get(handlers::mjpeg_stream))
        .route("/snapshot", get(handlers::default_snapshot))
        .route("/snapshot/:camera_id", get(handlers::snapshot));

    let api_routes = Router::new().route("/cameras", get(handlers::list_cameras));

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        .merge(stream_routes)
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
