use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use std::time::Duration;

use super::index;
use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::stream::mjpeg::{JPEG_CONTENT_TYPE, MJPEG_CONTENT_TYPE};
use crate::stream::{Camera, CameraStatus, StreamSession};

// ============================================================================
// Pages and status
// ============================================================================

/// Index page listing all cameras
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(index::render(&state.registry))
}

pub async fn health_check() -> &'static str {
    "ok"
}

/// Status of every camera, in registration order
pub async fn list_cameras(State(state): State<Arc<AppState>>) -> Json<Vec<CameraStatus>> {
    Json(state.registry.iter().map(|camera| camera.status()).collect())
}

// ============================================================================
// MJPEG streaming
// ============================================================================

/// Live MJPEG stream of one camera
pub async fn mjpeg_stream(
    State(state): State<Arc<AppState>>,
    Path(camera_id): Path<String>,
) -> Result<Response> {
    let camera = state.registry.lookup(&camera_id)?;
    Ok(stream_response(camera, state.stream_interval()))
}

/// Live MJPEG stream of the default camera
pub async fn default_stream(State(state): State<Arc<AppState>>) -> Result<Response> {
    let camera = state.registry.default_camera()?;
    Ok(stream_response(camera, state.stream_interval()))
}

/// Single JPEG snapshot of one camera
pub async fn snapshot(
    State(state): State<Arc<AppState>>,
    Path(camera_id): Path<String>,
) -> Result<Response> {
    let camera = state.registry.lookup(&camera_id)?;
    snapshot_response(&camera)
}

/// Single JPEG snapshot of the default camera
pub async fn default_snapshot(State(state): State<Arc<AppState>>) -> Result<Response> {
    let camera = state.registry.default_camera()?;
    snapshot_response(&camera)
}

/// Open a session on `camera` and stream it until the client goes away
fn stream_response(camera: Arc<Camera>, interval: Duration) -> Response {
    let session = StreamSession::new(camera, interval);

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, MJPEG_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
            (header::PRAGMA, "no-cache"),
            (header::EXPIRES, "0"),
        ],
        Body::from_stream(session.into_body_stream()),
    )
        .into_response()
}

fn snapshot_response(camera: &Camera) -> Result<Response> {
    let frame = camera
        .slot()
        .read()
        .ok_or_else(|| AppError::NoFrameAvailable(camera.id().to_string()))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, JPEG_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from(frame.data_bytes()),
    )
        .into_response())
}
