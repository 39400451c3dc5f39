use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Camera not found: {0}")]
    CameraNotFound(String),

    #[error("No frame available for camera {0}")]
    NoFrameAvailable(String),

    #[error("Duplicate camera id: {0}")]
    DuplicateCamera(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Failed to subscribe to topic {0}")]
    SubscriptionFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::CameraNotFound(_) => StatusCode::NOT_FOUND,
            AppError::NoFrameAvailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE {
            tracing::error!(error_message = %message, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error_message = %message, "Request rejected");
        }

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            message,
        )
            .into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
