//! Error types for magicmap-ui

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
///
/// Messages are shown to the user as-is.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Conflict (409), e.g. a generation is already running
    #[error("{0}")]
    Conflict(String),

    /// Generative service unreachable from here (503)
    #[error("{0}")]
    Offline(String),

    /// Generative service failed or answered garbage (502)
    #[error("{0}")]
    Upstream(String),

    /// Internal server error (500)
    #[error("{0}")]
    Internal(String),

    #[error("Common error: {0}")]
    Common(#[from] magicmap_common::Error),

    #[error("Tree error: {0}")]
    Tree(#[from] magicmap_tv::TreeError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            ApiError::Offline(msg) => (StatusCode::SERVICE_UNAVAILABLE, "OFFLINE", msg),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            ApiError::Common(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "COMMON_ERROR",
                err.to_string(),
            ),
            ApiError::Tree(ref err) => {
                use magicmap_tv::TreeError;
                let (status, code) = match err {
                    TreeError::UnknownNode(_) => (StatusCode::NOT_FOUND, "UNKNOWN_NODE"),
                    TreeError::NotBuilt => (StatusCode::CONFLICT, "NO_TREE"),
                    TreeError::MissingName { .. } | TreeError::Malformed { .. } => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "MALFORMED_TREE")
                    }
                    TreeError::Export(_) | TreeError::Image(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "EXPORT_ERROR")
                    }
                };
                (status, code, err.to_string())
            }
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
