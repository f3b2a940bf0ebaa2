use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

const REDACTED: &str = "internal error";

/// Error returned by every handler; renders as `{"error": ...}` JSON.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(&'static str),
    #[error("Server error: {details}")]
    Internal { details: String },
}

impl ApiError {
    /// Builds a 500, keeping the raw error text only when `expose` is set.
    pub fn internal(err: impl std::fmt::Display, expose: bool) -> Self {
        let details = if expose {
            err.to_string()
        } else {
            REDACTED.to_string()
        };
        ApiError::Internal { details }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::Internal { details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Server error", "details": details })),
            )
                .into_response(),
        }
    }
}
