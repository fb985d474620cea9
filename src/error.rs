//! Error taxonomy for the loan prediction service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the prediction core and its backends.
///
/// Every failure keeps a distinguishable kind so the HTTP layer can map
/// it to the right status code without string matching.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed or out-of-range input. Fails fast, before the transform runs.
    #[error("invalid application: {0}")]
    Validation(String),

    /// Model artifact missing or corrupt. Not retried.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// The external endpoint call failed. Carries the upstream message, not retried.
    #[error("upstream endpoint error: {0}")]
    Upstream(String),

    /// Anything else that should never reach a caller as a panic.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// HTTP status code for this error kind.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::ModelUnavailable(_)
            | ServiceError::Upstream(_)
            | ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
