//! Error taxonomy shared by every core operation.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use devwarden_core::DatabaseError;

/// Result type alias for console operations.
pub type Result<T> = std::result::Result<T, ConsoleError>;

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// Bad or missing credentials or token.
    #[error("Unauthorized")]
    Unauthorized,

    /// The device is blocked.
    #[error("Device {0} is blocked")]
    Forbidden(i64),

    /// Malformed body or missing required field.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Operation on an unknown device.
    #[error("Device {0} not found")]
    NotFound(i64),

    /// Persistent store failure.
    #[error("Internal failure: {0}")]
    Internal(#[from] DatabaseError),
}

impl ConsoleError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand back to the caller.
    pub fn public_message(&self) -> String {
        match self {
            Self::Unauthorized => "Unauthorized".into(),
            Self::Forbidden(_) => "Device is blocked".into(),
            Self::InvalidRequest(reason) => reason.clone(),
            Self::NotFound(_) => "Device not found".into(),
            Self::Internal(_) => "Internal server error".into(),
        }
    }
}

impl IntoResponse for ConsoleError {
    fn into_response(self) -> Response {
        if let Self::Internal(e) = &self {
            error!(error = %e, "Store operation failed");
        }
        let body = json!({ "success": false, "error": self.public_message() });
        (self.status(), Json(body)).into_response()
    }
}
