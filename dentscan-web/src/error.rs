//! Error types for dentscan-web JSON endpoints

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dentscan_common::GateReport;
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or expired session (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Request body over the configured limit (413)
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// File extension not on the allow-list (415)
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    /// Image failed the tooth-likeness gate (422)
    ///
    /// `gate` is `None` when the upload could not be decoded.
    #[error("Not a tooth image: {message}")]
    NotATooth {
        message: String,
        gate: Option<GateReport>,
    },

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// HTTP status and stable error code
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            ApiError::UnsupportedType(_) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_TYPE"),
            ApiError::NotATooth { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "NOT_A_TOOTH"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }

    /// User-facing message without the variant prefix
    pub fn message(&self) -> String {
        match self {
            ApiError::Unauthorized(msg)
            | ApiError::BadRequest(msg)
            | ApiError::PayloadTooLarge(msg)
            | ApiError::UnsupportedType(msg)
            | ApiError::Internal(msg) => msg.clone(),
            ApiError::NotATooth { message, .. } => message.clone(),
            ApiError::Io(err) => err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();

        let mut error = json!({
            "code": error_code,
            "message": self.message(),
        });
        if let ApiError::NotATooth {
            gate: Some(report), ..
        } = &self
        {
            error["gate"] = json!(report);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
