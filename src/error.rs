//! Error types for the SkillForge ML engine
//!
//! The scoring core is total and never fails; everything here belongs to the
//! service shell around it:
//! - `thiserror` for the error definitions
//! - configuration and request variants with source chaining
//! - HTTP status code mapping for API responses

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::borrow::Cow;
use thiserror::Error;

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the ML engine
#[derive(Debug, Error)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    #[error("Configuration error: {message}")]
    Config {
        message: Cow<'static, str>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidConfig {
        key: &'static str,
        message: Cow<'static, str>,
    },

    // ========================================================================
    // Request Errors
    // ========================================================================
    #[error("Bad request: {message}")]
    BadRequest { message: Cow<'static, str> },

    #[error("Request validation failed: {message}")]
    Validation { message: Cow<'static, str> },

    #[error("Unsupported media type: {message}")]
    UnsupportedMediaType { message: Cow<'static, str> },

    #[error("Payload too large: {message}")]
    PayloadTooLarge { message: Cow<'static, str> },

    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    // ========================================================================
    // Runtime Errors
    // ========================================================================
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error")]
    Internal {
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Create a bad request error
    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Error::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Error::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Error::Timeout { .. } => StatusCode::REQUEST_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config { .. } | Error::InvalidConfig { .. } => "CONFIG_ERROR",
            Error::BadRequest { .. } => "BAD_REQUEST",
            Error::Validation { .. } => "VALIDATION_ERROR",
            Error::UnsupportedMediaType { .. } => "UNSUPPORTED_MEDIA_TYPE",
            Error::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            Error::Timeout { .. } => "TIMEOUT",
            Error::Io(_) | Error::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

// ============================================================================
// Error Response for API
// ============================================================================

/// API error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // Don't expose internal error details
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {:?}", self);
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

// ============================================================================
// From implementations for external error types
// ============================================================================

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // Well-formed JSON that does not fit the request shape
            JsonRejection::JsonDataError(err) => Error::validation(err.body_text()),
            JsonRejection::MissingJsonContentType(err) => Error::UnsupportedMediaType {
                message: err.body_text().into(),
            },
            // Body exceeded the configured size limit while buffering
            other if other.status() == StatusCode::PAYLOAD_TOO_LARGE => Error::PayloadTooLarge {
                message: other.body_text().into(),
            },
            other => Error::bad_request(other.body_text()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            Error::bad_request("invalid").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::validation("missing field `userId`").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            Error::PayloadTooLarge {
                message: "length limit exceeded".into()
            }
            .status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            Error::Timeout { timeout_ms: 30_000 }.status_code(),
            StatusCode::REQUEST_TIMEOUT
        );
        assert_eq!(
            Error::Internal { source: None }.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::InvalidConfig {
                key: "API_PORT",
                message: "must be non-zero".into()
            }
            .error_code(),
            "CONFIG_ERROR"
        );
        assert_eq!(Error::validation("bad").error_code(), "VALIDATION_ERROR");
        assert_eq!(
            Error::Timeout { timeout_ms: 100 }.error_code(),
            "TIMEOUT"
        );
        assert_eq!(
            Error::from(std::io::Error::other("bind failed")).error_code(),
            "INTERNAL_ERROR"
        );
    }

    #[tokio::test]
    async fn test_timeout_response_uses_error_body() {
        let response = Error::Timeout { timeout_ms: 250 }.into_response();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "TIMEOUT");
        assert_eq!(body["error"]["message"], "Request timed out after 250ms");
    }

    #[tokio::test]
    async fn test_internal_response_hides_details() {
        let response = Error::Internal {
            source: Some("secret detail".into()),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!text.contains("secret detail"));
    }
}
