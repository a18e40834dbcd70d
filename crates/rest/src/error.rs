//! Error types for the sift HTTP API.
//!
//! Every failure is rendered as
//!
//! ```json
//! {"error": {"code": "DOCUMENT_NOT_FOUND", "message": "...", "details": "..."}}
//! ```
//!
//! # Error Mapping
//!
//! Errors from the persistence layer are mapped by their [`ErrorKind`]:
//!
//! | ErrorKind | HTTP Status |
//! |-----------|-------------|
//! | Validation | 400 |
//! | Unauthorized | 401 |
//! | Forbidden | 403 |
//! | NotFound | 404 |
//! | Timeout | 408 |
//! | Conflict | 409 |
//! | (body over limit) | 413 |
//! | Internal | 500 |
//! | Unavailable | 503 |

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use sift_persistence::error::{ErrorCode, ErrorKind, StorageError, ValidationError};
use tracing::error;

/// The primary error type for REST API operations.
#[derive(Debug)]
pub enum RestError {
    /// Invalid input (HTTP 400).
    BadRequest {
        /// Error code.
        code: ErrorCode,
        /// Error message.
        message: String,
        /// Optional cause, e.g. the failing element of a batch.
        details: Option<String>,
    },

    /// Missing credentials (HTTP 401).
    Unauthorized {
        /// Error code.
        code: ErrorCode,
        /// Error message.
        message: String,
    },

    /// Access denied (HTTP 403).
    Forbidden {
        /// Error code.
        code: ErrorCode,
        /// Error message.
        message: String,
    },

    /// Document or index not found (HTTP 404).
    NotFound {
        /// Error code.
        code: ErrorCode,
        /// Error message.
        message: String,
    },

    /// The backend did not answer in time (HTTP 408).
    Timeout {
        /// Error code.
        code: ErrorCode,
        /// Error message.
        message: String,
    },

    /// Document or index already exists (HTTP 409).
    Conflict {
        /// Error code.
        code: ErrorCode,
        /// Error message.
        message: String,
    },

    /// Request body over the configured limit (HTTP 413).
    PayloadTooLarge {
        /// Error code.
        code: ErrorCode,
        /// Error message.
        message: String,
    },

    /// Internal server error (HTTP 500).
    InternalError {
        /// Error code.
        code: ErrorCode,
        /// Error message.
        message: String,
    },

    /// The search backend is unreachable (HTTP 503).
    ServiceUnavailable {
        /// Error code.
        code: ErrorCode,
        /// Error message.
        message: String,
    },
}

impl RestError {
    /// A request that could not be understood.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        RestError::BadRequest {
            code: ErrorCode::InvalidRequest,
            message: message.into(),
            details: None,
        }
    }

    /// A request parameter with the wrong shape.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        RestError::BadRequest {
            code: ErrorCode::InvalidParameter,
            message: message.into(),
            details: None,
        }
    }

    /// An unexpected failure inside the gateway.
    pub fn internal(message: impl Into<String>) -> Self {
        RestError::InternalError {
            code: ErrorCode::InternalError,
            message: message.into(),
        }
    }

    /// Returns the HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            RestError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            RestError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            RestError::Forbidden { .. } => StatusCode::FORBIDDEN,
            RestError::NotFound { .. } => StatusCode::NOT_FOUND,
            RestError::Timeout { .. } => StatusCode::REQUEST_TIMEOUT,
            RestError::Conflict { .. } => StatusCode::CONFLICT,
            RestError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            RestError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Returns the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            RestError::BadRequest { code, .. }
            | RestError::Unauthorized { code, .. }
            | RestError::Forbidden { code, .. }
            | RestError::NotFound { code, .. }
            | RestError::Timeout { code, .. }
            | RestError::Conflict { code, .. }
            | RestError::PayloadTooLarge { code, .. }
            | RestError::InternalError { code, .. }
            | RestError::ServiceUnavailable { code, .. } => *code,
        }
    }

    /// Returns the client-facing message.
    pub fn message(&self) -> &str {
        match self {
            RestError::BadRequest { message, .. }
            | RestError::Unauthorized { message, .. }
            | RestError::Forbidden { message, .. }
            | RestError::NotFound { message, .. }
            | RestError::Timeout { message, .. }
            | RestError::Conflict { message, .. }
            | RestError::PayloadTooLarge { message, .. }
            | RestError::InternalError { message, .. }
            | RestError::ServiceUnavailable { message, .. } => message,
        }
    }

    fn details(&self) -> Option<&str> {
        match self {
            RestError::BadRequest { details, .. } => details.as_deref(),
            _ => None,
        }
    }

    /// Renders the error body without consuming the error.
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: ErrorDetail {
                code: self.code(),
                message: self.message().to_string(),
                details: self.details().map(str::to_string),
            },
        }
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for RestError {}

/// The JSON envelope for every error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// The error itself.
    pub error: ErrorDetail,
}

/// Code, message, and optional details of an error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    /// Stable error code.
    pub code: ErrorCode,
    /// Client-facing message.
    pub message: String,
    /// Optional cause.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

/// Joins an error with every error in its `source` chain.
fn cause_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut chain = err.to_string();
    let mut current = err.source();
    while let Some(cause) = current {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        current = cause.source();
    }
    chain
}

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        let code = err.code();
        let message = err.message();

        match err.kind() {
            ErrorKind::Validation => RestError::BadRequest {
                code,
                message,
                details: err.details(),
            },
            ErrorKind::Unauthorized => RestError::Unauthorized { code, message },
            ErrorKind::Forbidden => RestError::Forbidden { code, message },
            ErrorKind::NotFound => RestError::NotFound { code, message },
            ErrorKind::Conflict => RestError::Conflict { code, message },
            ErrorKind::Timeout => {
                error!(code = %code, cause = %cause_chain(&err), "Backend timed out");
                RestError::Timeout { code, message }
            }
            ErrorKind::Unavailable => {
                error!(code = %code, cause = %cause_chain(&err), "Backend unavailable");
                RestError::ServiceUnavailable { code, message }
            }
            ErrorKind::Internal => {
                error!(code = %code, cause = %cause_chain(&err), "Request failed");
                RestError::InternalError { code, message }
            }
        }
    }
}

impl From<ValidationError> for RestError {
    fn from(err: ValidationError) -> Self {
        RestError::from(StorageError::from(err))
    }
}

/// Result type alias for REST operations.
pub type RestResult<T> = Result<T, RestError>;

#[cfg(test)]
mod tests {
    use super::*;
    use sift_persistence::error::{BackendError, DocumentError, SearchError};

    #[test]
    fn test_validation_maps_to_400() {
        let err: RestError = ValidationError::EmptyField {
            field: "Search query",
        }
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert_eq!(err.message(), "Search query cannot be empty");
    }

    #[test]
    fn test_batch_item_carries_details() {
        let inner = ValidationError::EmptyField {
            field: "Document source",
        };
        let err: RestError = inner.at("Document", 2).into();
        let body = serde_json::to_value(err.body()).unwrap();
        assert_eq!(body["error"]["message"], "Document 2 validation failed");
        assert_eq!(body["error"]["details"], "Document source cannot be empty");
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err: RestError = StorageError::from(DocumentError::NotFound {
            index: "articles".to_string(),
            id: "a1".to_string(),
        })
        .into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), ErrorCode::DocumentNotFound);
    }

    #[test]
    fn test_backend_cause_is_not_exposed() {
        let err: RestError = StorageError::from(SearchError::Failed {
            operation: "search",
            source: BackendError::Timeout {
                backend_name: "elasticsearch".to_string(),
                message: "node 10.0.0.7 did not answer".to_string(),
            },
        })
        .into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), ErrorCode::SearchFailed);
        assert!(!err.message().contains("10.0.0.7"));
    }

    #[test]
    fn test_body_omits_empty_details() {
        let body = serde_json::to_value(RestError::invalid_request("bad").body()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"error": {"code": "INVALID_REQUEST", "message": "bad"}})
        );
    }

    #[test]
    fn test_display() {
        let err = RestError::invalid_parameter("from must be a number");
        assert_eq!(err.to_string(), "INVALID_PARAMETER: from must be a number");
    }
}
