//! JSON request body extractor.
//!
//! Parses request bodies into typed request DTOs and renders every failure
//! in the standard error envelope instead of axum's plain-text rejection.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use sift_persistence::error::ErrorCode;

use crate::error::RestError;

/// Axum extractor for JSON request bodies.
///
/// A missing `Content-Type` is treated as JSON. Any other non-JSON media
/// type, an unreadable body, or JSON that does not match `T` is rejected
/// with 400 `INVALID_REQUEST`; a body over the limit gets 413.
///
/// # Example
///
/// ```rust,ignore
/// use sift_rest::extractors::JsonBody;
/// use sift_rest::requests::UpdateDocumentRequest;
///
/// async fn update(JsonBody(body): JsonBody<UpdateDocumentRequest>) {
///     println!("{} fields", body.source.len());
/// }
/// ```
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T> JsonBody<T> {
    /// Consumes the extractor and returns the parsed body.
    pub fn into_inner(self) -> T {
        self.0
    }
}

/// Error type for body extraction failures.
#[derive(Debug)]
pub enum JsonBodyRejection {
    /// The body is not JSON according to its `Content-Type`.
    UnsupportedMediaType(String),
    /// The body is larger than the configured limit.
    TooLarge(String),
    /// The body could not be read.
    Unreadable(String),
    /// The body is not valid JSON for the expected shape.
    InvalidJson(String),
}

impl From<JsonBodyRejection> for RestError {
    fn from(rejection: JsonBodyRejection) -> Self {
        match rejection {
            JsonBodyRejection::UnsupportedMediaType(ct) => {
                RestError::invalid_request(format!("Unsupported content type: {}", ct))
            }
            JsonBodyRejection::TooLarge(msg) => RestError::PayloadTooLarge {
                code: ErrorCode::InvalidRequest,
                message: msg,
            },
            JsonBodyRejection::Unreadable(msg) => {
                RestError::invalid_request(format!("Failed to read request body: {}", msg))
            }
            JsonBodyRejection::InvalidJson(msg) => {
                RestError::invalid_request(format!("Invalid request body: {}", msg))
            }
        }
    }
}

impl IntoResponse for JsonBodyRejection {
    fn into_response(self) -> Response {
        RestError::from(self).into_response()
    }
}

/// Returns true when `content_type` names a JSON media type
/// (`application/json` or any `+json` suffix).
fn is_json(content_type: &str) -> bool {
    content_type
        .parse::<mime::Mime>()
        .map(|m| {
            m.type_() == mime::APPLICATION
                && (m.subtype() == mime::JSON || m.suffix() == Some(mime::JSON))
        })
        .unwrap_or(false)
}

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = JsonBodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // Must own the header before the request is consumed
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if let Some(ct) = content_type
            && !is_json(&ct)
        {
            return Err(JsonBodyRejection::UnsupportedMediaType(ct));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| {
                if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    JsonBodyRejection::TooLarge(e.body_text())
                } else {
                    JsonBodyRejection::Unreadable(e.body_text())
                }
            })?;

        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|e| JsonBodyRejection::InvalidJson(e.to_string()))
    }
}
