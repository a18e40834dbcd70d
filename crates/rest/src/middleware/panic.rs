//! Panic recovery.
//!
//! A panicking handler is turned into a 500 `INTERNAL_ERROR` response with
//! the standard error body. The panic payload is logged, never returned.

use std::any::Any;

use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::error::RestError;

/// Client message for recovered panics.
pub const PANIC_MESSAGE: &str = "An internal error occurred";

/// Response factory for [`CatchPanicLayer::custom`](tower_http::catch_panic::CatchPanicLayer::custom).
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };

    error!(panic = %detail, "Request handler panicked");

    RestError::internal(PANIC_MESSAGE).into_response()
}
