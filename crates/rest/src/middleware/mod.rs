//! HTTP middleware for the sift API.
//!
//! - [`security_headers`] - Browser hardening response headers
//! - [`panic`] - Panic recovery response
//!
//! Tracing, request ids, timeouts, body limits, and CORS come straight from
//! `tower-http` and are assembled in [`create_app_with_config`](crate::create_app_with_config).

pub mod panic;
pub mod security_headers;

pub use panic::handle_panic;
pub use security_headers::{SECURITY_HEADERS, with_security_headers};
