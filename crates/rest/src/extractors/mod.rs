//! Axum extractors for request bodies and query strings.
//!
//! - [`JsonBody`] - Parse a JSON body, rejecting with the standard error envelope
//! - [`SearchParams`] - Parse search query-string parameters

mod json_body;
mod search_params;

pub use json_body::{JsonBody, JsonBodyRejection};
pub use search_params::SearchParams;
