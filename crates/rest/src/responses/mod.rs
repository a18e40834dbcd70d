//! Response bodies.
//!
//! - [`search`] - search, multi-search and facet responses
//! - [`health`] - health check and index status responses
//!
//! Documents and bulk reports are returned as the persistence types
//! [`Document`](sift_persistence::types::Document) and
//! [`BulkReport`](sift_persistence::types::BulkReport) unchanged.

pub mod health;
pub mod search;

pub use health::{HealthChecks, HealthResponse, IndexStatusResponse};
pub use search::{MultiSearchResponse, QueryEcho, SearchResponse};
