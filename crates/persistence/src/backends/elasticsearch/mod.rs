//! Elasticsearch backend implementation.
//!
//! Talks to a cluster through the official `elasticsearch` client. The backend
//! moves JSON only: query bodies come from
//! [`EsQueryBuilder`](crate::search::EsQueryBuilder) and responses are handed
//! back raw for the services to normalize.
//!
//! # Error Mapping
//!
//! | Condition | Error |
//! |-----------|-------|
//! | transport timeout | `BackendError::Timeout` |
//! | other transport failure | `BackendError::ConnectionFailed` |
//! | HTTP 401 / 403 | `BackendError::Unauthorized` |
//! | HTTP 404 on get | `Ok(None)` |
//! | HTTP 404 on delete | `BackendError::DocumentNotFound` |
//! | HTTP 409 on create | `BackendError::Conflict` |
//! | any other non-2xx | `BackendError::Status` |
//!
//! # Example
//!
//! ```no_run
//! use sift_persistence::backends::elasticsearch::{
//!     ElasticsearchAuth, ElasticsearchBackend, ElasticsearchConfig,
//! };
//!
//! let config = ElasticsearchConfig {
//!     nodes: vec!["https://localhost:9200".to_string()],
//!     auth: Some(ElasticsearchAuth::Basic {
//!         username: "elastic".to_string(),
//!         password: "changeme".to_string(),
//!     }),
//!     disable_certificate_validation: true,
//!     ..Default::default()
//! };
//! let backend = ElasticsearchBackend::new(config)?;
//! # Ok::<(), sift_persistence::error::BackendError>(())
//! ```

mod backend;
mod documents;
mod indices;
mod search_impl;

pub use backend::{ElasticsearchAuth, ElasticsearchBackend, ElasticsearchConfig};
