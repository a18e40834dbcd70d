//! Search backend implementations.
//!
//! # Available Backends
//!
//! | Backend | Feature | Description |
//! |---------|---------|-------------|
//! | Elasticsearch | `elasticsearch` (default) | Official client over HTTP |
//! | Memory | always | In-process store with a naive evaluator, for tests and local runs |
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "elasticsearch")]
//! use sift_persistence::backends::elasticsearch::{ElasticsearchBackend, ElasticsearchConfig};
//!
//! # #[cfg(feature = "elasticsearch")]
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = ElasticsearchBackend::new(ElasticsearchConfig::default())?;
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "elasticsearch")]
pub mod elasticsearch;

pub mod memory;
