//! Core abstractions.
//!
//! - [`SearchBackend`] - the seam between the gateway and a search engine
//! - [`BackendKind`] - identifies a backend implementation
//!
//! # Example: Implementing a Backend
//!
//! ```ignore
//! use async_trait::async_trait;
//! use sift_persistence::core::{BackendKind, SearchBackend};
//!
//! #[derive(Debug)]
//! struct OpenSearchBackend { /* client */ }
//!
//! #[async_trait]
//! impl SearchBackend for OpenSearchBackend {
//!     fn kind(&self) -> BackendKind {
//!         BackendKind::Custom("opensearch")
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "opensearch"
//!     }
//!
//!     // ... remaining operations
//! }
//! ```

pub mod backend;

pub use backend::{BackendKind, SearchBackend};
