//! sift search pipeline and document lifecycle.
//!
//! This crate holds everything between an HTTP request and an Elasticsearch
//! cluster: the search query model, the Query DSL builder, the response
//! normalizer, the business rules applied on the way in and out, the
//! document lifecycle, and the backends that talk to a search engine.
//!
//! # Features
//!
//! - `elasticsearch` (default) - the [`ElasticsearchBackend`](backends::elasticsearch::ElasticsearchBackend)
//!
//! The in-memory backend ([`MemoryBackend`](backends::memory::MemoryBackend)) is
//! always available.
//!
//! # Architecture
//!
//! - [`types`] - search queries, results, documents, bulk reports
//! - [`error`] - error codes and the error hierarchy
//! - [`core`] - the [`SearchBackend`] trait
//! - [`search`] - query builder, normalizer, search rules, [`SearchService`](search::SearchService)
//! - [`documents`] - document rules, [`DocumentService`](documents::DocumentService),
//!   [`IndexService`](documents::IndexService)
//! - [`backends`] - Elasticsearch and in-memory backends
//!
//! Services take their backend through the constructor as an `Arc<B>` and
//! are cheap to clone.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use sift_persistence::backends::memory::MemoryBackend;
//! use sift_persistence::documents::DocumentService;
//! use sift_persistence::search::SearchService;
//! use sift_persistence::types::SearchQuery;
//! use serde_json::{json, Map};
//!
//! # tokio_test::block_on(async {
//! let backend = Arc::new(MemoryBackend::new());
//! let documents = DocumentService::new(backend.clone());
//! let search = SearchService::new(backend);
//!
//! let mut source = Map::new();
//! source.insert("title".to_string(), json!("Intro to Rust"));
//! let doc = documents.create("articles", source).await.unwrap();
//! assert_eq!(doc.version, 1);
//!
//! let result = search
//!     .search(SearchQuery::new("rust").with_index("articles"))
//!     .await
//!     .unwrap();
//! assert_eq!(result.total, 1);
//! assert_eq!(result.hits[0].source["_match_quality"], "high");
//! # });
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod core;
pub mod documents;
pub mod error;
pub mod search;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{ErrorCode, ErrorKind, StorageError, StorageResult};
pub use types::{Document, Pagination, SearchQuery, SearchResult};

// Re-export core traits
pub use core::{BackendKind, SearchBackend};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
