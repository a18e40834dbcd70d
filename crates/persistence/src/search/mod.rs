//! The search pipeline.
//!
//! - [`query_builder`] - translates a [`SearchQuery`](crate::types::SearchQuery) into Query DSL
//! - [`normalizer`] - reshapes raw backend responses into [`SearchResult`](crate::types::SearchResult)
//! - [`rules`] - pre-rules (sanitize, clamp, sort allow-list) and post-rules
//!   (sensitive-field stripping, match quality)
//! - [`service`] - [`SearchService`], which runs the whole pipeline
//!
//! # Pipeline
//!
//! ```text
//! SearchQuery
//!    └── validate_search_input
//!    └── apply_search_rules     (sanitize, clamp size, reject deep offsets, default sort)
//!    └── EsQueryBuilder::build  (multi_match + term filters + sort + aggs)
//!    └── SearchBackend::search
//!    └── normalize              (hits, totals, facets)
//!    └── post_process_results   (strip secrets, _match_quality, _source_index)
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use sift_persistence::backends::memory::MemoryBackend;
//! use sift_persistence::search::SearchService;
//! use sift_persistence::types::SearchQuery;
//!
//! # tokio_test::block_on(async {
//! let service = SearchService::new(Arc::new(MemoryBackend::new()));
//! let result = service.search(SearchQuery::new("*")).await.unwrap();
//! assert_eq!(result.total, 0);
//! # });
//! ```

pub mod normalizer;
pub mod query_builder;
pub mod rules;
pub mod service;

pub use normalizer::normalize;
pub use query_builder::{EsQuery, EsQueryBuilder};
pub use service::{DEFAULT_SUGGEST_SIZE, SearchService};
