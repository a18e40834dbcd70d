//! Core types shared by the search pipeline and the document lifecycle.
//!
//! - [`SearchQuery`], [`SortField`], [`Pagination`] - what a caller asks for
//! - [`SearchResult`], [`Hit`] - what comes back, after normalization
//! - [`Document`] - a document with version bookkeeping
//! - [`BulkOperation`], [`BulkReport`] - bulk submissions and per-item outcomes
//! - [`HealthReport`] - cluster health summary
//!
//! # Example
//!
//! ```
//! use sift_persistence::types::{SearchQuery, SortField, SortOrder};
//!
//! let query = SearchQuery::new("laptop")
//!     .with_index("products")
//!     .with_filter("brand", "acme")
//!     .with_sort(SortField::new("price", SortOrder::Asc));
//!
//! assert_eq!(query.sort[0].order.as_str(), "asc");
//! ```

mod bulk;
mod document;
mod health;
mod pagination;
mod search_query;
mod search_result;

pub use bulk::{BulkItemOutcome, BulkOperation, BulkReport};
pub use document::{Document, Fields, NewDocument, WriteReceipt};
pub use health::HealthReport;
pub use pagination::{DEFAULT_PAGE_SIZE, MAX_OFFSET, MAX_PAGE_SIZE, Pagination};
pub use search_query::{FACETS_FILTER_KEY, SearchQuery, SortField, SortOrder};
pub use search_result::{FacetBucket, Hit, SearchResult};
