//! Normalized search results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::document::Fields;
use super::search_query::SearchQuery;

/// One matched document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// Index the document lives in.
    pub index: String,
    /// Document id.
    pub id: String,
    /// Relevance score.
    pub score: f64,
    /// Document fields.
    pub source: Fields,
}

/// One aggregation bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetBucket {
    /// Bucket key (string or number, as reported by the backend).
    pub key: Value,
    /// Number of documents in the bucket.
    pub count: i64,
}

/// The result of a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The query that produced this result, after business rules.
    pub query: SearchQuery,
    /// Hits in backend rank order.
    pub hits: Vec<Hit>,
    /// Total number of matches.
    pub total: i64,
    /// Highest score among the matches.
    pub max_score: f64,
    /// Backend processing time in milliseconds.
    pub took: i64,
    /// The backend stopped early and may not have consulted every shard.
    pub timed_out: bool,
    /// Facet buckets keyed by field.
    pub facets: BTreeMap<String, Vec<FacetBucket>>,
}

impl SearchResult {
    /// Creates an empty result for `query`.
    pub fn empty(query: SearchQuery) -> Self {
        Self {
            query,
            hits: Vec::new(),
            total: 0,
            max_score: 0.0,
            took: 0,
            timed_out: false,
            facets: BTreeMap::new(),
        }
    }

    /// Number of pages for the query's page size.
    pub fn total_pages(&self) -> i64 {
        self.query.pagination.total_pages(self.total)
    }

    /// One-based page number of this result.
    pub fn current_page(&self) -> i64 {
        self.query.pagination.current_page()
    }
}
