//! Search response bodies.

use std::collections::BTreeMap;

use serde::Serialize;
use sift_persistence::types::{FacetBucket, Hit, SearchQuery, SearchResult, SortField};

fn is_false(value: &bool) -> bool {
    !*value
}

/// The query as it was executed, after defaults and rules were applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryEcho {
    /// Sanitized free-text query.
    pub query: String,
    /// Target index, omitted when every index was searched.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub index: String,
    /// Term filters, omitted when there are none.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub filters: BTreeMap<String, String>,
    /// Offset.
    pub from: usize,
    /// Page size.
    pub size: usize,
    /// Effective sort.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<SortField>,
}

impl From<SearchQuery> for QueryEcho {
    fn from(query: SearchQuery) -> Self {
        let filters = query
            .term_filters()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Self {
            filters,
            from: query.pagination.offset,
            size: query.pagination.limit,
            query: query.query,
            index: query.index,
            sort: query.sort,
        }
    }
}

/// Body of every search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    /// The executed query.
    pub query: QueryEcho,
    /// Matching documents.
    pub results: Vec<Hit>,
    /// Total number of matches.
    pub total: i64,
    /// Highest score, omitted when nothing matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_score: Option<f64>,
    /// Backend time in milliseconds.
    pub took: i64,
    /// Present only when the backend gave up early.
    #[serde(skip_serializing_if = "is_false")]
    pub timed_out: bool,
    /// Bucket counts per requested facet.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub facets: BTreeMap<String, Vec<FacetBucket>>,
}

impl From<SearchResult> for SearchResponse {
    fn from(result: SearchResult) -> Self {
        let max_score = if result.hits.is_empty() {
            None
        } else {
            Some(result.max_score)
        };

        Self {
            query: result.query.into(),
            results: result.hits,
            total: result.total,
            max_score,
            took: result.took,
            timed_out: result.timed_out,
            facets: result.facets,
        }
    }
}

/// Body of `POST /search/multi`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiSearchResponse {
    /// One response per search, in request order.
    pub responses: Vec<SearchResponse>,
}

impl From<Vec<SearchResult>> for MultiSearchResponse {
    fn from(results: Vec<SearchResult>) -> Self {
        Self {
            responses: results.into_iter().map(SearchResponse::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Map, json};

    fn hit(id: &str, score: f64) -> Hit {
        Hit {
            index: "products".to_string(),
            id: id.to_string(),
            score,
            source: Map::new(),
        }
    }

    #[test]
    fn test_empty_result_omits_optional_fields() {
        let result = SearchResult::empty(SearchQuery::new("laptop"));
        let body = serde_json::to_value(SearchResponse::from(result)).unwrap();

        assert_eq!(
            body,
            json!({
                "query": {"query": "laptop", "from": 0, "size": 10},
                "results": [],
                "total": 0,
                "took": 0
            })
        );
    }

    #[test]
    fn test_full_result() {
        let query = SearchQuery::new("laptop")
            .with_index("products")
            .with_filter("brand", "acme")
            .with_facets(["brand"])
            .with_sort(SortField::desc("_score"));
        let mut result = SearchResult::empty(query);
        result.hits = vec![hit("p1", 1.0), hit("p2", 0.5)];
        result.total = 2;
        result.max_score = 1.0;
        result.timed_out = true;

        let body = serde_json::to_value(SearchResponse::from(result)).unwrap();

        assert_eq!(body["max_score"], 1.0);
        assert_eq!(body["timed_out"], true);
        assert_eq!(body["query"]["index"], "products");
        assert_eq!(body["query"]["filters"], json!({"brand": "acme"}));
        assert_eq!(
            body["query"]["sort"],
            json!([{"field": "_score", "order": "desc"}])
        );
        assert_eq!(body["results"][1]["id"], "p2");
        assert!(body.get("facets").is_none());
    }
}
