//! Request bodies accepted by the API.
//!
//! Missing fields default to empty values so that the persistence rules,
//! not the JSON parser, decide what is required and report it with a
//! field-specific message.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use sift_persistence::error::ValidationError;
use sift_persistence::search::rules::pagination_from;
use sift_persistence::types::{Fields, NewDocument, SearchQuery, SortField, SortOrder};

use crate::error::{RestError, RestResult};

/// Body of `POST /documents`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateDocumentRequest {
    /// Target index.
    #[serde(default)]
    pub index: String,
    /// Caller-chosen id.
    #[serde(default)]
    pub id: Option<String>,
    /// Document fields.
    #[serde(default)]
    pub source: Fields,
}

/// Body of `PUT /documents/{index}/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDocumentRequest {
    /// Replacement fields.
    #[serde(default)]
    pub source: Fields,
}

/// Body of `POST /documents/bulk`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkIndexRequest {
    /// Documents to index.
    #[serde(default)]
    pub documents: Vec<NewDocument>,
}

/// Body of `POST /documents/bulk-delete`. Both arrays are parallel.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkDeleteRequest {
    /// Index of each document.
    #[serde(default)]
    pub indices: Vec<String>,
    /// Id of each document.
    #[serde(default)]
    pub ids: Vec<String>,
}

/// Body of `PUT /indices/{index}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateIndexRequest {
    /// Settings and mappings passed through to the backend.
    #[serde(default)]
    pub mapping: Option<Value>,
}

/// One sort entry of a search request.
#[derive(Debug, Clone, Deserialize)]
pub struct SortRequest {
    /// Field to sort by.
    #[serde(default)]
    pub field: String,
    /// `asc` or `desc`; anything else, including nothing, is rejected.
    #[serde(default)]
    pub order: String,
}

/// Body of `POST /search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    /// Free-text query.
    #[serde(default)]
    pub query: String,
    /// Target index; empty means every index.
    #[serde(default)]
    pub index: String,
    /// Exact-match filters. Scalar values are compared as strings.
    #[serde(default)]
    pub filters: BTreeMap<String, Value>,
    /// Offset.
    #[serde(default)]
    pub from: Option<i64>,
    /// Page size.
    #[serde(default)]
    pub size: Option<i64>,
    /// Sort order; relevance when empty.
    #[serde(default)]
    pub sort: Vec<SortRequest>,
}

impl SearchRequest {
    /// Converts the request into a [`SearchQuery`].
    pub fn into_query(self) -> RestResult<SearchQuery> {
        let mut query = SearchQuery::new(self.query).with_index(self.index);
        query.pagination = pagination_from(self.from, self.size)?;

        for (field, value) in self.filters {
            query = query.with_filter(field, filter_value(value)?);
        }

        for sort in self.sort {
            let order = sort
                .order
                .parse::<SortOrder>()
                .map_err(|_| ValidationError::InvalidSortOrder {
                    order: sort.order.clone(),
                })?;
            query = query.with_sort(SortField::new(sort.field, order));
        }

        Ok(query)
    }
}

fn filter_value(value: Value) -> RestResult<String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        // An empty filter is dropped by the search service
        Value::Null => Ok(String::new()),
        Value::Array(_) | Value::Object(_) => Err(RestError::invalid_parameter(
            "Filter values must be strings, numbers or booleans",
        )),
    }
}

/// Body of `POST /search/multi`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MultiSearchRequest {
    /// Searches to run, answered in the same order.
    #[serde(default)]
    pub searches: Vec<SearchRequest>,
}

/// Body of `POST /search/facets`: a search plus the fields to bucket.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FacetSearchRequest {
    /// The search itself.
    #[serde(flatten)]
    pub search: SearchRequest,
    /// Fields to return bucket counts for.
    #[serde(default)]
    pub facets: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sift_persistence::error::ErrorCode;

    fn parse(value: Value) -> SearchRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_minimal_search_request() {
        let query = parse(json!({"query": "laptop"})).into_query().unwrap();
        assert_eq!(query.query, "laptop");
        assert_eq!(query.target_index(), None);
        assert_eq!(query.pagination.limit, 10);
        assert!(query.sort.is_empty());
    }

    #[test]
    fn test_filters_and_sort() {
        let query = parse(json!({
            "query": "laptop",
            "index": "products",
            "filters": {"brand": "acme", "in_stock": true, "rating": 4},
            "from": 20,
            "size": 5,
            "sort": [{"field": "price", "order": "asc"}, {"field": "_score", "order": "desc"}]
        }))
        .into_query()
        .unwrap();

        assert_eq!(query.filters["brand"], "acme");
        assert_eq!(query.filters["in_stock"], "true");
        assert_eq!(query.filters["rating"], "4");
        assert_eq!(query.pagination.offset, 20);
        assert_eq!(query.pagination.limit, 5);
        assert_eq!(query.sort, vec![SortField::asc("price"), SortField::desc("_score")]);
    }

    #[test]
    fn test_bad_sort_order() {
        let err = parse(json!({"query": "x", "sort": [{"field": "price", "order": "up"}]}))
            .into_query()
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert_eq!(err.message(), "sort order must be 'asc' or 'desc'");
    }

    #[test]
    fn test_missing_sort_order_is_rejected() {
        let err = parse(json!({"query": "x", "sort": [{"field": "price"}]}))
            .into_query()
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert_eq!(err.message(), "sort order must be 'asc' or 'desc'");
    }

    #[test]
    fn test_nested_filter_is_rejected() {
        let err = parse(json!({"query": "x", "filters": {"brand": ["a", "b"]}}))
            .into_query()
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidParameter);
    }

    #[test]
    fn test_facet_request_flattens_search() {
        let request: FacetSearchRequest = serde_json::from_value(json!({
            "query": "laptop",
            "size": 3,
            "facets": ["brand"]
        }))
        .unwrap();
        assert_eq!(request.facets, vec!["brand".to_string()]);
        assert_eq!(request.search.size, Some(3));
    }

    #[test]
    fn test_create_document_defaults() {
        let request: CreateDocumentRequest = serde_json::from_value(json!({})).unwrap();
        assert!(request.index.is_empty());
        assert!(request.id.is_none());
        assert!(request.source.is_empty());
    }
}
