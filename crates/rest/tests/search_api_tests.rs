//! Search endpoint tests.

mod common;

use serde_json::{Value, json};

use common::assertions::{assert_error_code, assert_status, result_ids};
use common::harness::RestTestHarness;

// ============================================================================
// GET /search
// ============================================================================

#[tokio::test]
async fn test_get_search_finds_matches() {
    let h = RestTestHarness::new();
    h.seed_products().await;

    let response = h
        .server
        .get("/search")
        .add_query_param("q", "laptop")
        .add_query_param("index", "products")
        .await;

    assert_status(&response, 200);
    let body = response.json::<Value>();
    assert_eq!(body["total"], 2);
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
    assert_eq!(
        body["query"],
        json!({
            "query": "laptop",
            "index": "products",
            "from": 0,
            "size": 10,
            "sort": [{"field": "_score", "order": "desc"}]
        })
    );
    assert!(body["max_score"].is_number());
    assert!(body.get("timed_out").is_none());

    let hit = &body["results"][0];
    assert_eq!(hit["index"], "products");
    assert_eq!(hit["source"]["_match_quality"], "high");
    assert_eq!(hit["source"]["_source_index"], "products");
}

#[tokio::test]
async fn test_get_search_without_q_is_400() {
    let h = RestTestHarness::new();

    let response = h.server.get("/search").await;

    let error = assert_error_code(&response, 400, "INVALID_REQUEST");
    assert_eq!(error["message"], "Query parameter 'q' is required");

    let response = h.server.get("/search").add_query_param("q", "").await;
    assert_error_code(&response, 400, "INVALID_REQUEST");
}

#[tokio::test]
async fn test_get_search_with_non_numeric_size_is_400() {
    let h = RestTestHarness::new();

    let response = h
        .server
        .get("/search")
        .add_query_param("q", "laptop")
        .add_query_param("size", "ten")
        .await;

    assert_error_code(&response, 400, "INVALID_PARAMETER");
}

#[tokio::test]
async fn test_get_search_with_deep_offset_is_400() {
    let h = RestTestHarness::new();

    let response = h
        .server
        .get("/search")
        .add_query_param("q", "laptop")
        .add_query_param("from", "10001")
        .await;

    let error = assert_error_code(&response, 400, "VALIDATION_FAILED");
    assert_eq!(error["message"], "From offset cannot exceed 10000");
}

#[tokio::test]
async fn test_no_results_omits_max_score() {
    let h = RestTestHarness::new();
    h.seed_products().await;

    let response = h
        .server
        .get("/search")
        .add_query_param("q", "submarine")
        .add_query_param("index", "products")
        .await;

    assert_status(&response, 200);
    let body = response.json::<Value>();
    assert_eq!(body["total"], 0);
    assert!(body.get("max_score").is_none());
}

#[tokio::test]
async fn test_search_on_missing_index_is_500() {
    let h = RestTestHarness::new();

    let response = h
        .server
        .get("/search")
        .add_query_param("q", "laptop")
        .add_query_param("index", "nope")
        .await;

    let error = assert_error_code(&response, 500, "SEARCH_FAILED");
    assert_eq!(error["message"], "Search operation failed");
}

#[tokio::test]
async fn test_sensitive_fields_are_stripped() {
    let h = RestTestHarness::new();
    h.seed("users", "u1", common::fixtures::user_with_secret())
        .await;

    let response = h
        .server
        .get("/search")
        .add_query_param("q", "ada")
        .add_query_param("index", "users")
        .await;

    let body = response.json::<Value>();
    let source = &body["results"][0]["source"];
    assert!(source.get("token").is_none());
    assert_eq!(source["email"], "ada@example.com");
}

// ============================================================================
// POST /search
// ============================================================================

#[tokio::test]
async fn test_post_search_with_filters_and_sort() {
    let h = RestTestHarness::new();
    h.seed_products().await;

    let response = h
        .server
        .post("/search")
        .json(&json!({
            "query": "laptop",
            "index": "products",
            "filters": {"brand": "acme"},
            "sort": [{"field": "price", "order": "asc"}]
        }))
        .await;

    assert_status(&response, 200);
    let body = response.json::<Value>();
    assert_eq!(result_ids(&body), vec!["p2", "p1"]);
    assert_eq!(body["query"]["filters"], json!({"brand": "acme"}));
}

#[tokio::test]
async fn test_post_search_rejects_unknown_sort_field() {
    let h = RestTestHarness::new();

    let response = h
        .server
        .post("/search")
        .json(&json!({"query": "laptop", "sort": [{"field": "Price", "order": "asc"}]}))
        .await;

    let error = assert_error_code(&response, 400, "VALIDATION_FAILED");
    assert_eq!(error["message"], "Invalid sort field: Price");
}

#[tokio::test]
async fn test_post_search_rejects_sort_without_order() {
    let h = RestTestHarness::new();

    let response = h
        .server
        .post("/search")
        .json(&json!({"query": "laptop", "sort": [{"field": "price"}]}))
        .await;

    let error = assert_error_code(&response, 400, "VALIDATION_FAILED");
    assert_eq!(error["message"], "sort order must be 'asc' or 'desc'");
}

#[tokio::test]
async fn test_post_search_requires_query() {
    let h = RestTestHarness::new();

    let response = h.server.post("/search").json(&json!({})).await;

    let error = assert_error_code(&response, 400, "VALIDATION_FAILED");
    assert_eq!(error["message"], "Search query cannot be empty");
}

#[tokio::test]
async fn test_post_search_clamps_size() {
    let h = RestTestHarness::new();
    h.seed_products().await;

    let response = h
        .server
        .post("/search")
        .json(&json!({"query": "laptop", "index": "products", "size": 5000}))
        .await;

    assert_status(&response, 200);
    assert_eq!(response.json::<Value>()["query"]["size"], 1000);
}

// ============================================================================
// Multi, suggest, facets, field
// ============================================================================

#[tokio::test]
async fn test_multi_search_keeps_order() {
    let h = RestTestHarness::new();
    h.seed_products().await;

    let response = h
        .server
        .post("/search/multi")
        .json(&json!({"searches": [
            {"query": "lamp", "index": "products"},
            {"query": "air", "index": "products"}
        ]}))
        .await;

    assert_status(&response, 200);
    let body = response.json::<Value>();
    let responses = body["responses"].as_array().unwrap();
    assert_eq!(responses.len(), 2);
    assert_eq!(result_ids(&responses[0]), vec!["p3"]);
    assert_eq!(result_ids(&responses[1]), vec!["p2"]);
}

#[tokio::test]
async fn test_multi_search_names_invalid_entry() {
    let h = RestTestHarness::new();

    let response = h
        .server
        .post("/search/multi")
        .json(&json!({"searches": [{"query": "a"}, {"query": ""}]}))
        .await;

    let error = assert_error_code(&response, 400, "VALIDATION_FAILED");
    assert_eq!(error["message"], "Query 1 validation failed");
    assert_eq!(error["details"], "Search query cannot be empty");
}

#[tokio::test]
async fn test_suggest_matches_prefix() {
    let h = RestTestHarness::new();
    h.seed_products().await;

    let response = h
        .server
        .get("/search/suggest")
        .add_query_param("q", "lap")
        .add_query_param("field", "name")
        .add_query_param("index", "products")
        .await;

    assert_status(&response, 200);
    let body = response.json::<Value>();
    assert_eq!(body["total"], 2);
    assert_eq!(body["query"]["query"], "lap*");
    assert_eq!(body["query"]["size"], 5);
}

#[tokio::test]
async fn test_suggest_requires_field() {
    let h = RestTestHarness::new();

    let response = h
        .server
        .get("/search/suggest")
        .add_query_param("q", "lap")
        .await;

    let error = assert_error_code(&response, 400, "VALIDATION_FAILED");
    assert_eq!(error["message"], "Field for suggestion cannot be empty");
}

#[tokio::test]
async fn test_faceted_search_returns_buckets() {
    let h = RestTestHarness::new();
    h.seed_products().await;

    let response = h
        .server
        .post("/search/facets")
        .json(&json!({"query": "laptop lamp", "index": "products", "facets": ["brand"]}))
        .await;

    assert_status(&response, 200);
    let body = response.json::<Value>();
    assert_eq!(
        body["facets"]["brand"],
        json!([{"key": "acme", "count": 2}, {"key": "globex", "count": 1}])
    );
    assert!(body["query"].get("filters").is_none());
}

#[tokio::test]
async fn test_faceted_search_requires_facets() {
    let h = RestTestHarness::new();

    let response = h
        .server
        .post("/search/facets")
        .json(&json!({"query": "*", "facets": []}))
        .await;

    assert_error_code(&response, 400, "VALIDATION_FAILED");
}

#[tokio::test]
async fn test_search_by_field() {
    let h = RestTestHarness::new();
    h.seed_products().await;

    let response = h
        .server
        .get("/search/field")
        .add_query_param("field", "brand")
        .add_query_param("value", "globex")
        .add_query_param("index", "products")
        .await;

    assert_status(&response, 200);
    let body = response.json::<Value>();
    assert_eq!(result_ids(&body), vec!["p3"]);
    assert_eq!(body["query"]["query"], "globex");
    assert_eq!(body["query"]["filters"], json!({"brand": "globex"}));
}

#[tokio::test]
async fn test_search_by_field_requires_value() {
    let h = RestTestHarness::new();

    let response = h
        .server
        .get("/search/field")
        .add_query_param("field", "brand")
        .await;

    let error = assert_error_code(&response, 400, "VALIDATION_FAILED");
    assert_eq!(error["message"], "Value cannot be empty");
}
