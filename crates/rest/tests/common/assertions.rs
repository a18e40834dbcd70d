//! HTTP response assertions.

use axum_test::TestResponse;
use serde_json::Value;

/// Asserts that the response has the expected status code.
pub fn assert_status(response: &TestResponse, expected: u16) {
    let actual = response.status_code().as_u16();
    assert_eq!(
        actual,
        expected,
        "Expected status {}, got {}: {}",
        expected,
        actual,
        response.text()
    );
}

/// Asserts that the response is the standard error envelope with `code`,
/// and returns the `error` object.
pub fn assert_error_code(response: &TestResponse, expected_status: u16, code: &str) -> Value {
    assert_status(response, expected_status);
    let body = response.json::<Value>();
    let error = body
        .get("error")
        .cloned()
        .unwrap_or_else(|| panic!("Expected error envelope, got {}", body));
    assert_eq!(error["code"], code, "Unexpected error body: {}", body);
    assert!(error["message"].is_string(), "Missing message: {}", body);
    error
}

/// Returns the ids of a search response's results, in order.
pub fn result_ids(body: &Value) -> Vec<String> {
    body["results"]
        .as_array()
        .map(|results| {
            results
                .iter()
                .filter_map(|r| r["id"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
