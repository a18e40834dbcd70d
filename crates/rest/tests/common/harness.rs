//! REST API test harness.
//!
//! Runs the full application, middleware included, over a fresh
//! [`MemoryBackend`].

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::{Value, json};
use sift_persistence::backends::memory::MemoryBackend;
use sift_rest::{ServerConfig, create_app_with_config};

use super::fixtures;

/// Test harness for REST API testing.
///
/// # Example
///
/// ```rust,ignore
/// let harness = RestTestHarness::new();
/// harness.seed_products().await;
///
/// let response = harness.server.get("/search").add_query_param("q", "laptop").await;
/// assert_status(&response, 200);
/// ```
pub struct RestTestHarness {
    /// The test server instance.
    pub server: TestServer,

    /// The backend behind the server, for direct inspection.
    pub backend: Arc<MemoryBackend>,

    /// Server configuration.
    pub config: ServerConfig,
}

impl RestTestHarness {
    /// Creates a harness with the testing configuration.
    pub fn new() -> Self {
        Self::with_config(ServerConfig::for_testing())
    }

    /// Creates a harness with a custom configuration.
    pub fn with_config(config: ServerConfig) -> Self {
        let backend = Arc::new(MemoryBackend::new());
        let app = create_app_with_config(Arc::clone(&backend), config.clone());
        let server = TestServer::new(app).expect("Failed to create test server");

        Self {
            server,
            backend,
            config,
        }
    }

    /// Creates a document through the API and returns the response body.
    pub async fn seed(&self, index: &str, id: &str, source: Value) -> Value {
        let response = self
            .server
            .post("/documents")
            .json(&json!({"index": index, "id": id, "source": source}))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<Value>()
    }

    /// Seeds the product catalog from [`fixtures::products`].
    pub async fn seed_products(&self) {
        for (id, source) in fixtures::products() {
            self.seed(fixtures::PRODUCTS, id, source).await;
        }
    }
}
