//! Backend abstraction over the external search engine.
//!
//! The gateway never talks to a search engine directly. It goes through
//! [`SearchBackend`], a thin request/response seam: the services build payloads
//! and interpret raw JSON responses, while each backend only moves JSON to and
//! from its engine and maps transport failures onto [`BackendError`].
//!
//! Cancellation follows the usual async contract: dropping a returned future
//! aborts the in-flight call.

use std::fmt::Debug;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::BackendResult;
use crate::types::{BulkOperation, Fields, WriteReceipt};

/// Identifies the type of backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// An Elasticsearch cluster.
    Elasticsearch,
    /// The in-process store used for tests and local runs.
    Memory,
    /// Custom or unknown backend.
    Custom(&'static str),
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Elasticsearch => write!(f, "elasticsearch"),
            BackendKind::Memory => write!(f, "memory"),
            BackendKind::Custom(name) => write!(f, "{}", name),
        }
    }
}

/// Operations the gateway needs from a search engine.
///
/// All payloads and responses use the engine's JSON shapes: search bodies are
/// Query DSL, search responses carry `hits.hits[]`, get responses carry
/// `_source` and `_version`, and so on.
#[async_trait]
pub trait SearchBackend: Send + Sync + Debug {
    /// Returns the backend type.
    fn kind(&self) -> BackendKind;

    /// Returns a short name for logs.
    fn name(&self) -> &'static str;

    /// Indexes a document, creating or overwriting it.
    ///
    /// When `id` is `None` the backend assigns one.
    async fn index_document(
        &self,
        index: &str,
        id: Option<&str>,
        source: &Fields,
    ) -> BackendResult<WriteReceipt>;

    /// Creates a document only if no document with `id` exists.
    ///
    /// Fails with [`BackendError::Conflict`](crate::error::BackendError::Conflict)
    /// when the id is taken.
    async fn create_document(
        &self,
        index: &str,
        id: &str,
        source: &Fields,
    ) -> BackendResult<WriteReceipt>;

    /// Fetches a document. Returns `Ok(None)` when the document or its index
    /// does not exist.
    async fn get_document(&self, index: &str, id: &str) -> BackendResult<Option<Value>>;

    /// Deletes a document.
    ///
    /// Fails with [`BackendError::DocumentNotFound`](crate::error::BackendError::DocumentNotFound)
    /// when it does not exist.
    async fn delete_document(&self, index: &str, id: &str) -> BackendResult<()>;

    /// Runs a search body against `index`, or against every index when `None`.
    async fn search(&self, index: Option<&str>, body: &Value) -> BackendResult<Value>;

    /// Runs several searches in one round trip.
    ///
    /// The response carries one entry per request under `responses`.
    async fn multi_search(&self, requests: &[(Option<String>, Value)]) -> BackendResult<Value>;

    /// Submits a bulk request and returns the raw per-item response.
    async fn bulk(&self, operations: &[BulkOperation]) -> BackendResult<Value>;

    /// Checks whether an index exists.
    async fn index_exists(&self, index: &str) -> BackendResult<bool>;

    /// Creates an index with an optional mapping body.
    async fn create_index(&self, index: &str, mapping: Option<&Value>) -> BackendResult<()>;

    /// Deletes an index.
    async fn delete_index(&self, index: &str) -> BackendResult<()>;

    /// Returns the cluster health document (`{cluster_name, status, ...}`).
    async fn cluster_health(&self) -> BackendResult<Value>;

    /// Returns the cluster info document (`{cluster_name, version: {...}}`).
    async fn cluster_info(&self) -> BackendResult<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_display() {
        assert_eq!(BackendKind::Elasticsearch.to_string(), "elasticsearch");
        assert_eq!(BackendKind::Memory.to_string(), "memory");
        assert_eq!(BackendKind::Custom("mock").to_string(), "mock");
    }

    #[test]
    fn test_trait_is_object_safe() {
        fn assert_object_safe(_: Option<&dyn SearchBackend>) {}
        assert_object_safe(None);
    }

    #[test]
    fn test_backends_implement_trait() {
        fn assert_backend<B: SearchBackend + 'static>() {}
        assert_backend::<crate::backends::memory::MemoryBackend>();
        #[cfg(feature = "elasticsearch")]
        assert_backend::<crate::backends::elasticsearch::ElasticsearchBackend>();
    }
}
