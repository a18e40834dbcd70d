//! Test infrastructure for the persistence layer.
//!
//! - [`RecordingBackend`] wraps the in-memory backend, counts calls, keeps the
//!   last search body, and can be switched into a failing mode
//! - fixture helpers build field maps and services

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use sift_persistence::backends::memory::MemoryBackend;
use sift_persistence::core::{BackendKind, SearchBackend};
use sift_persistence::documents::{DocumentService, IndexService};
use sift_persistence::error::{BackendError, BackendResult};
use sift_persistence::search::SearchService;
use sift_persistence::types::{BulkOperation, Fields, WriteReceipt};

/// A backend that records what the services send it.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    inner: MemoryBackend,
    calls: AtomicUsize,
    failing: AtomicBool,
    last_search: Mutex<Option<Value>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of backend operations invoked so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Makes every following call fail with a timeout.
    pub fn fail_all(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// The body of the most recent `search` call.
    pub fn last_search(&self) -> Option<Value> {
        self.last_search.lock().clone()
    }

    fn enter(&self) -> BackendResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(BackendError::Timeout {
                backend_name: "recording".to_string(),
                message: "simulated timeout".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SearchBackend for RecordingBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Custom("recording")
    }

    fn name(&self) -> &'static str {
        "recording"
    }

    async fn index_document(
        &self,
        index: &str,
        id: Option<&str>,
        source: &Fields,
    ) -> BackendResult<WriteReceipt> {
        self.enter()?;
        self.inner.index_document(index, id, source).await
    }

    async fn create_document(
        &self,
        index: &str,
        id: &str,
        source: &Fields,
    ) -> BackendResult<WriteReceipt> {
        self.enter()?;
        self.inner.create_document(index, id, source).await
    }

    async fn get_document(&self, index: &str, id: &str) -> BackendResult<Option<Value>> {
        self.enter()?;
        self.inner.get_document(index, id).await
    }

    async fn delete_document(&self, index: &str, id: &str) -> BackendResult<()> {
        self.enter()?;
        self.inner.delete_document(index, id).await
    }

    async fn search(&self, index: Option<&str>, body: &Value) -> BackendResult<Value> {
        self.enter()?;
        *self.last_search.lock() = Some(body.clone());
        self.inner.search(index, body).await
    }

    async fn multi_search(&self, requests: &[(Option<String>, Value)]) -> BackendResult<Value> {
        self.enter()?;
        self.inner.multi_search(requests).await
    }

    async fn bulk(&self, operations: &[BulkOperation]) -> BackendResult<Value> {
        self.enter()?;
        self.inner.bulk(operations).await
    }

    async fn index_exists(&self, index: &str) -> BackendResult<bool> {
        self.enter()?;
        self.inner.index_exists(index).await
    }

    async fn create_index(&self, index: &str, mapping: Option<&Value>) -> BackendResult<()> {
        self.enter()?;
        self.inner.create_index(index, mapping).await
    }

    async fn delete_index(&self, index: &str) -> BackendResult<()> {
        self.enter()?;
        self.inner.delete_index(index).await
    }

    async fn cluster_health(&self) -> BackendResult<Value> {
        self.enter()?;
        self.inner.cluster_health().await
    }

    async fn cluster_info(&self) -> BackendResult<Value> {
        self.enter()?;
        self.inner.cluster_info().await
    }
}

/// Services wired to one shared recording backend.
pub struct Harness {
    pub backend: Arc<RecordingBackend>,
    pub documents: DocumentService<RecordingBackend>,
    pub search: SearchService<RecordingBackend>,
    pub indices: IndexService<RecordingBackend>,
}

impl Harness {
    pub fn new() -> Self {
        let backend = Arc::new(RecordingBackend::new());
        Self {
            documents: DocumentService::new(backend.clone()),
            search: SearchService::new(backend.clone()),
            indices: IndexService::new(backend.clone()),
            backend,
        }
    }
}

/// Converts a JSON object literal into a field map.
pub fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture is not an object: {}", other),
    }
}

/// Seeds a few products through the document service.
pub async fn seed_products(harness: &Harness) {
    let products = [
        ("p1", "Laptop Pro", 1999, "acme"),
        ("p2", "Laptop Air", 999, "acme"),
        ("p3", "Desk Lamp", 49, "globex"),
    ];
    for (id, name, price, brand) in products {
        harness
            .documents
            .create_with_id(
                "products",
                id,
                fields(serde_json::json!({"name": name, "price": price, "brand": brand})),
            )
            .await
            .unwrap();
    }
}
