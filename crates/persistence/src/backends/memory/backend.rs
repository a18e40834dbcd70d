//! In-process backend.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{Value, json};
use tracing::debug;
use uuid::Uuid;

use crate::core::{BackendKind, SearchBackend};
use crate::error::{BackendError, BackendResult};
use crate::types::{BulkOperation, Fields, WriteReceipt};

use super::search::{Candidate, execute};

const BACKEND_NAME: &str = "memory";

#[derive(Debug, Clone)]
struct StoredDocument {
    source: Fields,
    version: i64,
}

#[derive(Debug, Default)]
struct StoredIndex {
    mapping: Option<Value>,
    documents: BTreeMap<String, StoredDocument>,
}

/// A backend that keeps every index in process memory.
///
/// Follows Elasticsearch semantics where the gateway can observe them:
/// indices are created on first write, versions start at 1 and grow by one
/// per write, and responses have the same JSON shapes. Search is a naive
/// evaluator, not a relevance engine.
///
/// # Example
///
/// ```
/// use sift_persistence::backends::memory::MemoryBackend;
/// use sift_persistence::core::SearchBackend;
/// use serde_json::{json, Map};
///
/// # tokio_test::block_on(async {
/// let backend = MemoryBackend::new();
/// let mut source = Map::new();
/// source.insert("title".to_string(), json!("A"));
///
/// let receipt = backend.index_document("articles", Some("1"), &source).await.unwrap();
/// assert_eq!(receipt.version, 1);
/// assert!(backend.index_exists("articles").await.unwrap());
/// # });
/// ```
#[derive(Debug, Default)]
pub struct MemoryBackend {
    indices: RwLock<BTreeMap<String, StoredIndex>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in `index` (0 when the index does not exist).
    pub fn document_count(&self, index: &str) -> usize {
        self.indices
            .read()
            .get(index)
            .map(|i| i.documents.len())
            .unwrap_or(0)
    }

    /// Returns the mapping an index was created with.
    pub fn mapping(&self, index: &str) -> Option<Value> {
        self.indices.read().get(index)?.mapping.clone()
    }

    fn write(
        &self,
        index: &str,
        id: Option<&str>,
        source: &Fields,
        create_only: bool,
    ) -> BackendResult<WriteReceipt> {
        let id = id
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string());

        let mut indices = self.indices.write();
        let documents = &mut indices.entry(index.to_string()).or_default().documents;

        let version = match documents.get(&id) {
            Some(_) if create_only => {
                return Err(BackendError::Conflict {
                    backend_name: BACKEND_NAME.to_string(),
                    index: index.to_string(),
                    id,
                });
            }
            Some(existing) => existing.version + 1,
            None => 1,
        };

        documents.insert(
            id.clone(),
            StoredDocument {
                source: source.clone(),
                version,
            },
        );

        debug!(index, id = %id, version, "Stored document");
        Ok(WriteReceipt { id, version })
    }

    fn remove(&self, index: &str, id: &str) -> BackendResult<()> {
        let mut indices = self.indices.write();
        let removed = indices
            .get_mut(index)
            .and_then(|i| i.documents.remove(id));

        match removed {
            Some(_) => Ok(()),
            None => Err(BackendError::DocumentNotFound {
                backend_name: BACKEND_NAME.to_string(),
                index: index.to_string(),
                id: id.to_string(),
            }),
        }
    }

    fn run_search(&self, index: Option<&str>, body: &Value) -> BackendResult<Value> {
        let indices = self.indices.read();

        if let Some(index) = index {
            if !indices.contains_key(index) {
                return Err(index_not_found(index));
            }
        }

        let candidates: Vec<Candidate<'_>> = indices
            .iter()
            .filter(|(name, _)| index.is_none_or(|i| i == name.as_str()))
            .flat_map(|(name, stored)| {
                stored.documents.iter().map(move |(id, doc)| Candidate {
                    index: name,
                    id,
                    source: &doc.source,
                })
            })
            .collect();

        Ok(execute(&candidates, body))
    }
}

fn index_not_found(index: &str) -> BackendError {
    BackendError::IndexNotFound {
        backend_name: BACKEND_NAME.to_string(),
        index: index.to_string(),
    }
}

fn item_error(status: u16, kind: &str, reason: String) -> Value {
    json!({ "status": status, "error": { "type": kind, "reason": reason } })
}

#[async_trait]
impl SearchBackend for MemoryBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn index_document(
        &self,
        index: &str,
        id: Option<&str>,
        source: &Fields,
    ) -> BackendResult<WriteReceipt> {
        self.write(index, id, source, false)
    }

    async fn create_document(
        &self,
        index: &str,
        id: &str,
        source: &Fields,
    ) -> BackendResult<WriteReceipt> {
        self.write(index, Some(id), source, true)
    }

    async fn get_document(&self, index: &str, id: &str) -> BackendResult<Option<Value>> {
        let indices = self.indices.read();
        let doc = indices.get(index).and_then(|i| i.documents.get(id));

        Ok(doc.map(|doc| {
            json!({
                "_index": index,
                "_id": id,
                "_version": doc.version,
                "found": true,
                "_source": doc.source,
            })
        }))
    }

    async fn delete_document(&self, index: &str, id: &str) -> BackendResult<()> {
        self.remove(index, id)
    }

    async fn search(&self, index: Option<&str>, body: &Value) -> BackendResult<Value> {
        self.run_search(index, body)
    }

    async fn multi_search(&self, requests: &[(Option<String>, Value)]) -> BackendResult<Value> {
        let responses: Vec<Value> = requests
            .iter()
            .map(|(index, body)| match self.run_search(index.as_deref(), body) {
                Ok(mut response) => {
                    response["status"] = json!(200);
                    response
                }
                Err(e) => item_error(404, "index_not_found_exception", e.to_string()),
            })
            .collect();

        Ok(json!({ "took": 0, "responses": responses }))
    }

    async fn bulk(&self, operations: &[BulkOperation]) -> BackendResult<Value> {
        let mut errors = false;
        let items: Vec<Value> = operations
            .iter()
            .map(|op| {
                let outcome = match op {
                    BulkOperation::Index { index, id, source } => {
                        let created = id.as_deref().is_none_or(|id| !self.contains(index, id));
                        match self.write(index, id.as_deref(), source, false) {
                            Ok(receipt) => json!({
                                "_index": index,
                                "_id": receipt.id,
                                "_version": receipt.version,
                                "result": if created { "created" } else { "updated" },
                                "status": if created { 201 } else { 200 },
                            }),
                            Err(e) => {
                                let mut item = item_error(500, "exception", e.to_string());
                                item["_index"] = json!(index);
                                item
                            }
                        }
                    }
                    BulkOperation::Delete { index, id } => match self.remove(index, id) {
                        Ok(()) => json!({
                            "_index": index,
                            "_id": id,
                            "result": "deleted",
                            "status": 200,
                        }),
                        Err(_) => json!({
                            "_index": index,
                            "_id": id,
                            "result": "not_found",
                            "status": 404,
                        }),
                    },
                };

                let status = outcome.get("status").and_then(Value::as_u64).unwrap_or(0);
                if !(200..300).contains(&status) {
                    errors = true;
                }
                json!({ op.action(): outcome })
            })
            .collect();

        Ok(json!({ "took": 0, "errors": errors, "items": items }))
    }

    async fn index_exists(&self, index: &str) -> BackendResult<bool> {
        Ok(self.indices.read().contains_key(index))
    }

    async fn create_index(&self, index: &str, mapping: Option<&Value>) -> BackendResult<()> {
        let mut indices = self.indices.write();
        if indices.contains_key(index) {
            return Err(BackendError::IndexAlreadyExists {
                backend_name: BACKEND_NAME.to_string(),
                index: index.to_string(),
            });
        }
        indices.insert(
            index.to_string(),
            StoredIndex {
                mapping: mapping.cloned(),
                documents: BTreeMap::new(),
            },
        );
        Ok(())
    }

    async fn delete_index(&self, index: &str) -> BackendResult<()> {
        self.indices
            .write()
            .remove(index)
            .map(|_| ())
            .ok_or_else(|| index_not_found(index))
    }

    async fn cluster_health(&self) -> BackendResult<Value> {
        Ok(json!({
            "cluster_name": BACKEND_NAME,
            "status": "green",
            "number_of_nodes": 1,
        }))
    }

    async fn cluster_info(&self) -> BackendResult<Value> {
        Ok(json!({
            "cluster_name": BACKEND_NAME,
            "version": {
                "number": crate::VERSION,
                "lucene_version": "none",
            }
        }))
    }
}

impl MemoryBackend {
    fn contains(&self, index: &str, id: &str) -> bool {
        self.indices
            .read()
            .get(index)
            .is_some_and(|i| i.documents.contains_key(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(value: Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_versions_follow_writes() {
        let backend = MemoryBackend::new();
        let doc = source(json!({"title": "A"}));

        let first = backend.index_document("a", Some("1"), &doc).await.unwrap();
        let second = backend.index_document("a", Some("1"), &doc).await.unwrap();
        assert_eq!(first.version, 1);
        assert_eq!(second.version, 2);
    }

    #[tokio::test]
    async fn test_generated_ids_are_unique() {
        let backend = MemoryBackend::new();
        let doc = source(json!({"title": "A"}));

        let a = backend.index_document("a", None, &doc).await.unwrap();
        let b = backend.index_document("a", None, &doc).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(backend.document_count("a"), 2);
    }

    #[tokio::test]
    async fn test_create_conflicts_on_existing_id() {
        let backend = MemoryBackend::new();
        let doc = source(json!({"title": "A"}));

        backend.create_document("a", "1", &doc).await.unwrap();
        let err = backend.create_document("a", "1", &doc).await.unwrap_err();
        assert!(matches!(err, BackendError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_get_and_delete() {
        let backend = MemoryBackend::new();
        backend
            .index_document("a", Some("1"), &source(json!({"k": "v"})))
            .await
            .unwrap();

        let raw = backend.get_document("a", "1").await.unwrap().unwrap();
        assert_eq!(raw["_version"], 1);
        assert_eq!(raw["_source"]["k"], "v");

        backend.delete_document("a", "1").await.unwrap();
        assert!(backend.get_document("a", "1").await.unwrap().is_none());

        let err = backend.delete_document("a", "1").await.unwrap_err();
        assert!(matches!(err, BackendError::DocumentNotFound { .. }));
    }

    #[tokio::test]
    async fn test_search_unknown_index() {
        let backend = MemoryBackend::new();
        let err = backend.search(Some("missing"), &json!({})).await.unwrap_err();
        assert!(matches!(err, BackendError::IndexNotFound { .. }));
    }

    #[tokio::test]
    async fn test_bulk_reports_per_item_status() {
        let backend = MemoryBackend::new();
        let ops = vec![
            BulkOperation::Index {
                index: "a".to_string(),
                id: Some("1".to_string()),
                source: source(json!({"k": 1})),
            },
            BulkOperation::Delete {
                index: "a".to_string(),
                id: "missing".to_string(),
            },
        ];

        let raw = backend.bulk(&ops).await.unwrap();
        assert_eq!(raw["errors"], true);
        assert_eq!(raw["items"][0]["index"]["status"], 201);
        assert_eq!(raw["items"][1]["delete"]["status"], 404);
    }

    #[tokio::test]
    async fn test_multi_search_reports_missing_index_inline() {
        let backend = MemoryBackend::new();
        backend
            .index_document("a", Some("1"), &source(json!({"k": "v"})))
            .await
            .unwrap();

        let raw = backend
            .multi_search(&[
                (Some("a".to_string()), json!({"query": {"multi_match": {"query": "v"}}})),
                (Some("nope".to_string()), json!({})),
            ])
            .await
            .unwrap();

        assert_eq!(raw["responses"][0]["hits"]["total"]["value"], 1);
        assert!(raw["responses"][1].get("error").is_some());
    }

    #[tokio::test]
    async fn test_index_lifecycle() {
        let backend = MemoryBackend::new();
        let mapping = json!({"mappings": {"properties": {"title": {"type": "text"}}}});

        backend.create_index("a", Some(&mapping)).await.unwrap();
        assert!(backend.index_exists("a").await.unwrap());
        assert_eq!(backend.mapping("a"), Some(mapping));

        let err = backend.create_index("a", None).await.unwrap_err();
        assert!(matches!(err, BackendError::IndexAlreadyExists { .. }));

        backend.delete_index("a").await.unwrap();
        assert!(!backend.index_exists("a").await.unwrap());
        assert!(backend.delete_index("a").await.is_err());
    }

    #[test]
    fn test_blocking_use_outside_runtime() {
        let backend = MemoryBackend::new();
        let health = tokio_test::block_on(backend.cluster_health()).unwrap();
        assert_eq!(health["status"], "green");
    }
}
