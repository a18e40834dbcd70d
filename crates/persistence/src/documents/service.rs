//! Document lifecycle: create, read, replace, delete, bulk.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::core::SearchBackend;
use crate::error::{BackendError, DocumentError, StorageResult, ValidationError};
use crate::types::{BulkOperation, BulkReport, Document, Fields, NewDocument};

use super::rules::{
    CREATED_AT_FIELD, apply_document_rules, validate_key, validate_new_document, validate_source,
};

/// Manages documents through a backend.
///
/// Documents move through `nonexistent -> created (v1) -> updated (v+1) ->
/// deleted`. Versions are advisory: the backend's reported version is
/// adopted after every write and never compared.
#[derive(Debug)]
pub struct DocumentService<B> {
    backend: Arc<B>,
}

impl<B> Clone for DocumentService<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: SearchBackend> DocumentService<B> {
    /// Creates a document service over `backend`.
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Returns the backend.
    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Creates a document; the backend assigns its id.
    pub async fn create(&self, index: &str, source: Fields) -> StorageResult<Document> {
        validate_new_document(index, &source)?;

        let mut doc = Document::new(index, "", source);
        apply_document_rules(&mut doc)?;

        let receipt = self
            .backend
            .index_document(index, None, &doc.source)
            .await
            .map_err(|source| {
                warn!(index, error = %source, "Failed to create document");
                DocumentError::CreateFailed {
                    index: index.to_string(),
                    source,
                }
            })?;

        doc.id = receipt.id;
        doc.version = receipt.version;
        info!(index, id = %doc.id, "Created document");
        Ok(doc)
    }

    /// Creates a document with a caller-chosen id.
    ///
    /// Fails with `DOCUMENT_EXISTS` when the id is taken, whether that is seen
    /// by the existence check or by the backend's create-if-absent write.
    pub async fn create_with_id(
        &self,
        index: &str,
        id: &str,
        source: Fields,
    ) -> StorageResult<Document> {
        validate_key(index, id)?;
        validate_source(&source)?;

        if self.get(index, id).await.is_ok() {
            return Err(DocumentError::AlreadyExists {
                index: index.to_string(),
                id: id.to_string(),
            }
            .into());
        }

        let mut doc = Document::new(index, id, source);
        apply_document_rules(&mut doc)?;

        let receipt = self
            .backend
            .create_document(index, id, &doc.source)
            .await
            .map_err(|source| match source {
                BackendError::Conflict { .. } => DocumentError::AlreadyExists {
                    index: index.to_string(),
                    id: id.to_string(),
                },
                source => {
                    warn!(index, id, error = %source, "Failed to create document");
                    DocumentError::CreateFailed {
                        index: index.to_string(),
                        source,
                    }
                }
            })?;

        doc.version = receipt.version;
        info!(index, id, "Created document");
        Ok(doc)
    }

    /// Fetches a document.
    ///
    /// Backend failures other than not-found are reported as
    /// `DOCUMENT_NOT_FOUND` with the cause attached.
    pub async fn get(&self, index: &str, id: &str) -> StorageResult<Document> {
        validate_key(index, id)?;

        let raw = self
            .backend
            .get_document(index, id)
            .await
            .map_err(|source| match source {
                BackendError::DocumentNotFound { .. } | BackendError::IndexNotFound { .. } => {
                    DocumentError::NotFound {
                        index: index.to_string(),
                        id: id.to_string(),
                    }
                }
                source => DocumentError::LookupFailed {
                    index: index.to_string(),
                    id: id.to_string(),
                    source,
                },
            })?
            .ok_or_else(|| DocumentError::NotFound {
                index: index.to_string(),
                id: id.to_string(),
            })?;

        let doc = Document::from_backend(&raw).ok_or_else(|| DocumentError::InvalidFormat {
            index: index.to_string(),
            id: id.to_string(),
        })?;

        debug!(index, id, version = doc.version, "Fetched document");
        Ok(doc)
    }

    /// Replaces every field of an existing document.
    pub async fn update(&self, index: &str, id: &str, source: Fields) -> StorageResult<Document> {
        validate_key(index, id)?;
        validate_source(&source)?;

        let mut doc = self.get(index, id).await?;

        let mut source = source;
        if let Some(created) = doc.source.get(CREATED_AT_FIELD) {
            source
                .entry(CREATED_AT_FIELD)
                .or_insert_with(|| created.clone());
        }
        doc.replace_source(source);
        apply_document_rules(&mut doc)?;

        let receipt = self
            .backend
            .index_document(index, Some(id), &doc.source)
            .await
            .map_err(|source| {
                warn!(index, id, error = %source, "Failed to update document");
                DocumentError::UpdateFailed {
                    index: index.to_string(),
                    id: id.to_string(),
                    source,
                }
            })?;

        doc.version = receipt.version;
        info!(index, id, version = doc.version, "Updated document");
        Ok(doc)
    }

    /// Deletes an existing document.
    pub async fn delete(&self, index: &str, id: &str) -> StorageResult<()> {
        self.get(index, id).await?;

        self.backend
            .delete_document(index, id)
            .await
            .map_err(|source| match source {
                BackendError::DocumentNotFound { .. } => DocumentError::NotFound {
                    index: index.to_string(),
                    id: id.to_string(),
                },
                source => {
                    warn!(index, id, error = %source, "Failed to delete document");
                    DocumentError::DeleteFailed {
                        index: index.to_string(),
                        id: id.to_string(),
                        source,
                    }
                }
            })?;

        info!(index, id, "Deleted document");
        Ok(())
    }

    /// Indexes many documents in one backend submission.
    ///
    /// Every document is validated and has the rules applied before anything
    /// is sent; the first failure is reported with its position.
    pub async fn bulk_index(&self, documents: Vec<NewDocument>) -> StorageResult<BulkReport> {
        if documents.is_empty() {
            return Err(ValidationError::EmptyBatch {
                message: "No documents provided for bulk indexing",
            }
            .into());
        }

        let operations = documents
            .into_iter()
            .enumerate()
            .map(|(position, new)| {
                prepare_bulk_document(new).map_err(|e| e.at("Document", position))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let raw = self.backend.bulk(&operations).await.map_err(|source| {
            warn!(count = operations.len(), error = %source, "Bulk indexing failed");
            DocumentError::BulkIndexFailed { source }
        })?;

        let report = BulkReport::from_response(&raw);
        info!(
            count = report.items.len(),
            failed = report.failed(),
            "Bulk indexed documents"
        );
        Ok(report)
    }

    /// Deletes many documents in one backend submission.
    ///
    /// `indices[i]` and `ids[i]` name the i-th document.
    pub async fn bulk_delete(&self, indices: &[String], ids: &[String]) -> StorageResult<BulkReport> {
        if indices.len() != ids.len() {
            return Err(ValidationError::LengthMismatch {
                indices: indices.len(),
                ids: ids.len(),
            }
            .into());
        }
        if ids.is_empty() {
            return Err(ValidationError::EmptyBatch {
                message: "No documents provided for bulk deletion",
            }
            .into());
        }

        let operations = indices
            .iter()
            .zip(ids)
            .enumerate()
            .map(|(position, (index, id))| -> Result<BulkOperation, ValidationError> {
                validate_key(index, id).map_err(|e| e.at("Document", position))?;
                Ok(BulkOperation::Delete {
                    index: index.clone(),
                    id: id.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let raw = self.backend.bulk(&operations).await.map_err(|source| {
            warn!(count = operations.len(), error = %source, "Bulk deletion failed");
            DocumentError::BulkDeleteFailed { source }
        })?;

        let report = BulkReport::from_response(&raw);
        info!(
            count = report.items.len(),
            failed = report.failed(),
            "Bulk deleted documents"
        );
        Ok(report)
    }
}

fn prepare_bulk_document(new: NewDocument) -> Result<BulkOperation, ValidationError> {
    validate_new_document(&new.index, &new.source)?;
    if let Some(id) = &new.id {
        validate_key(&new.index, id)?;
    }

    let mut doc = Document::new(new.index, new.id.clone().unwrap_or_default(), new.source);
    apply_document_rules(&mut doc)?;

    Ok(BulkOperation::Index {
        index: doc.index,
        id: new.id,
        source: doc.source,
    })
}
