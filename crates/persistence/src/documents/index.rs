//! Index management and cluster health.

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::core::SearchBackend;
use crate::error::{BackendError, IndexError, StorageResult};
use crate::types::HealthReport;

use super::rules::validate_index;

/// Creates, deletes and inspects indices.
#[derive(Debug)]
pub struct IndexService<B> {
    backend: Arc<B>,
}

impl<B> Clone for IndexService<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: SearchBackend> IndexService<B> {
    /// Creates an index service over `backend`.
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Creates an index with an optional mapping body.
    pub async fn create_index(&self, index: &str, mapping: Option<&Value>) -> StorageResult<()> {
        validate_index(index)?;

        if self.index_exists(index).await? {
            return Err(IndexError::AlreadyExists {
                index: index.to_string(),
            }
            .into());
        }

        self.backend
            .create_index(index, mapping)
            .await
            .map_err(|source| match source {
                BackendError::IndexAlreadyExists { .. } => IndexError::AlreadyExists {
                    index: index.to_string(),
                },
                source => {
                    warn!(index, error = %source, "Failed to create index");
                    IndexError::CreateFailed {
                        index: index.to_string(),
                        source,
                    }
                }
            })?;

        info!(index, "Created index");
        Ok(())
    }

    /// Deletes an index.
    pub async fn delete_index(&self, index: &str) -> StorageResult<()> {
        validate_index(index)?;

        if !self.index_exists(index).await? {
            return Err(IndexError::NotFound {
                index: index.to_string(),
            }
            .into());
        }

        self.backend
            .delete_index(index)
            .await
            .map_err(|source| match source {
                BackendError::IndexNotFound { .. } => IndexError::NotFound {
                    index: index.to_string(),
                },
                source => {
                    warn!(index, error = %source, "Failed to delete index");
                    IndexError::DeleteFailed {
                        index: index.to_string(),
                        source,
                    }
                }
            })?;

        info!(index, "Deleted index");
        Ok(())
    }

    /// Checks whether an index exists.
    pub async fn index_exists(&self, index: &str) -> StorageResult<bool> {
        validate_index(index)?;

        let exists = self
            .backend
            .index_exists(index)
            .await
            .map_err(|source| IndexError::ExistsFailed {
                index: index.to_string(),
                source,
            })?;
        Ok(exists)
    }

    /// Summarizes cluster health. Never fails: an unreachable cluster is
    /// reported as unhealthy.
    pub async fn health(&self) -> HealthReport {
        let health = match self.backend.cluster_health().await {
            Ok(health) => health,
            Err(e) => {
                warn!(error = %e, "Cluster health check failed");
                return HealthReport::unavailable();
            }
        };

        // Info only adds version details; missing info is not a health failure
        let info = self.backend.cluster_info().await.unwrap_or_else(|e| {
            warn!(error = %e, "Cluster info request failed");
            Value::Null
        });

        HealthReport::from_cluster(&health, &info)
    }
}
