//! Index management and cluster endpoints for Elasticsearch.

use elasticsearch::cluster::ClusterHealthParts;
use elasticsearch::indices::{IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts};
use serde_json::Value;
use tracing::debug;

use crate::error::{BackendError, BackendResult};

use super::backend::{BACKEND_NAME, ElasticsearchBackend, json_body, status_error, transport_error};

impl ElasticsearchBackend {
    pub(crate) async fn check_index(&self, index: &str) -> BackendResult<bool> {
        let response = self
            .client()
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(transport_error)?;

        match response.status_code().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            status => Err(status_error(status, String::new())),
        }
    }

    pub(crate) async fn put_index(&self, index: &str, mapping: Option<&Value>) -> BackendResult<()> {
        let indices = self.client().indices();
        let request = indices.create(IndicesCreateParts::Index(index));
        let response = match mapping {
            Some(mapping) => request.body(mapping).send().await,
            None => request.send().await,
        }
        .map_err(transport_error)?;

        let status = response.status_code().as_u16();
        if status == 400 {
            let text = response.text().await.unwrap_or_default();
            if text.contains("resource_already_exists_exception") {
                return Err(BackendError::IndexAlreadyExists {
                    backend_name: BACKEND_NAME.to_string(),
                    index: index.to_string(),
                });
            }
            return Err(status_error(status, text));
        }

        json_body(response).await?;
        debug!(index, "Created index");
        Ok(())
    }

    pub(crate) async fn remove_index(&self, index: &str) -> BackendResult<()> {
        let response = self
            .client()
            .indices()
            .delete(IndicesDeleteParts::Index(&[index]))
            .send()
            .await
            .map_err(transport_error)?;

        if response.status_code().as_u16() == 404 {
            return Err(BackendError::IndexNotFound {
                backend_name: BACKEND_NAME.to_string(),
                index: index.to_string(),
            });
        }

        json_body(response).await?;
        debug!(index, "Deleted index");
        Ok(())
    }

    pub(crate) async fn fetch_cluster_health(&self) -> BackendResult<Value> {
        let response = self
            .client()
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| BackendError::Unavailable {
                backend_name: BACKEND_NAME.to_string(),
                message: format!("Health check failed: {}", e),
            })?;

        json_body(response).await
    }

    pub(crate) async fn fetch_cluster_info(&self) -> BackendResult<Value> {
        let response = self
            .client()
            .info()
            .send()
            .await
            .map_err(transport_error)?;

        json_body(response).await
    }
}
