//! Single-document operations for Elasticsearch.

use elasticsearch::{CreateParts, DeleteParts, GetParts, IndexParts};
use serde_json::Value;
use tracing::debug;

use crate::error::{BackendError, BackendResult};
use crate::types::{Fields, WriteReceipt};

use super::backend::{BACKEND_NAME, ElasticsearchBackend, json_body, transport_error};

fn receipt(body: &Value) -> BackendResult<WriteReceipt> {
    WriteReceipt::from_response(body).ok_or_else(|| BackendError::SerializationError {
        message: "write response has no _id".to_string(),
    })
}

impl ElasticsearchBackend {
    pub(crate) async fn put_document(
        &self,
        index: &str,
        id: Option<&str>,
        source: &Fields,
    ) -> BackendResult<WriteReceipt> {
        let parts = match id {
            Some(id) => IndexParts::IndexId(index, id),
            None => IndexParts::Index(index),
        };

        let response = self
            .client()
            .index(parts)
            .refresh(self.write_refresh())
            .body(source)
            .send()
            .await
            .map_err(transport_error)?;

        let body = json_body(response).await?;
        let receipt = receipt(&body)?;
        debug!(index, id = %receipt.id, version = receipt.version, "Indexed document");
        Ok(receipt)
    }

    pub(crate) async fn put_new_document(
        &self,
        index: &str,
        id: &str,
        source: &Fields,
    ) -> BackendResult<WriteReceipt> {
        let response = self
            .client()
            .create(CreateParts::IndexId(index, id))
            .refresh(self.write_refresh())
            .body(source)
            .send()
            .await
            .map_err(transport_error)?;

        if response.status_code().as_u16() == 409 {
            return Err(BackendError::Conflict {
                backend_name: BACKEND_NAME.to_string(),
                index: index.to_string(),
                id: id.to_string(),
            });
        }

        let body = json_body(response).await?;
        debug!(index, id, "Created document");
        receipt(&body)
    }

    pub(crate) async fn fetch_document(&self, index: &str, id: &str) -> BackendResult<Option<Value>> {
        let response = self
            .client()
            .get(GetParts::IndexId(index, id))
            .send()
            .await
            .map_err(transport_error)?;

        // Missing document and missing index both answer 404
        if response.status_code().as_u16() == 404 {
            return Ok(None);
        }

        let body = json_body(response).await?;
        if body.get("found").and_then(Value::as_bool) == Some(false) {
            return Ok(None);
        }
        Ok(Some(body))
    }

    pub(crate) async fn remove_document(&self, index: &str, id: &str) -> BackendResult<()> {
        let response = self
            .client()
            .delete(DeleteParts::IndexId(index, id))
            .refresh(self.write_refresh())
            .send()
            .await
            .map_err(transport_error)?;

        if response.status_code().as_u16() == 404 {
            return Err(BackendError::DocumentNotFound {
                backend_name: BACKEND_NAME.to_string(),
                index: index.to_string(),
                id: id.to_string(),
            });
        }

        json_body(response).await?;
        debug!(index, id, "Deleted document");
        Ok(())
    }
}
