//! Search, multi-search and bulk for Elasticsearch.

use elasticsearch::http::request::JsonBody;
use elasticsearch::{BulkParts, MsearchParts, SearchParts};
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::error::{BackendError, BackendResult};
use crate::types::BulkOperation;

use super::backend::{BACKEND_NAME, ElasticsearchBackend, json_body, status_error, transport_error};

/// Builds the NDJSON lines of a multi-search: one header and one body per
/// request.
pub(crate) fn msearch_lines(requests: &[(Option<String>, Value)]) -> Vec<JsonBody<Value>> {
    let mut lines = Vec::with_capacity(requests.len() * 2);
    for (index, body) in requests {
        let header = match index {
            Some(index) => json!({ "index": index }),
            None => json!({}),
        };
        lines.push(JsonBody::new(header));
        lines.push(JsonBody::new(body.clone()));
    }
    lines
}

/// Returns the action/metadata line of a bulk operation.
pub(crate) fn bulk_action_line(op: &BulkOperation) -> Value {
    let mut meta = Map::new();
    meta.insert("_index".to_string(), Value::from(op.index()));
    match op {
        BulkOperation::Index { id: Some(id), .. } | BulkOperation::Delete { id, .. } => {
            meta.insert("_id".to_string(), Value::from(id.as_str()));
        }
        BulkOperation::Index { id: None, .. } => {}
    }
    json!({ op.action(): meta })
}

/// Builds the NDJSON lines of a bulk request.
pub(crate) fn bulk_lines(operations: &[BulkOperation]) -> Vec<JsonBody<Value>> {
    let mut lines = Vec::with_capacity(operations.len() * 2);
    for op in operations {
        lines.push(JsonBody::new(bulk_action_line(op)));
        if let BulkOperation::Index { source, .. } = op {
            lines.push(JsonBody::new(Value::Object(source.clone())));
        }
    }
    lines
}

impl ElasticsearchBackend {
    pub(crate) async fn run_search(&self, index: Option<&str>, body: &Value) -> BackendResult<Value> {
        let indices: Vec<&str> = index.into_iter().collect();
        let parts = if indices.is_empty() {
            SearchParts::None
        } else {
            SearchParts::Index(&indices)
        };

        let response = self
            .client()
            .search(parts)
            .body(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status_code().as_u16();
        if status == 404 {
            let text = response.text().await.unwrap_or_default();
            if text.contains("index_not_found_exception") {
                return Err(BackendError::IndexNotFound {
                    backend_name: BACKEND_NAME.to_string(),
                    index: index.unwrap_or_default().to_string(),
                });
            }
            return Err(status_error(status, text));
        }

        debug!(?index, "Search executed");
        json_body(response).await
    }

    pub(crate) async fn run_multi_search(
        &self,
        requests: &[(Option<String>, Value)],
    ) -> BackendResult<Value> {
        let response = self
            .client()
            .msearch(MsearchParts::None)
            .body(msearch_lines(requests))
            .send()
            .await
            .map_err(transport_error)?;

        debug!(count = requests.len(), "Multi-search executed");
        json_body(response).await
    }

    pub(crate) async fn run_bulk(&self, operations: &[BulkOperation]) -> BackendResult<Value> {
        let response = self
            .client()
            .bulk(BulkParts::None)
            .refresh(self.write_refresh())
            .body(bulk_lines(operations))
            .send()
            .await
            .map_err(transport_error)?;

        debug!(count = operations.len(), "Bulk request executed");
        json_body(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_action_lines() {
        let index = BulkOperation::Index {
            index: "a".to_string(),
            id: None,
            source: Map::new(),
        };
        assert_eq!(bulk_action_line(&index), json!({"index": {"_index": "a"}}));

        let delete = BulkOperation::Delete {
            index: "a".to_string(),
            id: "7".to_string(),
        };
        assert_eq!(
            bulk_action_line(&delete),
            json!({"delete": {"_index": "a", "_id": "7"}})
        );
    }

    #[test]
    fn test_bulk_lines_pair_sources_with_index_actions() {
        let ops = vec![
            BulkOperation::Index {
                index: "a".to_string(),
                id: Some("1".to_string()),
                source: Map::new(),
            },
            BulkOperation::Delete {
                index: "a".to_string(),
                id: "2".to_string(),
            },
        ];
        assert_eq!(bulk_lines(&ops).len(), 3);
    }

    #[test]
    fn test_msearch_lines() {
        let requests = vec![
            (Some("a".to_string()), json!({"size": 1})),
            (None, json!({"size": 2})),
        ];
        assert_eq!(msearch_lines(&requests).len(), 4);
    }
}
