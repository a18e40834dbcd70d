//! The search pipeline: validate, apply rules, build, execute, normalize,
//! post-process.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::core::SearchBackend;
use crate::error::{SearchError, StorageResult, ValidationError};
use crate::types::{DEFAULT_PAGE_SIZE, Pagination, SearchQuery, SearchResult};

use super::normalizer::normalize;
use super::query_builder::EsQueryBuilder;
use super::rules::{apply_search_rules, post_process_results, validate_search_input};

/// Page size used for suggestions when the caller does not ask for one.
pub const DEFAULT_SUGGEST_SIZE: usize = 5;

/// Runs searches against a backend.
#[derive(Debug)]
pub struct SearchService<B> {
    backend: Arc<B>,
    builder: EsQueryBuilder,
}

impl<B> Clone for SearchService<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            builder: self.builder,
        }
    }
}

impl<B: SearchBackend> SearchService<B> {
    /// Creates a search service over `backend`.
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            builder: EsQueryBuilder::new(),
        }
    }

    /// Returns the backend.
    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Runs a free-text search.
    pub async fn search(&self, query: SearchQuery) -> StorageResult<SearchResult> {
        let query = self.prepare(query)?;
        let es = self.builder.build(&query);

        debug!(index = ?es.index, query = %query.query, "Executing search");

        let raw = self
            .backend
            .search(es.index.as_deref(), &es.body)
            .await
            .map_err(|source| {
                warn!(error = %source, "Search failed");
                SearchError::Failed {
                    operation: "search",
                    source,
                }
            })?;

        self.finish(query, &raw)
    }

    /// Runs a search with filters; empty filter keys or values are dropped.
    pub async fn advanced_search(&self, mut query: SearchQuery) -> StorageResult<SearchResult> {
        query
            .filters
            .retain(|key, value| !key.is_empty() && !value.is_empty());
        self.search(query).await
    }

    /// Runs several searches in one backend round trip.
    ///
    /// Results come back in request order. Any failing entry fails the whole
    /// call.
    pub async fn multi_search(&self, queries: Vec<SearchQuery>) -> StorageResult<Vec<SearchResult>> {
        if queries.is_empty() {
            return Err(ValidationError::EmptyBatch {
                message: "No search requests provided",
            }
            .into());
        }

        let prepared = queries
            .into_iter()
            .enumerate()
            .map(|(i, q)| self.prepare(q).map_err(|e| e.at("Query", i)))
            .collect::<Result<Vec<_>, _>>()?;

        let requests: Vec<(Option<String>, Value)> = prepared
            .iter()
            .map(|q| {
                let es = self.builder.build(q);
                (es.index, es.body)
            })
            .collect();

        debug!(count = requests.len(), "Executing multi-search");

        let raw = self
            .backend
            .multi_search(&requests)
            .await
            .map_err(|source| {
                warn!(error = %source, "Multi-search failed");
                SearchError::Failed {
                    operation: "multi_search",
                    source,
                }
            })?;

        let responses = raw
            .get("responses")
            .and_then(Value::as_array)
            .ok_or_else(|| SearchError::MalformedResponse {
                message: "multi-search response has no responses array".to_string(),
            })?;

        if responses.len() != prepared.len() {
            return Err(SearchError::MalformedResponse {
                message: format!(
                    "expected {} multi-search responses, got {}",
                    prepared.len(),
                    responses.len()
                ),
            }
            .into());
        }

        prepared
            .into_iter()
            .zip(responses)
            .enumerate()
            .map(|(position, (query, response))| -> StorageResult<SearchResult> {
                if let Some(error) = response.get("error") {
                    let reason = error
                        .get("reason")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .unwrap_or_else(|| error.to_string());
                    warn!(position, %reason, "Multi-search entry failed");
                    return Err(SearchError::ItemFailed { position, reason }.into());
                }
                self.finish(query, response)
            })
            .collect()
    }

    /// Suggests documents whose terms start with `prefix`.
    pub async fn suggest(
        &self,
        index: &str,
        field: &str,
        prefix: &str,
        size: usize,
    ) -> StorageResult<SearchResult> {
        if prefix.is_empty() {
            return Err(ValidationError::EmptyField {
                field: "Search query",
            }
            .into());
        }
        if field.is_empty() {
            return Err(ValidationError::EmptyField {
                field: "Field for suggestion",
            }
            .into());
        }

        let size = if size == 0 { DEFAULT_SUGGEST_SIZE } else { size };
        let query = SearchQuery::new(format!("{}*", prefix))
            .with_index(index)
            .with_pagination(0, size);

        self.search(query).await
    }

    /// Runs a search that also returns bucket counts for `facets`.
    pub async fn faceted_search(
        &self,
        query: SearchQuery,
        facets: Vec<String>,
    ) -> StorageResult<SearchResult> {
        if facets.iter().all(|f| f.trim().is_empty()) {
            return Err(ValidationError::EmptyField {
                field: "Facet fields",
            }
            .into());
        }
        self.search(query.with_facets(facets)).await
    }

    /// Finds documents whose `field` equals `value`.
    pub async fn search_by_field(
        &self,
        index: &str,
        field: &str,
        value: &str,
        pagination: Pagination,
    ) -> StorageResult<SearchResult> {
        if field.is_empty() {
            return Err(ValidationError::EmptyField { field: "Field" }.into());
        }
        if value.is_empty() {
            return Err(ValidationError::EmptyField { field: "Value" }.into());
        }

        let mut query = SearchQuery::new(value)
            .with_index(index)
            .with_filter(field, value);
        query.pagination = pagination;

        self.search(query).await
    }

    fn prepare(&self, mut query: SearchQuery) -> Result<SearchQuery, ValidationError> {
        validate_search_input(&query)?;
        if query.pagination.limit == 0 {
            query.pagination.limit = DEFAULT_PAGE_SIZE;
        }
        apply_search_rules(&mut query)?;
        Ok(query)
    }

    fn finish(&self, query: SearchQuery, raw: &Value) -> StorageResult<SearchResult> {
        let mut result = normalize(query, raw)?;
        post_process_results(&mut result);
        debug!(
            total = result.total,
            returned = result.hits.len(),
            took = result.took,
            "Search complete"
        );
        Ok(result)
    }
}
