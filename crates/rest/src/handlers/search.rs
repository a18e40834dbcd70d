//! Search handlers.
//!
//! All search endpoints answer with a [`SearchResponse`] (or a list of them
//! for multi-search).

use axum::{Json, extract::State};
use sift_persistence::core::SearchBackend;
use sift_persistence::types::SearchQuery;
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::{JsonBody, SearchParams};
use crate::requests::{FacetSearchRequest, MultiSearchRequest, SearchRequest};
use crate::responses::{MultiSearchResponse, SearchResponse};
use crate::state::AppState;

/// Handler for `GET /search?q=&index=&from=&size=`.
///
/// # Response
///
/// - `200 OK` - search results
/// - `400 Bad Request` - `q` missing, or `from`/`size` malformed
pub async fn search_get_handler<B>(
    State(state): State<AppState<B>>,
    params: SearchParams,
) -> RestResult<Json<SearchResponse>>
where
    B: SearchBackend + 'static,
{
    let q = params.require_query()?;
    debug!(query = %q, index = %params.index, "Processing search request");

    let mut query = SearchQuery::new(q).with_index(params.index.as_str());
    query.pagination = params.pagination()?;

    let result = state.search().search(query).await?;
    Ok(Json(result.into()))
}

/// Handler for `POST /search`, which adds filters and sort.
pub async fn search_post_handler<B>(
    State(state): State<AppState<B>>,
    JsonBody(body): JsonBody<SearchRequest>,
) -> RestResult<Json<SearchResponse>>
where
    B: SearchBackend + 'static,
{
    debug!(query = %body.query, index = %body.index, "Processing advanced search request");

    let result = state.search().advanced_search(body.into_query()?).await?;
    Ok(Json(result.into()))
}

/// Handler for `POST /search/multi`.
pub async fn multi_search_handler<B>(
    State(state): State<AppState<B>>,
    JsonBody(body): JsonBody<MultiSearchRequest>,
) -> RestResult<Json<MultiSearchResponse>>
where
    B: SearchBackend + 'static,
{
    debug!(count = body.searches.len(), "Processing multi-search request");

    let queries = body
        .searches
        .into_iter()
        .map(SearchRequest::into_query)
        .collect::<RestResult<Vec<_>>>()?;

    let results = state.search().multi_search(queries).await?;
    Ok(Json(results.into()))
}

/// Handler for `GET /search/suggest?q=&field=&index=&size=`.
///
/// Returns documents with a term starting with `q`.
pub async fn suggest_handler<B>(
    State(state): State<AppState<B>>,
    params: SearchParams,
) -> RestResult<Json<SearchResponse>>
where
    B: SearchBackend + 'static,
{
    let q = params.require_query()?;
    debug!(prefix = %q, field = %params.field(), "Processing suggest request");

    let size = params.size.unwrap_or(0).max(0) as usize;
    let result = state
        .search()
        .suggest(&params.index, params.field(), q, size)
        .await?;
    Ok(Json(result.into()))
}

/// Handler for `POST /search/facets`.
pub async fn faceted_search_handler<B>(
    State(state): State<AppState<B>>,
    JsonBody(body): JsonBody<FacetSearchRequest>,
) -> RestResult<Json<SearchResponse>>
where
    B: SearchBackend + 'static,
{
    debug!(query = %body.search.query, facets = ?body.facets, "Processing faceted search request");

    let query = body.search.into_query()?;
    let result = state.search().faceted_search(query, body.facets).await?;
    Ok(Json(result.into()))
}

/// Handler for `GET /search/field?field=&value=&index=&from=&size=`.
pub async fn search_by_field_handler<B>(
    State(state): State<AppState<B>>,
    params: SearchParams,
) -> RestResult<Json<SearchResponse>>
where
    B: SearchBackend + 'static,
{
    debug!(field = %params.field(), value = %params.value(), "Processing field search request");

    let pagination = params.pagination()?;
    let result = state
        .search()
        .search_by_field(&params.index, params.field(), params.value(), pagination)
        .await?;
    Ok(Json(result.into()))
}
