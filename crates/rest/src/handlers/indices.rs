//! Index management handlers.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use sift_persistence::core::SearchBackend;
use tracing::debug;

use crate::error::{RestError, RestResult};
use crate::requests::CreateIndexRequest;
use crate::responses::IndexStatusResponse;
use crate::state::AppState;

/// Handler for `PUT /indices/{index}`.
///
/// The body is optional; when present it is `{"mapping": {...}}` and the
/// mapping is passed to the backend untouched.
///
/// # Response
///
/// - `201 Created` - the index was created
/// - `409 Conflict` - the index already exists
pub async fn create_index_handler<B>(
    State(state): State<AppState<B>>,
    Path(index): Path<String>,
    body: Bytes,
) -> RestResult<StatusCode>
where
    B: SearchBackend + 'static,
{
    debug!(index = %index, "Processing create index request");

    let request: CreateIndexRequest = if body.iter().all(u8::is_ascii_whitespace) {
        CreateIndexRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| RestError::invalid_request(format!("Invalid request body: {}", e)))?
    };

    state
        .indices()
        .create_index(&index, request.mapping.as_ref())
        .await?;
    Ok(StatusCode::CREATED)
}

/// Handler for `DELETE /indices/{index}`.
pub async fn delete_index_handler<B>(
    State(state): State<AppState<B>>,
    Path(index): Path<String>,
) -> RestResult<StatusCode>
where
    B: SearchBackend + 'static,
{
    debug!(index = %index, "Processing delete index request");

    state.indices().delete_index(&index).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for `GET /indices/{index}`.
pub async fn index_status_handler<B>(
    State(state): State<AppState<B>>,
    Path(index): Path<String>,
) -> RestResult<Json<IndexStatusResponse>>
where
    B: SearchBackend + 'static,
{
    debug!(index = %index, "Processing index status request");

    let exists = state.indices().index_exists(&index).await?;
    Ok(Json(IndexStatusResponse { index, exists }))
}
