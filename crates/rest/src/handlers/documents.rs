//! Document lifecycle handlers.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | POST | `/documents` | [`create_document_handler`] |
//! | GET | `/documents/{index}/{id}` | [`get_document_handler`] |
//! | PUT | `/documents/{index}/{id}` | [`update_document_handler`] |
//! | DELETE | `/documents/{index}/{id}` | [`delete_document_handler`] |
//! | POST | `/documents/bulk` | [`bulk_index_handler`] |
//! | POST | `/documents/bulk-delete` | [`bulk_delete_handler`] |

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sift_persistence::core::SearchBackend;
use sift_persistence::types::{BulkReport, Document};
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::JsonBody;
use crate::requests::{
    BulkDeleteRequest, BulkIndexRequest, CreateDocumentRequest, UpdateDocumentRequest,
};
use crate::state::AppState;

/// Handler for document creation.
///
/// Uses the caller's id when the body carries one; otherwise the backend
/// assigns an id.
///
/// # Response
///
/// - `201 Created` - the stored document at version 1
/// - `400 Bad Request` - validation failed
/// - `409 Conflict` - the id is taken
pub async fn create_document_handler<B>(
    State(state): State<AppState<B>>,
    JsonBody(body): JsonBody<CreateDocumentRequest>,
) -> RestResult<(StatusCode, Json<Document>)>
where
    B: SearchBackend + 'static,
{
    debug!(index = %body.index, id = ?body.id, "Processing create request");

    let document = match body.id.as_deref() {
        Some(id) if !id.is_empty() => {
            state
                .documents()
                .create_with_id(&body.index, id, body.source)
                .await?
        }
        _ => state.documents().create(&body.index, body.source).await?,
    };

    Ok((StatusCode::CREATED, Json(document)))
}

/// Handler for reading a document.
///
/// # Response
///
/// - `200 OK` - the document
/// - `404 Not Found` - no such document
pub async fn get_document_handler<B>(
    State(state): State<AppState<B>>,
    Path((index, id)): Path<(String, String)>,
) -> RestResult<Json<Document>>
where
    B: SearchBackend + 'static,
{
    debug!(index = %index, id = %id, "Processing read request");

    let document = state.documents().get(&index, &id).await?;
    Ok(Json(document))
}

/// Handler for replacing a document's fields.
///
/// # Response
///
/// - `200 OK` - the updated document with its version bumped
/// - `404 Not Found` - no such document
pub async fn update_document_handler<B>(
    State(state): State<AppState<B>>,
    Path((index, id)): Path<(String, String)>,
    JsonBody(body): JsonBody<UpdateDocumentRequest>,
) -> RestResult<Json<Document>>
where
    B: SearchBackend + 'static,
{
    debug!(index = %index, id = %id, "Processing update request");

    let document = state.documents().update(&index, &id, body.source).await?;
    Ok(Json(document))
}

/// Handler for deleting a document.
///
/// # Response
///
/// - `204 No Content` - deleted
/// - `404 Not Found` - no such document
pub async fn delete_document_handler<B>(
    State(state): State<AppState<B>>,
    Path((index, id)): Path<(String, String)>,
) -> RestResult<StatusCode>
where
    B: SearchBackend + 'static,
{
    debug!(index = %index, id = %id, "Processing delete request");

    state.documents().delete(&index, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for bulk indexing.
///
/// Every document is validated before anything is sent; the per-item
/// outcome of the backend is returned as-is.
pub async fn bulk_index_handler<B>(
    State(state): State<AppState<B>>,
    JsonBody(body): JsonBody<BulkIndexRequest>,
) -> RestResult<Json<BulkReport>>
where
    B: SearchBackend + 'static,
{
    debug!(count = body.documents.len(), "Processing bulk index request");

    let report = state.documents().bulk_index(body.documents).await?;
    Ok(Json(report))
}

/// Handler for bulk deletion.
pub async fn bulk_delete_handler<B>(
    State(state): State<AppState<B>>,
    JsonBody(body): JsonBody<BulkDeleteRequest>,
) -> RestResult<Json<BulkReport>>
where
    B: SearchBackend + 'static,
{
    debug!(count = body.ids.len(), "Processing bulk delete request");

    let report = state
        .documents()
        .bulk_delete(&body.indices, &body.ids)
        .await?;
    Ok(Json(report))
}
