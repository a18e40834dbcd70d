//! Route table for the sift HTTP API.

use axum::{
    Router,
    routing::{get, post},
};
use sift_persistence::core::SearchBackend;

use crate::handlers;
use crate::state::AppState;

/// Creates all API routes.
///
/// # Routes
///
/// ## Documents
/// - `POST /documents` - Create
/// - `POST /documents/bulk` - Bulk index
/// - `POST /documents/bulk-delete` - Bulk delete
/// - `GET /documents/{index}/{id}` - Read
/// - `PUT /documents/{index}/{id}` - Replace
/// - `DELETE /documents/{index}/{id}` - Delete
///
/// ## Search
/// - `GET /search` - Free-text search
/// - `POST /search` - Search with filters and sort
/// - `POST /search/multi` - Several searches in one round trip
/// - `GET /search/suggest` - Prefix suggestions
/// - `POST /search/facets` - Search with bucket counts
/// - `GET /search/field` - Exact field match
///
/// ## Indices
/// - `PUT /indices/{index}` - Create
/// - `DELETE /indices/{index}` - Delete
/// - `GET /indices/{index}` - Existence check
///
/// ## Health
/// - `GET /health`
/// - `GET /_liveness`
/// - `GET /_readiness`
pub fn create_routes<B>(state: AppState<B>) -> Router
where
    B: SearchBackend + 'static,
{
    Router::new()
        // Health
        .route("/health", get(handlers::health_handler::<B>))
        .route("/_liveness", get(handlers::liveness_handler))
        .route("/_readiness", get(handlers::readiness_handler::<B>))
        // Documents
        .route("/documents", post(handlers::create_document_handler::<B>))
        .route("/documents/bulk", post(handlers::bulk_index_handler::<B>))
        .route(
            "/documents/bulk-delete",
            post(handlers::bulk_delete_handler::<B>),
        )
        .route(
            "/documents/{index}/{id}",
            get(handlers::get_document_handler::<B>)
                .put(handlers::update_document_handler::<B>)
                .delete(handlers::delete_document_handler::<B>),
        )
        // Search
        .route(
            "/search",
            get(handlers::search_get_handler::<B>).post(handlers::search_post_handler::<B>),
        )
        .route("/search/multi", post(handlers::multi_search_handler::<B>))
        .route("/search/suggest", get(handlers::suggest_handler::<B>))
        .route("/search/facets", post(handlers::faceted_search_handler::<B>))
        .route("/search/field", get(handlers::search_by_field_handler::<B>))
        // Indices
        .route(
            "/indices/{index}",
            get(handlers::index_status_handler::<B>)
                .put(handlers::create_index_handler::<B>)
                .delete(handlers::delete_index_handler::<B>),
        )
        // State
        .with_state(state)
}
