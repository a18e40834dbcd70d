//! HTTP request handlers.
//!
//! - [`documents`] - Create, read, update, delete, and bulk document operations
//! - [`search`] - Free-text, advanced, multi, suggest, faceted, and field search
//! - [`indices`] - Index create, delete, and status
//! - [`health`] - Health, liveness, and readiness checks

pub mod documents;
pub mod health;
pub mod indices;
pub mod search;

// Re-export handlers for convenience
pub use documents::{
    bulk_delete_handler, bulk_index_handler, create_document_handler, delete_document_handler,
    get_document_handler, update_document_handler,
};
pub use health::{health_handler, liveness_handler, readiness_handler};
pub use indices::{create_index_handler, delete_index_handler, index_status_handler};
pub use search::{
    faceted_search_handler, multi_search_handler, search_by_field_handler, search_get_handler,
    search_post_handler, suggest_handler,
};
