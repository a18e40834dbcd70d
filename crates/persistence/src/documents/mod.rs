//! Document lifecycle and index management.
//!
//! - [`rules`] - input validation and the per-index document rules
//! - [`DocumentService`] - create, read, replace, delete, bulk
//! - [`IndexService`] - index create/delete/exists and cluster health

pub mod index;
pub mod rules;
pub mod service;

pub use index::IndexService;
pub use service::DocumentService;
