//! Application state for the sift HTTP API.
//!
//! Holds the services every handler needs. All services share one backend,
//! which is constructed once at startup and injected here.

use std::sync::Arc;

use sift_persistence::core::SearchBackend;
use sift_persistence::documents::{DocumentService, IndexService};
use sift_persistence::search::SearchService;

use crate::config::ServerConfig;

/// Shared application state for the REST API.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use sift_persistence::backends::memory::MemoryBackend;
/// use sift_rest::{AppState, ServerConfig};
///
/// let state = AppState::new(Arc::new(MemoryBackend::new()), ServerConfig::for_testing());
/// assert_eq!(state.backend_name(), "memory");
/// ```
pub struct AppState<B> {
    documents: DocumentService<B>,
    search: SearchService<B>,
    indices: IndexService<B>,
    config: Arc<ServerConfig>,
}

// B lives behind Arc inside each service and doesn't need to be Clone
impl<B> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            documents: self.documents.clone(),
            search: self.search.clone(),
            indices: self.indices.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

impl<B: SearchBackend> AppState<B> {
    /// Creates the state, wiring every service to `backend`.
    pub fn new(backend: Arc<B>, config: ServerConfig) -> Self {
        Self {
            documents: DocumentService::new(Arc::clone(&backend)),
            search: SearchService::new(Arc::clone(&backend)),
            indices: IndexService::new(backend),
            config: Arc::new(config),
        }
    }

    /// Document lifecycle operations.
    pub fn documents(&self) -> &DocumentService<B> {
        &self.documents
    }

    /// Search operations.
    pub fn search(&self) -> &SearchService<B> {
        &self.search
    }

    /// Index management and cluster health.
    pub fn indices(&self) -> &IndexService<B> {
        &self.indices
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Name of the backend the services talk to.
    pub fn backend_name(&self) -> &str {
        self.search.backend().name()
    }
}
