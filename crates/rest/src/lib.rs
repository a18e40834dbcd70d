//! # sift-rest - HTTP API for the sift Elasticsearch gateway
//!
//! This crate exposes document CRUD, search, index management and health
//! checks over HTTP. Requests are validated, passed through the search
//! pipeline in `sift-persistence`, and answered with normalized JSON.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sift_persistence::backends::memory::MemoryBackend;
//! use sift_rest::{ServerConfig, create_app_with_config};
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let config = ServerConfig::default();
//!     let app = create_app_with_config(Arc::new(MemoryBackend::new()), config.clone());
//!
//!     let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
//!     axum::serve(listener, app).await
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Operation | HTTP Method | URL Pattern |
//! |-----------|-------------|-------------|
//! | create document | POST | `/documents` |
//! | read document | GET | `/documents/{index}/{id}` |
//! | replace document | PUT | `/documents/{index}/{id}` |
//! | delete document | DELETE | `/documents/{index}/{id}` |
//! | bulk index | POST | `/documents/bulk` |
//! | bulk delete | POST | `/documents/bulk-delete` |
//! | search | GET | `/search?q=&index=&from=&size=` |
//! | advanced search | POST | `/search` |
//! | multi-search | POST | `/search/multi` |
//! | suggest | GET | `/search/suggest?q=&field=&index=&size=` |
//! | faceted search | POST | `/search/facets` |
//! | field search | GET | `/search/field?field=&value=&index=` |
//! | create index | PUT | `/indices/{index}` |
//! | delete index | DELETE | `/indices/{index}` |
//! | index status | GET | `/indices/{index}` |
//! | health | GET | `/health`, `/_liveness`, `/_readiness` |
//!
//! ## Error Handling
//!
//! Every error is returned as `{"error": {"code", "message", "details"?}}`
//! with a status derived from the error's kind. See [`error`].
//!
//! ## Middleware
//!
//! Outermost first: panic recovery, request id, tracing, timeout (408), body
//! limit (413), CORS (optional), security headers.
//!
//! ## Architecture
//!
//! - [`error`] - Error types and HTTP mapping
//! - [`config`] - Server configuration
//! - [`state`] - Application state (services, configuration)
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Security headers and panic recovery
//! - [`extractors`] - JSON body and query-string extractors
//! - [`requests`] - Request bodies
//! - [`responses`] - Response bodies
//! - [`routing`] - Route configuration

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod requests;
pub mod responses;
pub mod routing;
pub mod state;

// Re-export commonly used types
pub use config::{BackendMode, ServerConfig};
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, extract::DefaultBodyLimit, http::StatusCode};
use sift_persistence::core::SearchBackend;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Crate version, reported by the health endpoint.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Creates the Axum application with default configuration.
///
/// For more control, use [`create_app_with_config`].
pub fn create_app<B>(backend: Arc<B>) -> Router
where
    B: SearchBackend + 'static,
{
    create_app_with_config(backend, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// Wires every service to `backend`, registers all routes, and applies the
/// middleware stack.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use sift_persistence::backends::memory::MemoryBackend;
/// use sift_rest::{ServerConfig, create_app_with_config};
///
/// let config = ServerConfig {
///     port: 3000,
///     enable_cors: false,
///     ..Default::default()
/// };
/// let app = create_app_with_config(Arc::new(MemoryBackend::new()), config);
/// ```
pub fn create_app_with_config<B>(backend: Arc<B>, config: ServerConfig) -> Router
where
    B: SearchBackend + 'static,
{
    info!(backend = backend.name(), "Creating sift API server");

    let state = AppState::new(backend, config.clone());
    let router = routing::create_routes(state);

    // Innermost first: security headers, then CORS
    let router = middleware::with_security_headers(router);
    let router = if config.enable_cors {
        router.layer(build_cors_layer(&config))
    } else {
        router
    };

    let service_builder = ServiceBuilder::new()
        .layer(CatchPanicLayer::custom(middleware::handle_panic))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(RequestBodyLimitLayer::new(config.max_body_size))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout),
        ));

    router
        // The extractor's own 2MB default would otherwise win over the configured limit
        .layer(DefaultBodyLimit::max(config.max_body_size))
        .layer(service_builder)
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    // Configure origins
    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    // Configure methods
    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .cors_methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    // Configure headers
    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG` overrides
/// `level`.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "sift_rest={level},sift_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
