//! sift
//!
//! An HTTP search gateway in front of Elasticsearch.

use std::sync::Arc;

use clap::Parser;
use sift_persistence::backends::memory::MemoryBackend;
use sift_rest::{BackendMode, ServerConfig, create_app_with_config, init_logging};
use tracing::info;

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "Server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Resolves on Ctrl+C so in-flight requests can drain.
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let backend_mode = config
        .backend_mode()
        .map_err(|e| anyhow::anyhow!("Invalid backend configuration: {}", e))?;

    info!(
        port = config.port,
        host = %config.host,
        backend = %backend_mode,
        version = sift_rest::VERSION,
        "Starting sift"
    );

    match backend_mode {
        BackendMode::Memory => start_memory(config).await,
        BackendMode::Elasticsearch => start_elasticsearch(config).await,
    }
}

/// Starts the server on the in-process backend. Nothing survives a restart.
async fn start_memory(config: ServerConfig) -> anyhow::Result<()> {
    info!("Initializing in-memory backend");
    let backend = Arc::new(MemoryBackend::new());
    let app = create_app_with_config(backend, config.clone());
    serve(app, &config).await
}

/// Starts the server against an Elasticsearch cluster.
#[cfg(feature = "elasticsearch")]
async fn start_elasticsearch(config: ServerConfig) -> anyhow::Result<()> {
    use sift_persistence::backends::elasticsearch::{
        ElasticsearchAuth, ElasticsearchBackend, ElasticsearchConfig,
    };

    let nodes = config.elasticsearch_node_list();

    // validate() guarantees at most one of the two credential kinds
    let auth = match (
        &config.elasticsearch_api_key,
        &config.elasticsearch_username,
        &config.elasticsearch_password,
    ) {
        (Some(api_key), _, _) => Some(ElasticsearchAuth::from_api_key(api_key)),
        (None, Some(username), Some(password)) => Some(ElasticsearchAuth::Basic {
            username: username.clone(),
            password: password.clone(),
        }),
        _ => None,
    };

    let es_config = ElasticsearchConfig {
        nodes: nodes.clone(),
        request_timeout_ms: config.elasticsearch_timeout_ms,
        auth,
        disable_certificate_validation: config.elasticsearch_insecure,
        ..Default::default()
    };

    info!(
        nodes = ?nodes,
        timeout_ms = config.elasticsearch_timeout_ms,
        insecure = config.elasticsearch_insecure,
        "Initializing Elasticsearch backend"
    );

    let backend = Arc::new(ElasticsearchBackend::new(es_config)?);
    let app = create_app_with_config(backend, config.clone());
    serve(app, &config).await
}

/// Fallback when the elasticsearch feature is not enabled.
#[cfg(not(feature = "elasticsearch"))]
async fn start_elasticsearch(_config: ServerConfig) -> anyhow::Result<()> {
    anyhow::bail!(
        "The elasticsearch backend requires the 'elasticsearch' feature. \
         Build with: cargo build -p sift-server --features elasticsearch, \
         or run with SIFT_BACKEND=memory"
    )
}
