//! Elasticsearch backend implementation.

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use elasticsearch::Elasticsearch;
use elasticsearch::auth::Credentials;
use elasticsearch::cert::CertificateValidation;
use elasticsearch::http::response::Response;
use elasticsearch::http::transport::{SingleNodeConnectionPool, TransportBuilder};
use elasticsearch::params::Refresh;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{BackendKind, SearchBackend};
use crate::error::{BackendError, BackendResult};
use crate::types::{BulkOperation, Fields, WriteReceipt};

pub(crate) const BACKEND_NAME: &str = "elasticsearch";

/// Authentication configuration for Elasticsearch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElasticsearchAuth {
    /// Basic username/password authentication.
    Basic {
        /// The username for basic auth.
        username: String,
        /// The password for basic auth.
        password: String,
    },
    /// Bearer token authentication.
    Bearer {
        /// The bearer token.
        token: String,
    },
    /// API key authentication.
    ApiKey {
        /// The API key id.
        id: String,
        /// The API key secret.
        key: String,
    },
    /// API key authentication with the base64 `encoded` value Elasticsearch
    /// returns from the create API key endpoint.
    EncodedApiKey {
        /// The encoded `id:key` pair.
        encoded: String,
    },
}

impl ElasticsearchAuth {
    /// Interprets a configured API key.
    ///
    /// An `id:key` pair becomes [`ElasticsearchAuth::ApiKey`]; anything else is
    /// taken as the already encoded form. Base64 never contains `:`.
    pub fn from_api_key(api_key: &str) -> Self {
        match api_key.split_once(':') {
            Some((id, key)) => ElasticsearchAuth::ApiKey {
                id: id.to_string(),
                key: key.to_string(),
            },
            None => ElasticsearchAuth::EncodedApiKey {
                encoded: api_key.to_string(),
            },
        }
    }
}

/// Configuration for the Elasticsearch backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElasticsearchConfig {
    /// Elasticsearch node URLs (e.g., `["http://localhost:9200"]`).
    /// Currently uses the first node (single-node connection pool).
    pub nodes: Vec<String>,

    /// Request timeout in milliseconds (default: 30000).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Optional authentication.
    #[serde(default)]
    pub auth: Option<ElasticsearchAuth>,

    /// Whether to disable certificate validation (default: false).
    /// Only use for development/testing.
    #[serde(default)]
    pub disable_certificate_validation: bool,

    /// Whether writes wait for a refresh so they are immediately searchable
    /// (default: true).
    #[serde(default = "default_refresh_on_write")]
    pub refresh_on_write: bool,
}

fn default_request_timeout_ms() -> u64 {
    30000
}

fn default_refresh_on_write() -> bool {
    true
}

impl Default for ElasticsearchConfig {
    fn default() -> Self {
        Self {
            nodes: vec!["http://localhost:9200".to_string()],
            request_timeout_ms: default_request_timeout_ms(),
            auth: None,
            disable_certificate_validation: false,
            refresh_on_write: default_refresh_on_write(),
        }
    }
}

/// Elasticsearch backend.
///
/// Holds one client whose connection pool is shared by every request.
pub struct ElasticsearchBackend {
    /// The Elasticsearch client.
    client: Elasticsearch,
    /// Configuration.
    config: ElasticsearchConfig,
}

impl Debug for ElasticsearchBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElasticsearchBackend")
            .field("nodes", &self.config.nodes)
            .field("request_timeout_ms", &self.config.request_timeout_ms)
            .field("refresh_on_write", &self.config.refresh_on_write)
            .finish_non_exhaustive()
    }
}

impl ElasticsearchBackend {
    /// Creates a new Elasticsearch backend with the given configuration.
    ///
    /// No connection is made until the first request.
    pub fn new(config: ElasticsearchConfig) -> BackendResult<Self> {
        let client = Self::build_client(&config)?;
        Ok(Self { client, config })
    }

    /// Builds the Elasticsearch client from configuration.
    fn build_client(config: &ElasticsearchConfig) -> BackendResult<Elasticsearch> {
        let url = config
            .nodes
            .first()
            .cloned()
            .unwrap_or_else(|| "http://localhost:9200".to_string());

        let parsed_url: elasticsearch::http::Url =
            url.parse().map_err(|e| BackendError::ConnectionFailed {
                backend_name: BACKEND_NAME.to_string(),
                message: format!("Invalid URL: {}", e),
            })?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);

        let mut builder = TransportBuilder::new(conn_pool)
            .timeout(Duration::from_millis(config.request_timeout_ms));

        if config.disable_certificate_validation {
            builder = builder.cert_validation(CertificateValidation::None);
        }

        if let Some(ref auth) = config.auth {
            builder = match auth {
                ElasticsearchAuth::Basic { username, password } => {
                    builder.auth(Credentials::Basic(username.clone(), password.clone()))
                }
                ElasticsearchAuth::Bearer { token } => {
                    builder.auth(Credentials::Bearer(token.clone()))
                }
                ElasticsearchAuth::ApiKey { id, key } => {
                    builder.auth(Credentials::ApiKey(id.clone(), key.clone()))
                }
                ElasticsearchAuth::EncodedApiKey { encoded } => {
                    builder.auth(Credentials::EncodedApiKey(encoded.clone()))
                }
            };
        }

        let transport = builder.build().map_err(|e| BackendError::ConnectionFailed {
            backend_name: BACKEND_NAME.to_string(),
            message: format!("Failed to build transport: {}", e),
        })?;

        Ok(Elasticsearch::new(transport))
    }

    /// Returns the Elasticsearch client.
    pub(crate) fn client(&self) -> &Elasticsearch {
        &self.client
    }

    /// Returns the backend configuration.
    pub fn config(&self) -> &ElasticsearchConfig {
        &self.config
    }

    /// Refresh parameter applied to writes.
    pub(crate) fn write_refresh(&self) -> Refresh {
        if self.config.refresh_on_write {
            Refresh::True
        } else {
            Refresh::False
        }
    }
}

/// Maps a transport failure (no HTTP response) onto a backend error.
pub(crate) fn transport_error(err: elasticsearch::Error) -> BackendError {
    if err.is_timeout() {
        BackendError::Timeout {
            backend_name: BACKEND_NAME.to_string(),
            message: err.to_string(),
        }
    } else {
        BackendError::ConnectionFailed {
            backend_name: BACKEND_NAME.to_string(),
            message: err.to_string(),
        }
    }
}

/// Maps a non-success HTTP status onto a backend error.
pub(crate) fn status_error(status: u16, body: String) -> BackendError {
    match status {
        401 | 403 => BackendError::Unauthorized {
            backend_name: BACKEND_NAME.to_string(),
            status,
        },
        _ => BackendError::Status {
            backend_name: BACKEND_NAME.to_string(),
            status,
            body,
        },
    }
}

/// Returns the JSON body of a successful response, or the mapped error.
pub(crate) async fn json_body(response: Response) -> BackendResult<Value> {
    let status = response.status_code();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(status_error(status.as_u16(), body));
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| BackendError::Internal {
            backend_name: BACKEND_NAME.to_string(),
            message: format!("Failed to parse response: {}", e),
            source: None,
        })
}

#[async_trait]
impl SearchBackend for ElasticsearchBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Elasticsearch
    }

    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn index_document(
        &self,
        index: &str,
        id: Option<&str>,
        source: &Fields,
    ) -> BackendResult<WriteReceipt> {
        self.put_document(index, id, source).await
    }

    async fn create_document(
        &self,
        index: &str,
        id: &str,
        source: &Fields,
    ) -> BackendResult<WriteReceipt> {
        self.put_new_document(index, id, source).await
    }

    async fn get_document(&self, index: &str, id: &str) -> BackendResult<Option<Value>> {
        self.fetch_document(index, id).await
    }

    async fn delete_document(&self, index: &str, id: &str) -> BackendResult<()> {
        self.remove_document(index, id).await
    }

    async fn search(&self, index: Option<&str>, body: &Value) -> BackendResult<Value> {
        self.run_search(index, body).await
    }

    async fn multi_search(&self, requests: &[(Option<String>, Value)]) -> BackendResult<Value> {
        self.run_multi_search(requests).await
    }

    async fn bulk(&self, operations: &[BulkOperation]) -> BackendResult<Value> {
        self.run_bulk(operations).await
    }

    async fn index_exists(&self, index: &str) -> BackendResult<bool> {
        self.check_index(index).await
    }

    async fn create_index(&self, index: &str, mapping: Option<&Value>) -> BackendResult<()> {
        self.put_index(index, mapping).await
    }

    async fn delete_index(&self, index: &str) -> BackendResult<()> {
        self.remove_index(index).await
    }

    async fn cluster_health(&self) -> BackendResult<Value> {
        self.fetch_cluster_health().await
    }

    async fn cluster_info(&self) -> BackendResult<Value> {
        self.fetch_cluster_info().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ElasticsearchConfig::default();
        assert_eq!(config.nodes, vec!["http://localhost:9200"]);
        assert_eq!(config.request_timeout_ms, 30000);
        assert!(config.refresh_on_write);
        assert!(config.auth.is_none());
    }

    #[test]
    fn test_config_serde_defaults() {
        let config: ElasticsearchConfig =
            serde_json::from_str(r#"{"nodes": ["http://es:9200"]}"#).unwrap();
        assert_eq!(config.request_timeout_ms, 30000);
        assert!(config.refresh_on_write);
        assert!(!config.disable_certificate_validation);
    }

    #[test]
    fn test_backend_kind() {
        let backend = ElasticsearchBackend::new(ElasticsearchConfig::default()).unwrap();
        assert_eq!(backend.kind(), BackendKind::Elasticsearch);
        assert_eq!(backend.name(), "elasticsearch");
    }

    #[test]
    fn test_invalid_url_fails() {
        let config = ElasticsearchConfig {
            nodes: vec!["not a url".to_string()],
            ..Default::default()
        };
        let err = ElasticsearchBackend::new(config).unwrap_err();
        assert!(matches!(err, BackendError::ConnectionFailed { .. }));
    }

    #[test]
    fn test_api_key_auth_builds() {
        let config = ElasticsearchConfig {
            auth: Some(ElasticsearchAuth::ApiKey {
                id: "id".to_string(),
                key: "secret".to_string(),
            }),
            ..Default::default()
        };
        assert!(ElasticsearchBackend::new(config).is_ok());
    }

    #[test]
    fn test_api_key_pair_is_split() {
        assert_eq!(
            ElasticsearchAuth::from_api_key("VuaCfGcBCdbkQm:ui2lp2axTNmsyakw"),
            ElasticsearchAuth::ApiKey {
                id: "VuaCfGcBCdbkQm".to_string(),
                key: "ui2lp2axTNmsyakw".to_string(),
            }
        );
    }

    #[test]
    fn test_encoded_api_key_is_kept_whole() {
        let encoded = "VnVhQ2ZHY0JDZGJrUW06dWkybHAyYXhUTm1zeWFrdw==";
        let auth = ElasticsearchAuth::from_api_key(encoded);
        assert_eq!(
            auth,
            ElasticsearchAuth::EncodedApiKey {
                encoded: encoded.to_string(),
            }
        );

        let config = ElasticsearchConfig {
            auth: Some(auth),
            ..Default::default()
        };
        assert!(ElasticsearchBackend::new(config).is_ok());
    }

    #[test]
    fn test_write_refresh() {
        let backend = ElasticsearchBackend::new(ElasticsearchConfig {
            refresh_on_write: false,
            ..Default::default()
        })
        .unwrap();
        assert!(matches!(backend.write_refresh(), Refresh::False));
    }

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(
            status_error(401, String::new()),
            BackendError::Unauthorized { status: 401, .. }
        ));
        assert!(matches!(
            status_error(403, String::new()),
            BackendError::Unauthorized { status: 403, .. }
        ));
        assert!(matches!(
            status_error(500, "boom".to_string()),
            BackendError::Status { status: 500, .. }
        ));
    }
}
