//! Server configuration for the sift HTTP API.
//!
//! Every option can be set on the command line or through an environment
//! variable.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SIFT_SERVER_PORT` | 8080 | Server port |
//! | `SIFT_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `SIFT_LOG_LEVEL` | info | Log level |
//! | `SIFT_MAX_BODY_SIZE` | 10485760 | Max request body (bytes) |
//! | `SIFT_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `SIFT_ENABLE_CORS` | true | Enable CORS |
//! | `SIFT_CORS_ORIGINS` | * | Allowed origins |
//! | `SIFT_CORS_METHODS` | GET,POST,PUT,DELETE,OPTIONS | Allowed methods |
//! | `SIFT_CORS_HEADERS` | Content-Type,Authorization,Accept,X-Request-ID | Allowed headers |
//! | `SIFT_BACKEND` | elasticsearch | Search backend (`elasticsearch` or `memory`) |
//! | `SIFT_ELASTICSEARCH_NODES` | http://localhost:9200 | Comma-separated node URLs |
//! | `SIFT_ELASTICSEARCH_USERNAME` | | Basic auth user |
//! | `SIFT_ELASTICSEARCH_PASSWORD` | | Basic auth password |
//! | `SIFT_ELASTICSEARCH_API_KEY` | | API key, `id:key` or the encoded form |
//! | `SIFT_ELASTICSEARCH_TIMEOUT_MS` | 30000 | Backend request timeout |
//! | `SIFT_ELASTICSEARCH_INSECURE` | false | Skip certificate validation |
//!
//! # Example
//!
//! ```rust
//! use sift_rest::ServerConfig;
//!
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     ..Default::default()
//! };
//! assert_eq!(config.socket_addr(), "0.0.0.0:3000");
//! ```

use std::fmt;
use std::str::FromStr;

use clap::Parser;

/// Default allowed CORS methods.
const DEFAULT_CORS_METHODS: &str = "GET,POST,PUT,DELETE,OPTIONS";

/// Default allowed CORS headers.
const DEFAULT_CORS_HEADERS: &str = "Content-Type,Authorization,Accept,X-Request-ID";

/// Which search backend the server talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendMode {
    /// An Elasticsearch cluster.
    #[default]
    Elasticsearch,
    /// The in-process store; nothing survives a restart.
    Memory,
}

impl fmt::Display for BackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendMode::Elasticsearch => write!(f, "elasticsearch"),
            BackendMode::Memory => write!(f, "memory"),
        }
    }
}

impl FromStr for BackendMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "elasticsearch" | "es" => Ok(BackendMode::Elasticsearch),
            "memory" | "mem" => Ok(BackendMode::Memory),
            other => Err(format!(
                "unknown backend '{}', expected 'elasticsearch' or 'memory'",
                other
            )),
        }
    }
}

/// Server configuration for the sift HTTP API.
#[derive(Debug, Clone, Parser)]
#[command(name = "sift")]
#[command(about = "HTTP gateway in front of Elasticsearch")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "SIFT_SERVER_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "SIFT_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "SIFT_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Maximum request body size in bytes.
    #[arg(long, env = "SIFT_MAX_BODY_SIZE", default_value = "10485760")]
    pub max_body_size: usize,

    /// Request timeout in seconds.
    #[arg(long, env = "SIFT_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "SIFT_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "SIFT_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(long, env = "SIFT_CORS_METHODS", default_value = DEFAULT_CORS_METHODS)]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(long, env = "SIFT_CORS_HEADERS", default_value = DEFAULT_CORS_HEADERS)]
    pub cors_headers: String,

    /// Search backend: `elasticsearch` or `memory`.
    #[arg(long, env = "SIFT_BACKEND", default_value = "elasticsearch")]
    pub backend: String,

    /// Elasticsearch node URLs (comma-separated).
    #[arg(
        long,
        env = "SIFT_ELASTICSEARCH_NODES",
        default_value = "http://localhost:9200"
    )]
    pub elasticsearch_nodes: String,

    /// Elasticsearch basic auth username.
    #[arg(long, env = "SIFT_ELASTICSEARCH_USERNAME")]
    pub elasticsearch_username: Option<String>,

    /// Elasticsearch basic auth password.
    #[arg(long, env = "SIFT_ELASTICSEARCH_PASSWORD")]
    pub elasticsearch_password: Option<String>,

    /// Elasticsearch API key, either `id:key` or the base64 encoded form.
    #[arg(long, env = "SIFT_ELASTICSEARCH_API_KEY")]
    pub elasticsearch_api_key: Option<String>,

    /// Elasticsearch request timeout in milliseconds.
    #[arg(long, env = "SIFT_ELASTICSEARCH_TIMEOUT_MS", default_value = "30000")]
    pub elasticsearch_timeout_ms: u64,

    /// Skip TLS certificate validation (development only).
    #[arg(long, env = "SIFT_ELASTICSEARCH_INSECURE", default_value = "false")]
    pub elasticsearch_insecure: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            max_body_size: 10 * 1024 * 1024, // 10MB
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: DEFAULT_CORS_METHODS.to_string(),
            cors_headers: DEFAULT_CORS_HEADERS.to_string(),
            backend: "elasticsearch".to_string(),
            elasticsearch_nodes: "http://localhost:9200".to_string(),
            elasticsearch_username: None,
            elasticsearch_password: None,
            elasticsearch_api_key: None,
            elasticsearch_timeout_ms: 30000,
            elasticsearch_insecure: false,
        }
    }
}

impl ServerConfig {
    /// Creates a ServerConfig from environment variables, ignoring the
    /// command line.
    pub fn from_env() -> Self {
        Self::try_parse_from(["sift"]).unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parses the configured backend.
    pub fn backend_mode(&self) -> Result<BackendMode, String> {
        self.backend.parse()
    }

    /// Returns the configured Elasticsearch node URLs.
    pub fn elasticsearch_node_list(&self) -> Vec<String> {
        self.elasticsearch_nodes
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.max_body_size == 0 {
            errors.push("Max body size cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        match self.backend_mode() {
            Ok(BackendMode::Elasticsearch) => {
                let nodes = self.elasticsearch_node_list();
                if nodes.is_empty() {
                    errors.push("At least one Elasticsearch node is required".to_string());
                }
                for node in &nodes {
                    if let Err(e) = url::Url::parse(node) {
                        errors.push(format!("Invalid Elasticsearch node URL '{}': {}", node, e));
                    }
                }
                if self.elasticsearch_timeout_ms == 0 {
                    errors.push("Elasticsearch timeout cannot be 0".to_string());
                }
                if self.elasticsearch_username.is_some() != self.elasticsearch_password.is_some() {
                    errors.push(
                        "Elasticsearch username and password must be set together".to_string(),
                    );
                }
                if let Some(key) = &self.elasticsearch_api_key {
                    if key.trim().is_empty() {
                        errors.push("Elasticsearch API key cannot be empty".to_string());
                    }
                    if self.elasticsearch_username.is_some() {
                        errors.push(
                            "Elasticsearch API key and username/password are mutually exclusive"
                                .to_string(),
                        );
                    }
                }
            }
            Ok(BackendMode::Memory) => {}
            Err(e) => errors.push(e),
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// Uses the in-memory backend, port 0, and no CORS.
    pub fn for_testing() -> Self {
        Self {
            port: 0, // Let OS assign port
            log_level: "debug".to_string(),
            request_timeout: 5, // Shorter timeout for tests
            enable_cors: false,
            backend: "memory".to_string(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.max_body_size, 10_485_760);
        assert!(config.enable_cors);
        assert_eq!(config.backend_mode(), Ok(BackendMode::Elasticsearch));
    }

    #[test]
    fn test_defaults_match_parser() {
        let parsed = ServerConfig::try_parse_from(["sift"]).unwrap();
        let default = ServerConfig::default();
        assert_eq!(parsed.port, default.port);
        assert_eq!(parsed.cors_methods, default.cors_methods);
        assert_eq!(parsed.cors_headers, default.cors_headers);
        assert_eq!(parsed.elasticsearch_nodes, default.elasticsearch_nodes);
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            port: 3000,
            host: "0.0.0.0".to_string(),
            ..Default::default()
        };
        assert_eq!(config.socket_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_backend_mode_parsing() {
        assert_eq!("memory".parse(), Ok(BackendMode::Memory));
        assert_eq!("Elasticsearch".parse(), Ok(BackendMode::Elasticsearch));
        assert!("postgres".parse::<BackendMode>().is_err());
    }

    #[test]
    fn test_node_list_splits_and_trims() {
        let config = ServerConfig {
            elasticsearch_nodes: "http://a:9200, http://b:9200,".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.elasticsearch_node_list(),
            vec!["http://a:9200".to_string(), "http://b:9200".to_string()]
        );
    }

    #[test]
    fn test_validate_valid() {
        assert!(ServerConfig::default().validate().is_ok());
        assert!(ServerConfig::for_testing().validate().is_err()); // port 0
    }

    #[test]
    fn test_validate_invalid_port() {
        let config = ServerConfig {
            port: 0,
            ..Default::default()
        };
        let result = config.validate();
        assert!(result.unwrap_err().iter().any(|e| e.contains("Port")));
    }

    #[test]
    fn test_validate_rejects_bad_node_url() {
        let config = ServerConfig {
            elasticsearch_nodes: "not a url".to_string(),
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("not a url")));
    }

    #[test]
    fn test_validate_requires_paired_credentials() {
        let config = ServerConfig {
            elasticsearch_username: Some("elastic".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_both_api_key_forms() {
        for key in ["VuaCfGcBCdbkQm:ui2lp2axTNmsyakw", "VnVhQ2ZHY0JDZGJrUW06dWkybHAyYXhUTm1zeWFrdw=="] {
            let config = ServerConfig {
                elasticsearch_api_key: Some(key.to_string()),
                ..Default::default()
            };
            assert!(config.validate().is_ok(), "rejected {}", key);
        }
    }

    #[test]
    fn test_validate_rejects_api_key_with_basic_auth() {
        let config = ServerConfig {
            elasticsearch_api_key: Some("VnVhQ2ZHY0JDZGJrUW06dWkybHAyYXhUTm1zeWFrdw==".to_string()),
            elasticsearch_username: Some("elastic".to_string()),
            elasticsearch_password: Some("changeme".to_string()),
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("mutually exclusive")));

        let config = ServerConfig {
            elasticsearch_api_key: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_memory_backend_skips_node_checks() {
        let config = ServerConfig {
            backend: "memory".to_string(),
            elasticsearch_nodes: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_for_testing() {
        let config = ServerConfig::for_testing();
        assert_eq!(config.port, 0);
        assert!(!config.enable_cors);
        assert_eq!(config.backend_mode(), Ok(BackendMode::Memory));
    }
}
