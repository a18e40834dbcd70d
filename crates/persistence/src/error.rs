//! Error types for the search gateway.
//!
//! Every failure carries a stable [`ErrorCode`] and a client-safe message. Errors
//! raised while talking to the backend are wrapped with an operation-specific
//! code; the original [`BackendError`] stays reachable through
//! [`std::error::Error::source`] for logging but never leaks into a response.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Stable, machine-readable error codes returned to API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Document errors
    DocumentNotFound,
    DocumentExists,
    InvalidDocument,
    DocumentCreateFailed,
    DocumentUpdateFailed,
    DocumentDeleteFailed,

    // Search errors
    SearchFailed,
    InvalidQuery,
    SearchTimeout,

    // Index errors
    IndexNotFound,
    IndexExists,
    IndexCreateFailed,
    IndexDeleteFailed,
    InvalidMapping,

    // Request errors
    ValidationFailed,
    InvalidRequest,
    MissingParameter,
    InvalidParameter,

    // Infrastructure errors
    ElasticsearchDown,
    ConnectionFailed,
    Timeout,
    InternalError,

    // Access errors
    Unauthorized,
    Forbidden,
    AuthenticationFailed,
}

impl ErrorCode {
    /// Returns the wire representation of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::DocumentNotFound => "DOCUMENT_NOT_FOUND",
            ErrorCode::DocumentExists => "DOCUMENT_EXISTS",
            ErrorCode::InvalidDocument => "INVALID_DOCUMENT",
            ErrorCode::DocumentCreateFailed => "DOCUMENT_CREATE_FAILED",
            ErrorCode::DocumentUpdateFailed => "DOCUMENT_UPDATE_FAILED",
            ErrorCode::DocumentDeleteFailed => "DOCUMENT_DELETE_FAILED",
            ErrorCode::SearchFailed => "SEARCH_FAILED",
            ErrorCode::InvalidQuery => "INVALID_QUERY",
            ErrorCode::SearchTimeout => "SEARCH_TIMEOUT",
            ErrorCode::IndexNotFound => "INDEX_NOT_FOUND",
            ErrorCode::IndexExists => "INDEX_EXISTS",
            ErrorCode::IndexCreateFailed => "INDEX_CREATE_FAILED",
            ErrorCode::IndexDeleteFailed => "INDEX_DELETE_FAILED",
            ErrorCode::InvalidMapping => "INVALID_MAPPING",
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
            ErrorCode::MissingParameter => "MISSING_PARAMETER",
            ErrorCode::InvalidParameter => "INVALID_PARAMETER",
            ErrorCode::ElasticsearchDown => "ELASTICSEARCH_DOWN",
            ErrorCode::ConnectionFailed => "CONNECTION_FAILED",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::AuthenticationFailed => "AUTHENTICATION_FAILED",
        }
    }

    /// Returns the category this code belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorCode::DocumentNotFound | ErrorCode::IndexNotFound => ErrorKind::NotFound,
            ErrorCode::DocumentExists | ErrorCode::IndexExists => ErrorKind::Conflict,
            ErrorCode::InvalidDocument
            | ErrorCode::InvalidQuery
            | ErrorCode::InvalidMapping
            | ErrorCode::ValidationFailed
            | ErrorCode::InvalidRequest
            | ErrorCode::MissingParameter
            | ErrorCode::InvalidParameter => ErrorKind::Validation,
            ErrorCode::Unauthorized | ErrorCode::AuthenticationFailed => ErrorKind::Unauthorized,
            ErrorCode::Forbidden => ErrorKind::Forbidden,
            ErrorCode::SearchTimeout | ErrorCode::Timeout => ErrorKind::Timeout,
            ErrorCode::ElasticsearchDown | ErrorCode::ConnectionFailed => ErrorKind::Unavailable,
            ErrorCode::DocumentCreateFailed
            | ErrorCode::DocumentUpdateFailed
            | ErrorCode::DocumentDeleteFailed
            | ErrorCode::SearchFailed
            | ErrorCode::IndexCreateFailed
            | ErrorCode::IndexDeleteFailed
            | ErrorCode::InternalError => ErrorKind::Internal,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broad error categories, each mapped to one HTTP status by the REST layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// 404
    NotFound,
    /// 409
    Conflict,
    /// 400
    Validation,
    /// 401
    Unauthorized,
    /// 403
    Forbidden,
    /// 408
    Timeout,
    /// 503
    Unavailable,
    /// 500
    Internal,
}

/// The primary error type for all gateway operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Input rejected before reaching the backend
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Document lifecycle errors
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Search pipeline errors
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Index management errors
    #[error(transparent)]
    Index(#[from] IndexError),

    /// Unwrapped backend errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl StorageError {
    /// Returns the stable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            StorageError::Validation(e) => e.code(),
            StorageError::Document(e) => e.code(),
            StorageError::Search(e) => e.code(),
            StorageError::Index(e) => e.code(),
            StorageError::Backend(e) => e.code(),
        }
    }

    /// Returns the error category.
    pub fn kind(&self) -> ErrorKind {
        self.code().kind()
    }

    /// Returns the message that is safe to show to API clients.
    ///
    /// Wrapped backend causes are collapsed to the wrapper's message.
    pub fn message(&self) -> String {
        match self {
            StorageError::Backend(e) => e.client_message(),
            other => other.to_string(),
        }
    }

    /// Returns optional client-facing details.
    pub fn details(&self) -> Option<String> {
        match self {
            StorageError::Validation(e) => e.details(),
            _ => None,
        }
    }

    /// Returns true when the error was raised before any backend call.
    pub fn is_validation(&self) -> bool {
        matches!(self, StorageError::Validation(_))
    }
}

/// Input validation failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required string was empty.
    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },

    /// A numeric parameter was negative.
    #[error("{field} must be non-negative")]
    Negative { field: &'static str },

    /// The pagination offset is beyond what the backend allows.
    #[error("From offset cannot exceed {max}")]
    OffsetTooLarge { offset: usize, max: usize },

    /// The sort field is not allow-listed.
    #[error("Invalid sort field: {field}")]
    InvalidSortField { field: String },

    /// The sort order is not `asc` or `desc`.
    #[error("sort order must be 'asc' or 'desc'")]
    InvalidSortOrder { order: String },

    /// A collection-specific required field is missing.
    #[error("{label} field is required for {index} index")]
    MissingRequiredField {
        index: String,
        field: &'static str,
        label: &'static str,
    },

    /// Parallel bulk arrays differ in length.
    #[error("Indices and IDs arrays must have the same length")]
    LengthMismatch { indices: usize, ids: usize },

    /// An element of a batch failed validation.
    #[error("{kind} {position} validation failed")]
    Item {
        kind: &'static str,
        position: usize,
        #[source]
        source: Box<ValidationError>,
    },

    /// A batch operation was given nothing to do.
    #[error("{message}")]
    EmptyBatch { message: &'static str },

    /// The request could not be parsed.
    #[error("{message}")]
    InvalidRequest { message: String },

    /// A request parameter had the wrong shape.
    #[error("{message}")]
    InvalidParameter { message: String },
}

impl ValidationError {
    /// Returns the stable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            ValidationError::InvalidRequest { .. } => ErrorCode::InvalidRequest,
            ValidationError::InvalidParameter { .. } => ErrorCode::InvalidParameter,
            _ => ErrorCode::ValidationFailed,
        }
    }

    /// Returns details for batch failures, naming the inner cause.
    pub fn details(&self) -> Option<String> {
        match self {
            ValidationError::Item { source, .. } => Some(source.to_string()),
            _ => None,
        }
    }

    /// Wraps this error as the failure of one element of a batch.
    pub fn at(self, kind: &'static str, position: usize) -> Self {
        ValidationError::Item {
            kind,
            position,
            source: Box::new(self),
        }
    }
}

/// Errors related to document state.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The document does not exist.
    #[error("Document not found: {index}/{id}")]
    NotFound { index: String, id: String },

    /// A document with this id already exists.
    #[error("Document already exists: {index}/{id}")]
    AlreadyExists { index: String, id: String },

    /// Fetching the document failed for a reason other than not-found.
    #[error("Failed to get document")]
    LookupFailed {
        index: String,
        id: String,
        #[source]
        source: BackendError,
    },

    /// The backend returned something that is not a document.
    #[error("Invalid document format")]
    InvalidFormat { index: String, id: String },

    #[error("Failed to create document")]
    CreateFailed {
        index: String,
        #[source]
        source: BackendError,
    },

    #[error("Failed to update document")]
    UpdateFailed {
        index: String,
        id: String,
        #[source]
        source: BackendError,
    },

    #[error("Failed to delete document")]
    DeleteFailed {
        index: String,
        id: String,
        #[source]
        source: BackendError,
    },

    #[error("Failed to bulk index documents")]
    BulkIndexFailed {
        #[source]
        source: BackendError,
    },

    #[error("Failed to bulk delete documents")]
    BulkDeleteFailed {
        #[source]
        source: BackendError,
    },
}

impl DocumentError {
    /// Returns the stable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            DocumentError::NotFound { .. }
            | DocumentError::LookupFailed { .. }
            | DocumentError::InvalidFormat { .. } => ErrorCode::DocumentNotFound,
            DocumentError::AlreadyExists { .. } => ErrorCode::DocumentExists,
            DocumentError::CreateFailed { .. } | DocumentError::BulkIndexFailed { .. } => {
                ErrorCode::DocumentCreateFailed
            }
            DocumentError::UpdateFailed { .. } => ErrorCode::DocumentUpdateFailed,
            DocumentError::DeleteFailed { .. } | DocumentError::BulkDeleteFailed { .. } => {
                ErrorCode::DocumentDeleteFailed
            }
        }
    }
}

/// Errors raised by the search pipeline.
#[derive(Error, Debug)]
pub enum SearchError {
    /// The backend call failed.
    #[error("Search operation failed")]
    Failed {
        operation: &'static str,
        #[source]
        source: BackendError,
    },

    /// The backend response could not be normalized.
    #[error("Failed to parse search response")]
    MalformedResponse { message: String },

    /// One entry of a multi-search response reported an error.
    #[error("Search {position} of multi-search failed")]
    ItemFailed { position: usize, reason: String },
}

impl SearchError {
    /// Returns the stable error code.
    pub fn code(&self) -> ErrorCode {
        ErrorCode::SearchFailed
    }
}

/// Errors related to index management.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Index not found: {index}")]
    NotFound { index: String },

    #[error("Index already exists: {index}")]
    AlreadyExists { index: String },

    #[error("Failed to create index")]
    CreateFailed {
        index: String,
        #[source]
        source: BackendError,
    },

    #[error("Failed to delete index")]
    DeleteFailed {
        index: String,
        #[source]
        source: BackendError,
    },

    #[error("Failed to check index existence")]
    ExistsFailed {
        index: String,
        #[source]
        source: BackendError,
    },
}

impl IndexError {
    /// Returns the stable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            IndexError::NotFound { .. } | IndexError::ExistsFailed { .. } => {
                ErrorCode::IndexNotFound
            }
            IndexError::AlreadyExists { .. } => ErrorCode::IndexExists,
            IndexError::CreateFailed { .. } => ErrorCode::IndexCreateFailed,
            IndexError::DeleteFailed { .. } => ErrorCode::IndexDeleteFailed,
        }
    }
}

/// Errors originating from the backend engine or the transport to it.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The document does not exist.
    #[error("document not found in {backend_name}: {index}/{id}")]
    DocumentNotFound {
        backend_name: String,
        index: String,
        id: String,
    },

    /// The index does not exist.
    #[error("index not found in {backend_name}: {index}")]
    IndexNotFound { backend_name: String, index: String },

    /// A create-if-absent write found an existing document.
    #[error("document already exists in {backend_name}: {index}/{id}")]
    Conflict {
        backend_name: String,
        index: String,
        id: String,
    },

    /// The index already exists.
    #[error("index already exists in {backend_name}: {index}")]
    IndexAlreadyExists { backend_name: String, index: String },

    /// The backend is reachable but not serving requests.
    #[error("backend unavailable: {backend_name}: {message}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// The backend did not answer in time.
    #[error("request to {backend_name} timed out: {message}")]
    Timeout {
        backend_name: String,
        message: String,
    },

    /// The backend rejected our credentials.
    #[error("{backend_name} rejected credentials (status {status})")]
    Unauthorized { backend_name: String, status: u16 },

    /// The backend answered with an unexpected status.
    #[error("{backend_name} returned status {status}: {body}")]
    Status {
        backend_name: String,
        status: u16,
        body: String,
    },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

impl BackendError {
    /// Returns the stable error code when this error reaches a client unwrapped.
    pub fn code(&self) -> ErrorCode {
        match self {
            BackendError::DocumentNotFound { .. } => ErrorCode::DocumentNotFound,
            BackendError::IndexNotFound { .. } => ErrorCode::IndexNotFound,
            BackendError::Conflict { .. } => ErrorCode::DocumentExists,
            BackendError::IndexAlreadyExists { .. } => ErrorCode::IndexExists,
            BackendError::Unavailable { .. } => ErrorCode::ElasticsearchDown,
            BackendError::ConnectionFailed { .. } => ErrorCode::ConnectionFailed,
            BackendError::Timeout { .. } => ErrorCode::Timeout,
            BackendError::Unauthorized { .. } => ErrorCode::AuthenticationFailed,
            BackendError::Status { .. }
            | BackendError::Internal { .. }
            | BackendError::SerializationError { .. } => ErrorCode::InternalError,
        }
    }

    /// Returns a message that does not expose backend internals.
    pub fn client_message(&self) -> String {
        match self {
            BackendError::DocumentNotFound { index, id, .. } => {
                format!("Document not found: {}/{}", index, id)
            }
            BackendError::IndexNotFound { index, .. } => format!("Index not found: {}", index),
            BackendError::Conflict { index, id, .. } => {
                format!("Document already exists: {}/{}", index, id)
            }
            BackendError::IndexAlreadyExists { index, .. } => {
                format!("Index already exists: {}", index)
            }
            BackendError::Unavailable { .. } => "Elasticsearch is unavailable".to_string(),
            BackendError::ConnectionFailed { .. } => {
                "Failed to connect to Elasticsearch".to_string()
            }
            BackendError::Timeout { .. } => "Operation timed out".to_string(),
            BackendError::Unauthorized { .. } => {
                "Authentication with Elasticsearch failed".to_string()
            }
            BackendError::Status { .. }
            | BackendError::Internal { .. }
            | BackendError::SerializationError { .. } => {
                "An internal error occurred".to_string()
            }
        }
    }
}

/// Result type alias for gateway operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for backend calls.
pub type BackendResult<T> = Result<T, BackendError>;

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::SerializationError {
            message: err.to_string(),
        }
    }
}
