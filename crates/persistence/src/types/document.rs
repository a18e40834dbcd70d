//! Documents and their version bookkeeping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A schema-less field map.
pub type Fields = Map<String, Value>;

/// A document managed by the gateway.
///
/// The version starts at 1 and increases by one on every mutation. It is
/// advisory: after a write the backend's reported version is adopted as-is.
///
/// # Example
///
/// ```
/// use sift_persistence::types::Document;
/// use serde_json::{json, Map};
///
/// let mut source = Map::new();
/// source.insert("title".to_string(), json!("A"));
///
/// let mut doc = Document::new("articles", "a-1", source.clone());
/// assert_eq!(doc.version, 1);
///
/// doc.replace_source(source);
/// assert_eq!(doc.version, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document id; empty until the backend assigns one.
    pub id: String,
    /// Index the document lives in.
    pub index: String,
    /// Document fields.
    pub source: Fields,
    /// Mutation counter.
    pub version: i64,
    /// Creation time.
    pub created: DateTime<Utc>,
    /// Last modification time.
    pub modified: DateTime<Utc>,
}

impl Document {
    /// Creates a new document at version 1.
    pub fn new(index: impl Into<String>, id: impl Into<String>, source: Fields) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            index: index.into(),
            source,
            version: 1,
            created: now,
            modified: now,
        }
    }

    /// Replaces every field, bumping the version.
    pub fn replace_source(&mut self, source: Fields) {
        self.source = source;
        self.version += 1;
        self.modified = Utc::now();
    }

    /// Aligns `created`/`modified` with the stamped `created_at`/`updated_at`
    /// fields, so a response matches what a later read rebuilds. Fields that
    /// do not parse leave the current value.
    pub fn sync_timestamps(&mut self) {
        if let Some(created) = timestamp_field(&self.source, "created_at") {
            self.created = created;
        }
        if let Some(modified) = timestamp_field(&self.source, "updated_at") {
            self.modified = modified;
        }
    }

    /// Returns a field value.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.source.get(name)
    }

    /// Builds a document from a raw backend get response
    /// (`{_index, _id, _version, _source}`).
    ///
    /// Timestamps come from the stamped `created_at`/`updated_at` fields when
    /// they parse, otherwise the current time.
    pub fn from_backend(raw: &Value) -> Option<Self> {
        let index = raw.get("_index")?.as_str()?;
        let id = raw.get("_id")?.as_str()?;
        let source = raw.get("_source")?.as_object()?.clone();

        let now = Utc::now();
        let created = timestamp_field(&source, "created_at").unwrap_or(now);
        let modified = timestamp_field(&source, "updated_at").unwrap_or(created);

        Some(Self {
            id: id.to_string(),
            index: index.to_string(),
            version: raw.get("_version").and_then(Value::as_i64).unwrap_or(1),
            source,
            created,
            modified,
        })
    }
}

fn timestamp_field(source: &Fields, name: &str) -> Option<DateTime<Utc>> {
    source
        .get(name)
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// A document submitted for creation, with an optional caller-chosen id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDocument {
    /// Target index.
    pub index: String,
    /// Caller-chosen id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Document fields.
    pub source: Fields,
}

/// What the backend reports after a successful single-document write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReceipt {
    /// Id of the written document.
    pub id: String,
    /// Backend version after the write.
    pub version: i64,
}

impl WriteReceipt {
    /// Parses an index/create response (`{_id, _version, ...}`).
    pub fn from_response(raw: &Value) -> Option<Self> {
        Some(Self {
            id: raw.get("_id")?.as_str()?.to_string(),
            version: raw.get("_version").and_then(Value::as_i64).unwrap_or(1),
        })
    }
}
