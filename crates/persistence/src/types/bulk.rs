//! Bulk operations and their per-item outcomes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::document::Fields;

/// One action of a bulk request.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkOperation {
    /// Index (create or overwrite) a document.
    Index {
        /// Target index.
        index: String,
        /// Document id; the backend assigns one when absent.
        id: Option<String>,
        /// Document fields.
        source: Fields,
    },
    /// Delete a document.
    Delete {
        /// Target index.
        index: String,
        /// Document id.
        id: String,
    },
}

impl BulkOperation {
    /// Returns the action name used on the wire.
    pub fn action(&self) -> &'static str {
        match self {
            BulkOperation::Index { .. } => "index",
            BulkOperation::Delete { .. } => "delete",
        }
    }

    /// Returns the target index.
    pub fn index(&self) -> &str {
        match self {
            BulkOperation::Index { index, .. } | BulkOperation::Delete { index, .. } => index,
        }
    }
}

/// Outcome of one bulk item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkItemOutcome {
    /// `index` or `delete`.
    pub action: String,
    /// Target index.
    pub index: String,
    /// Document id (assigned by the backend for id-less index actions).
    pub id: String,
    /// Per-item HTTP status reported by the backend.
    pub status: u16,
    /// Backend version after the action, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    /// Failure reason, when the item failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BulkItemOutcome {
    /// Returns true when the item succeeded.
    pub fn is_success(&self) -> bool {
        self.error.is_none() && (200..300).contains(&self.status)
    }
}

/// Structured result of a bulk submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkReport {
    /// Backend processing time in milliseconds.
    pub took: i64,
    /// True when at least one item failed.
    pub errors: bool,
    /// Per-item outcomes in submission order.
    pub items: Vec<BulkItemOutcome>,
}

impl BulkReport {
    /// Parses a backend bulk response
    /// (`{took, errors, items: [{<action>: {_index, _id, status, error?}}]}`).
    ///
    /// Items that do not have the expected shape are skipped.
    pub fn from_response(raw: &Value) -> Self {
        let items: Vec<BulkItemOutcome> = raw
            .get("items")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(parse_item).collect())
            .unwrap_or_default();

        let errors = raw
            .get("errors")
            .and_then(Value::as_bool)
            .unwrap_or_else(|| items.iter().any(|i| !i.is_success()));

        Self {
            took: raw.get("took").and_then(Value::as_i64).unwrap_or(0),
            errors,
            items,
        }
    }

    /// Number of failed items.
    pub fn failed(&self) -> usize {
        self.items.iter().filter(|i| !i.is_success()).count()
    }
}

fn parse_item(item: &Value) -> Option<BulkItemOutcome> {
    let (action, body) = item.as_object()?.iter().next()?;
    let error = body.get("error").map(|e| {
        e.get("reason")
            .and_then(Value::as_str)
            .or_else(|| e.get("type").and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| e.to_string())
    });

    Some(BulkItemOutcome {
        action: action.clone(),
        index: body.get("_index")?.as_str()?.to_string(),
        id: body
            .get("_id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        status: body.get("status").and_then(Value::as_u64).unwrap_or(0) as u16,
        version: body.get("_version").and_then(Value::as_i64),
        error,
    })
}
