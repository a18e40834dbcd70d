//! Document validation and business rules.

use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use crate::error::ValidationError;
use crate::types::{Document, Fields};

/// Field stamped with the creation time (RFC 3339, UTC).
pub const CREATED_AT_FIELD: &str = "created_at";

/// Field stamped with the last write time (RFC 3339, UTC).
pub const UPDATED_AT_FIELD: &str = "updated_at";

/// Required fields per index, checked in order: `(index, field, label)`.
const REQUIRED_FIELDS: &[(&str, &str, &str)] = &[
    ("users", "email", "Email"),
    ("users", "name", "Name"),
    ("products", "name", "Name"),
    ("products", "price", "Price"),
];

/// Rejects an empty index name.
pub fn validate_index(index: &str) -> Result<(), ValidationError> {
    if index.is_empty() {
        return Err(ValidationError::EmptyField { field: "Index" });
    }
    Ok(())
}

/// Rejects an empty index name or document id.
pub fn validate_key(index: &str, id: &str) -> Result<(), ValidationError> {
    validate_index(index)?;
    if id.is_empty() {
        return Err(ValidationError::EmptyField {
            field: "Document ID",
        });
    }
    Ok(())
}

/// Rejects an empty field map.
pub fn validate_source(source: &Fields) -> Result<(), ValidationError> {
    if source.is_empty() {
        return Err(ValidationError::EmptyField {
            field: "Document source",
        });
    }
    Ok(())
}

/// Validates a document about to be created.
pub fn validate_new_document(index: &str, source: &Fields) -> Result<(), ValidationError> {
    validate_index(index)?;
    validate_source(source)
}

/// Applies the document rules in place: stamps timestamps, checks the
/// per-index required fields, then normalizes derived fields.
///
/// Every call refreshes `updated_at`, so the rules are not idempotent.
pub fn apply_document_rules(doc: &mut Document) -> Result<(), ValidationError> {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    doc.source
        .entry(CREATED_AT_FIELD)
        .or_insert_with(|| Value::from(now.clone()));
    doc.source
        .insert(UPDATED_AT_FIELD.to_string(), Value::from(now));
    doc.sync_timestamps();

    check_required_fields(doc)?;
    transform_fields(&mut doc.source);
    Ok(())
}

fn check_required_fields(doc: &Document) -> Result<(), ValidationError> {
    let missing = REQUIRED_FIELDS
        .iter()
        .filter(|(index, _, _)| *index == doc.index)
        .find(|(_, field, _)| !doc.source.contains_key(*field));

    match missing {
        Some(&(_, field, label)) => Err(ValidationError::MissingRequiredField {
            index: doc.index.clone(),
            field,
            label,
        }),
        None => Ok(()),
    }
}

fn transform_fields(source: &mut Fields) {
    if let Some(Value::String(email)) = source.get_mut("email") {
        *email = email.to_lowercase();
    }

    let full_name = match (source.get("first_name"), source.get("last_name")) {
        (Some(Value::String(first)), Some(Value::String(last))) => {
            Some(format!("{} {}", first, last))
        }
        _ => None,
    };
    if let Some(full_name) = full_name {
        source.insert("full_name".to_string(), Value::from(full_name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(index: &str, source: Value) -> Document {
        Document::new(index, "1", source.as_object().cloned().unwrap())
    }

    #[test]
    fn test_timestamps_are_stamped() {
        let mut d = doc("articles", json!({"title": "A"}));
        apply_document_rules(&mut d).unwrap();

        let created = d.source[CREATED_AT_FIELD].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(created).is_ok());
        assert!(d.source.contains_key(UPDATED_AT_FIELD));
    }

    #[test]
    fn test_existing_created_at_is_kept() {
        let mut d = doc(
            "articles",
            json!({"title": "A", "created_at": "2020-01-01T00:00:00Z", "updated_at": "old"}),
        );
        apply_document_rules(&mut d).unwrap();

        assert_eq!(d.source[CREATED_AT_FIELD], "2020-01-01T00:00:00Z");
        assert_ne!(d.source[UPDATED_AT_FIELD], "old");
        assert_eq!(d.created.to_rfc3339(), "2020-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_timestamps_follow_stamped_fields() {
        let mut d = doc("articles", json!({"title": "A"}));
        apply_document_rules(&mut d).unwrap();

        let stamp = |dt: chrono::DateTime<Utc>| {
            Value::from(dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        };
        assert_eq!(stamp(d.created), d.source[CREATED_AT_FIELD]);
        assert_eq!(stamp(d.modified), d.source[UPDATED_AT_FIELD]);
        assert_eq!(d.created.timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn test_users_require_email_then_name() {
        let mut d = doc("users", json!({"age": 3}));
        let err = apply_document_rules(&mut d).unwrap_err();
        assert_eq!(err.to_string(), "Email field is required for users index");

        let mut d = doc("users", json!({"email": "a@b.c"}));
        let err = apply_document_rules(&mut d).unwrap_err();
        assert_eq!(err.to_string(), "Name field is required for users index");
    }

    #[test]
    fn test_products_require_name_then_price() {
        let mut d = doc("products", json!({"name": "Widget"}));
        let err = apply_document_rules(&mut d).unwrap_err();
        assert_eq!(err.to_string(), "Price field is required for products index");
    }

    #[test]
    fn test_other_indices_have_no_required_fields() {
        let mut d = doc("articles", json!({"body": "x"}));
        assert!(apply_document_rules(&mut d).is_ok());
    }

    #[test]
    fn test_email_lowercased_and_full_name_derived() {
        let mut d = doc(
            "users",
            json!({"email": "Ann@Example.COM", "name": "Ann", "first_name": "Ann", "last_name": "Lee"}),
        );
        apply_document_rules(&mut d).unwrap();

        assert_eq!(d.source["email"], "ann@example.com");
        assert_eq!(d.source["full_name"], "Ann Lee");
    }

    #[test]
    fn test_full_name_needs_both_strings() {
        let mut d = doc("articles", json!({"first_name": "Ann", "last_name": 7}));
        apply_document_rules(&mut d).unwrap();
        assert!(!d.source.contains_key("full_name"));
    }

    #[test]
    fn test_input_validation_messages() {
        let empty = Fields::new();
        assert_eq!(
            validate_new_document("", &empty).unwrap_err().to_string(),
            "Index cannot be empty"
        );
        assert_eq!(
            validate_new_document("a", &empty).unwrap_err().to_string(),
            "Document source cannot be empty"
        );
        assert_eq!(
            validate_key("a", "").unwrap_err().to_string(),
            "Document ID cannot be empty"
        );
    }
}
