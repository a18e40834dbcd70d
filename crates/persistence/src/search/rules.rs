//! Search business rules.
//!
//! Pre-rules run on a [`SearchQuery`] before it is built; post-rules run on
//! every [`Hit`] of a normalized [`SearchResult`]. All functions here are pure.

use serde_json::Value;

use crate::error::ValidationError;
use crate::types::{
    DEFAULT_PAGE_SIZE, Hit, MAX_OFFSET, MAX_PAGE_SIZE, Pagination, SearchQuery, SearchResult,
    SortField,
};

/// Fields a search may be sorted by. Matching is exact and case-sensitive.
pub const SORTABLE_FIELDS: &[&str] = &[
    "_score",
    "_id",
    "created_at",
    "updated_at",
    "name",
    "title",
    "date",
    "price",
    "rating",
];

/// Fields removed from every hit before it leaves the gateway.
pub const SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "password_hash",
    "secret",
    "token",
    "api_key",
    "private_key",
    "ssn",
    "credit_card",
];

/// Field added to every hit with its score class.
pub const MATCH_QUALITY_FIELD: &str = "_match_quality";

/// Field added to every hit with the index it came from.
pub const SOURCE_INDEX_FIELD: &str = "_source_index";

/// Checks the caller-supplied parts of a search before rules apply.
pub fn validate_search_input(query: &SearchQuery) -> Result<(), ValidationError> {
    if query.query.is_empty() {
        return Err(ValidationError::EmptyField {
            field: "Search query",
        });
    }
    for sort in &query.sort {
        if sort.field.is_empty() {
            return Err(ValidationError::EmptyField {
                field: "Sort field",
            });
        }
    }
    Ok(())
}

/// Builds a pagination window from raw `from`/`size` parameters.
///
/// Negative values are rejected. A missing or zero size falls back to the
/// default page size.
pub fn pagination_from(from: Option<i64>, size: Option<i64>) -> Result<Pagination, ValidationError> {
    let from = from.unwrap_or(0);
    let size = size.unwrap_or(0);

    if from < 0 {
        return Err(ValidationError::Negative { field: "from" });
    }
    if size < 0 {
        return Err(ValidationError::Negative { field: "size" });
    }

    let limit = if size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        size as usize
    };
    Ok(Pagination::new(from as usize, limit))
}

/// Strips angle brackets, escapes unescaped double quotes, and trims.
///
/// Running it twice yields the same string.
pub fn sanitize_query(query: &str) -> String {
    let mut out = String::with_capacity(query.len());
    let mut prev: Option<char> = None;

    for c in query.chars() {
        match c {
            '<' | '>' => continue,
            '"' if prev != Some('\\') => {
                out.push('\\');
                out.push('"');
            }
            _ => out.push(c),
        }
        prev = Some(c);
    }

    out.trim().to_string()
}

/// Applies the search pre-rules in place.
///
/// The page size is clamped; an offset beyond [`MAX_OFFSET`] is rejected. An
/// empty sort becomes a descending score sort, and every sort field must be
/// in [`SORTABLE_FIELDS`].
pub fn apply_search_rules(query: &mut SearchQuery) -> Result<(), ValidationError> {
    query.query = sanitize_query(&query.query);

    if query.pagination.limit > MAX_PAGE_SIZE {
        query.pagination.limit = MAX_PAGE_SIZE;
    }

    if query.pagination.offset > MAX_OFFSET {
        return Err(ValidationError::OffsetTooLarge {
            offset: query.pagination.offset,
            max: MAX_OFFSET,
        });
    }

    if query.sort.is_empty() {
        query.sort.push(SortField::desc("_score"));
    }

    if let Some(bad) = query
        .sort
        .iter()
        .find(|s| !SORTABLE_FIELDS.contains(&s.field.as_str()))
    {
        return Err(ValidationError::InvalidSortField {
            field: bad.field.clone(),
        });
    }

    Ok(())
}

/// Classifies a relevance score.
pub fn match_quality(score: f64) -> &'static str {
    if score >= 0.8 {
        "high"
    } else if score >= 0.5 {
        "medium"
    } else {
        "low"
    }
}

/// Strips sensitive fields and annotates one hit.
pub fn post_process_hit(hit: &mut Hit) {
    for field in SENSITIVE_FIELDS {
        hit.source.remove(*field);
    }
    hit.source.insert(
        MATCH_QUALITY_FIELD.to_string(),
        Value::from(match_quality(hit.score)),
    );
    hit.source.insert(
        SOURCE_INDEX_FIELD.to_string(),
        Value::from(hit.index.clone()),
    );
}

/// Applies the post-rules to every hit of a result.
pub fn post_process_results(result: &mut SearchResult) {
    result.hits.iter_mut().for_each(post_process_hit);
}
