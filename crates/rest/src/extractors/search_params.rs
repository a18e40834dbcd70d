//! Query-string parameters for the GET search endpoints.

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;
use sift_persistence::search::rules::pagination_from;
use sift_persistence::types::Pagination;

use crate::error::{RestError, RestResult};

/// Raw parameters as they appear in the query string.
///
/// Numbers stay strings here so a malformed `from` or `size` can be reported
/// as `INVALID_PARAMETER` rather than a generic deserialization failure.
#[derive(Debug, Default, Deserialize)]
struct RawSearchParams {
    q: Option<String>,
    index: Option<String>,
    from: Option<String>,
    size: Option<String>,
    field: Option<String>,
    value: Option<String>,
}

/// Axum extractor for `q`, `index`, `from`, `size`, `field` and `value`.
///
/// # Example
///
/// ```rust,ignore
/// use sift_rest::extractors::SearchParams;
///
/// async fn handler(params: SearchParams) {
///     let q = params.require_query()?;
///     let page = params.pagination()?;
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    /// Free-text query.
    pub q: Option<String>,
    /// Target index; empty means every index.
    pub index: String,
    /// Offset.
    pub from: Option<i64>,
    /// Page size.
    pub size: Option<i64>,
    /// Field name for suggest and field search.
    pub field: Option<String>,
    /// Exact value for field search.
    pub value: Option<String>,
}

impl SearchParams {
    /// Returns `q`, failing when it is missing or empty.
    pub fn require_query(&self) -> RestResult<&str> {
        match self.q.as_deref() {
            Some(q) if !q.is_empty() => Ok(q),
            _ => Err(RestError::invalid_request("Query parameter 'q' is required")),
        }
    }

    /// Builds the pagination window from `from` and `size`.
    pub fn pagination(&self) -> RestResult<Pagination> {
        Ok(pagination_from(self.from, self.size)?)
    }

    /// Returns `field`, or an empty string when it is absent.
    pub fn field(&self) -> &str {
        self.field.as_deref().unwrap_or_default()
    }

    /// Returns `value`, or an empty string when it is absent.
    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }
}

fn parse_number(name: &str, raw: Option<String>) -> RestResult<Option<i64>> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<i64>().map(Some).map_err(|_| {
            RestError::invalid_parameter(format!("Parameter '{}' must be an integer", name))
        }),
    }
}

impl TryFrom<RawSearchParams> for SearchParams {
    type Error = RestError;

    fn try_from(raw: RawSearchParams) -> Result<Self, Self::Error> {
        Ok(Self {
            from: parse_number("from", raw.from)?,
            size: parse_number("size", raw.size)?,
            q: raw.q,
            index: raw.index.unwrap_or_default(),
            field: raw.field,
            value: raw.value,
        })
    }
}

impl<S> FromRequestParts<S> for SearchParams
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<RawSearchParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| RestError::invalid_request(e.body_text()))?;

        SearchParams::try_from(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_persistence::error::ErrorCode;

    fn raw(from: Option<&str>, size: Option<&str>) -> RawSearchParams {
        RawSearchParams {
            q: Some("laptop".to_string()),
            from: from.map(str::to_string),
            size: size.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_numbers_are_parsed() {
        let params = SearchParams::try_from(raw(Some("20"), Some("5"))).unwrap();
        assert_eq!(params.from, Some(20));
        assert_eq!(params.size, Some(5));
        assert_eq!(params.pagination().unwrap(), Pagination::new(20, 5));
    }

    #[test]
    fn test_non_numeric_from_is_invalid_parameter() {
        let err = SearchParams::try_from(raw(Some("ten"), None)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidParameter);
        assert_eq!(err.message(), "Parameter 'from' must be an integer");
    }

    #[test]
    fn test_empty_numbers_use_defaults() {
        let params = SearchParams::try_from(raw(Some(""), None)).unwrap();
        assert_eq!(params.pagination().unwrap(), Pagination::default());
    }

    #[test]
    fn test_negative_size_fails_validation() {
        let params = SearchParams::try_from(raw(None, Some("-1"))).unwrap();
        let err = params.pagination().unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_require_query() {
        let mut params = SearchParams::default();
        assert_eq!(
            params.require_query().unwrap_err().message(),
            "Query parameter 'q' is required"
        );
        params.q = Some(String::new());
        assert!(params.require_query().is_err());
        params.q = Some("x".to_string());
        assert_eq!(params.require_query().unwrap(), "x");
    }
}
