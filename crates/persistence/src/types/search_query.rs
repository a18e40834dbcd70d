//! In-memory representation of a search request.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::pagination::Pagination;

/// Filter key that carries a comma-joined list of facet fields instead of a
/// term filter.
pub const FACETS_FILTER_KEY: &str = "_facets";

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    #[default]
    Desc,
}

impl SortOrder {
    /// Returns the backend representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order: {}", other)),
        }
    }
}

/// One sort criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    /// Field to sort by.
    pub field: String,
    /// Direction.
    pub order: SortOrder,
}

impl SortField {
    /// Creates a sort criterion.
    pub fn new(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }

    /// Ascending sort on `field`.
    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Asc)
    }

    /// Descending sort on `field`.
    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortOrder::Desc)
    }
}

/// A search request as understood by the pipeline.
///
/// # Example
///
/// ```
/// use sift_persistence::types::{SearchQuery, SortField};
///
/// let query = SearchQuery::new("rust")
///     .with_index("articles")
///     .with_filter("status", "published")
///     .with_sort(SortField::desc("date"))
///     .with_pagination(20, 10);
///
/// assert_eq!(query.pagination.offset, 20);
/// assert_eq!(query.term_filters().count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text query.
    pub query: String,
    /// Target index; empty searches all indices.
    pub index: String,
    /// Exact-match filters, ANDed together.
    pub filters: BTreeMap<String, String>,
    /// Pagination window.
    pub pagination: Pagination,
    /// Sort criteria in priority order.
    pub sort: Vec<SortField>,
}

impl SearchQuery {
    /// Creates a query with default pagination and no filters.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Sets the target index.
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = index.into();
        self
    }

    /// Adds an exact-match filter.
    pub fn with_filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(field.into(), value.into());
        self
    }

    /// Appends a sort criterion.
    pub fn with_sort(mut self, sort: SortField) -> Self {
        self.sort.push(sort);
        self
    }

    /// Sets the pagination window.
    pub fn with_pagination(mut self, offset: usize, limit: usize) -> Self {
        self.pagination = Pagination::new(offset, limit);
        self
    }

    /// Requests facet counts for the given fields.
    pub fn with_facets<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = fields
            .into_iter()
            .map(|f| f.as_ref().trim().to_string())
            .filter(|f| !f.is_empty())
            .collect::<Vec<_>>()
            .join(",");
        self.filters.insert(FACETS_FILTER_KEY.to_string(), joined);
        self
    }

    /// Returns the target index, or `None` to search all indices.
    pub fn target_index(&self) -> Option<&str> {
        if self.index.is_empty() {
            None
        } else {
            Some(&self.index)
        }
    }

    /// Returns the filters that become term clauses.
    pub fn term_filters(&self) -> impl Iterator<Item = (&String, &String)> {
        self.filters
            .iter()
            .filter(|(key, _)| key.as_str() != FACETS_FILTER_KEY)
    }

    /// Returns the requested facet fields.
    pub fn facet_fields(&self) -> Vec<&str> {
        self.filters
            .get(FACETS_FILTER_KEY)
            .map(|joined| {
                joined
                    .split(',')
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}
