//! Elasticsearch Query DSL builder.
//!
//! Translates a [`SearchQuery`] into a Query DSL body. The builder is total:
//! every query produces a body, and business rules are expected to have run
//! beforehand.

use serde_json::{Map, Value, json};

use crate::types::{SearchQuery, SortField};

/// A complete Elasticsearch query body ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct EsQuery {
    /// The complete query body.
    pub body: Value,
    /// The index to search; `None` searches every index.
    pub index: Option<String>,
}

/// Builds Elasticsearch queries from search queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct EsQueryBuilder;

impl EsQueryBuilder {
    /// Creates a new query builder.
    pub fn new() -> Self {
        Self
    }

    /// Builds a complete ES query from a `SearchQuery`.
    pub fn build(&self, query: &SearchQuery) -> EsQuery {
        let mut body = json!({
            "query": self.build_query_clause(query),
            "from": query.pagination.offset,
            "size": query.pagination.limit,
        });

        if !query.sort.is_empty() {
            body["sort"] = self.build_sort(&query.sort);
        }

        let facets = query.facet_fields();
        if !facets.is_empty() {
            body["aggs"] = self.build_aggregations(&facets);
        }

        // Track total hits
        body["track_total_hits"] = json!(true);

        EsQuery {
            body,
            index: query.target_index().map(str::to_string),
        }
    }

    fn build_query_clause(&self, query: &SearchQuery) -> Value {
        let base = json!({
            "multi_match": {
                "query": query.query,
                "fields": ["*"],
            }
        });

        // BTreeMap iteration keeps the filter order stable
        let filters: Vec<Value> = query
            .term_filters()
            .map(|(field, value)| json!({ "term": { field: value } }))
            .collect();

        if filters.is_empty() {
            return base;
        }

        json!({
            "bool": {
                "must": base,
                "filter": filters,
            }
        })
    }

    fn build_sort(&self, sort: &[SortField]) -> Value {
        let clauses: Vec<Value> = sort
            .iter()
            .map(|s| json!({ s.field.as_str(): { "order": s.order.as_str() } }))
            .collect();
        Value::Array(clauses)
    }

    fn build_aggregations(&self, fields: &[&str]) -> Value {
        let mut aggs = Map::new();
        for field in fields {
            aggs.insert(
                (*field).to_string(),
                json!({ "terms": { "field": field } }),
            );
        }
        Value::Object(aggs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SortOrder;

    #[test]
    fn test_plain_query_uses_wildcard_multi_match() {
        let es = EsQueryBuilder::new().build(&SearchQuery::new("laptop"));

        assert_eq!(
            es.body["query"],
            json!({"multi_match": {"query": "laptop", "fields": ["*"]}})
        );
        assert_eq!(es.body["from"], 0);
        assert_eq!(es.body["size"], 10);
        assert!(es.body.get("sort").is_none());
        assert!(es.body.get("aggs").is_none());
        assert_eq!(es.index, None);
    }

    #[test]
    fn test_filters_wrap_in_bool() {
        let query = SearchQuery::new("laptop")
            .with_index("products")
            .with_filter("status", "active")
            .with_filter("brand", "acme");
        let es = EsQueryBuilder::new().build(&query);

        let bool_query = &es.body["query"]["bool"];
        assert_eq!(bool_query["must"]["multi_match"]["query"], "laptop");
        assert_eq!(
            bool_query["filter"],
            json!([
                {"term": {"brand": "acme"}},
                {"term": {"status": "active"}}
            ])
        );
        assert_eq!(es.index.as_deref(), Some("products"));
    }

    #[test]
    fn test_sort_preserves_input_order() {
        let query = SearchQuery::new("x")
            .with_sort(SortField::new("price", SortOrder::Asc))
            .with_sort(SortField::desc("_score"));
        let es = EsQueryBuilder::new().build(&query);

        assert_eq!(
            es.body["sort"],
            json!([
                {"price": {"order": "asc"}},
                {"_score": {"order": "desc"}}
            ])
        );
    }

    #[test]
    fn test_facets_become_terms_aggregations_not_filters() {
        let query = SearchQuery::new("x").with_facets(["category", "brand"]);
        let es = EsQueryBuilder::new().build(&query);

        assert!(es.body["query"].get("bool").is_none());
        assert_eq!(es.body["aggs"]["category"], json!({"terms": {"field": "category"}}));
        assert_eq!(es.body["aggs"]["brand"], json!({"terms": {"field": "brand"}}));
    }

    #[test]
    fn test_pagination_always_emitted() {
        let es = EsQueryBuilder::new().build(&SearchQuery::new("x").with_pagination(40, 20));
        assert_eq!(es.body["from"], 40);
        assert_eq!(es.body["size"], 20);
        assert_eq!(es.body["track_total_hits"], true);
    }
}
