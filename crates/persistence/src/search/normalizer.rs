//! Reshapes raw Elasticsearch search responses into [`SearchResult`].

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::error::SearchError;
use crate::types::{FacetBucket, Hit, SearchQuery, SearchResult};

/// Normalizes a raw search response.
///
/// Missing top-level keys default to zero values. Hits that lack `_index`,
/// `_id`, `_score` or an object `_source` are skipped. A null `_score`
/// (returned when sorting by a field) reads as 0.
pub fn normalize(query: SearchQuery, raw: &Value) -> Result<SearchResult, SearchError> {
    let Some(body) = raw.as_object() else {
        return Err(SearchError::MalformedResponse {
            message: "search response is not a JSON object".to_string(),
        });
    };

    let mut result = SearchResult::empty(query);
    result.took = body.get("took").and_then(Value::as_i64).unwrap_or(0);
    result.timed_out = body
        .get("timed_out")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    if let Some(hits) = body.get("hits") {
        result.total = parse_total(hits.get("total"));
        result.max_score = hits
            .get("max_score")
            .and_then(Value::as_f64)
            .unwrap_or(0.0);

        if let Some(items) = hits.get("hits").and_then(Value::as_array) {
            result.hits = items.iter().filter_map(parse_hit).collect();
            let skipped = items.len() - result.hits.len();
            if skipped > 0 {
                debug!(skipped, "Skipped malformed hits");
            }
        }
    }

    if let Some(aggs) = body.get("aggregations").and_then(Value::as_object) {
        result.facets = parse_facets(aggs);
    }

    Ok(result)
}

fn parse_total(total: Option<&Value>) -> i64 {
    match total {
        Some(Value::Object(t)) => t.get("value").and_then(Value::as_i64).unwrap_or(0),
        Some(v) => v.as_i64().unwrap_or(0),
        None => 0,
    }
}

fn parse_hit(raw: &Value) -> Option<Hit> {
    let score = raw.get("_score")?;
    Some(Hit {
        index: raw.get("_index")?.as_str()?.to_string(),
        id: raw.get("_id")?.as_str()?.to_string(),
        score: score.as_f64().unwrap_or(0.0),
        source: raw.get("_source")?.as_object()?.clone(),
    })
}

fn parse_facets(aggs: &serde_json::Map<String, Value>) -> BTreeMap<String, Vec<FacetBucket>> {
    aggs.iter()
        .filter_map(|(name, agg)| {
            let buckets = agg.get("buckets")?.as_array()?;
            let buckets = buckets
                .iter()
                .filter_map(|b| {
                    Some(FacetBucket {
                        key: b.get("key")?.clone(),
                        count: b.get("doc_count").and_then(Value::as_i64).unwrap_or(0),
                    })
                })
                .collect();
            Some((name.clone(), buckets))
        })
        .collect()
}
