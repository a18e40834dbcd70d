//! Naive Query DSL evaluator for the in-memory backend.
//!
//! Understands the subset of Query DSL the gateway emits: a `multi_match`
//! over `["*"]`, optionally wrapped in a `bool` with `term` filters, plus
//! `sort`, `from`/`size` and `terms` aggregations. Scoring is the fraction of
//! query terms found among the document's string values; it only exists so
//! that tests and local runs see plausible ordering.
//!
//! A body without a query clause matches everything. Query text that leaves
//! no alphanumeric terms (`*`, `""`) matches nothing, as the standard
//! analyzer would.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde_json::{Map, Value, json};

use crate::types::Fields;

/// Default bucket count of a `terms` aggregation.
const DEFAULT_BUCKETS: usize = 10;

/// A stored document considered by a search.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate<'a> {
    pub index: &'a str,
    pub id: &'a str,
    pub source: &'a Fields,
}

struct Scored<'a> {
    doc: Candidate<'a>,
    score: f64,
}

/// Evaluates a search body against `docs` and returns an ES-shaped response.
pub(crate) fn execute(docs: &[Candidate<'_>], body: &Value) -> Value {
    let (text, filters) = parse_query(body.get("query"));
    let terms = text.as_deref().map(query_terms);

    let mut matched: Vec<Scored<'_>> = docs
        .iter()
        .filter(|doc| filters.iter().all(|(f, v)| term_matches(doc.source, f, v)))
        .filter_map(|doc| {
            let score = terms.as_deref().map_or(1.0, |t| score(doc.source, t));
            (score > 0.0).then_some(Scored { doc: *doc, score })
        })
        .collect();

    let sort = parse_sort(body.get("sort"));
    matched.sort_by(|a, b| compare(a, b, &sort));

    let total = matched.len();
    let max_score = matched.iter().map(|s| s.score).fold(None, |acc: Option<f64>, s| {
        Some(acc.map_or(s, |m| m.max(s)))
    });
    let aggregations = body
        .get("aggs")
        .and_then(Value::as_object)
        .map(|aggs| aggregate(aggs, &matched));

    let from = body.get("from").and_then(Value::as_u64).unwrap_or(0) as usize;
    let size = body.get("size").and_then(Value::as_u64).unwrap_or(10) as usize;

    let hits: Vec<Value> = matched
        .iter()
        .skip(from)
        .take(size)
        .map(|s| {
            json!({
                "_index": s.doc.index,
                "_id": s.doc.id,
                "_score": s.score,
                "_source": s.doc.source,
            })
        })
        .collect();

    let mut response = json!({
        "took": 0,
        "timed_out": false,
        "hits": {
            "total": { "value": total, "relation": "eq" },
            "max_score": max_score,
            "hits": hits,
        }
    });
    if let Some(aggregations) = aggregations {
        response["aggregations"] = aggregations;
    }
    response
}

/// Extracts the free text and the term filters from a query clause.
/// `None` text means there is nothing to match against.
fn parse_query(query: Option<&Value>) -> (Option<String>, Vec<(String, Value)>) {
    let Some(query) = query else {
        return (None, Vec::new());
    };

    if let Some(bool_query) = query.get("bool") {
        let (text, _) = parse_query(bool_query.get("must"));
        let filters = bool_query
            .get("filter")
            .and_then(Value::as_array)
            .map(|clauses| {
                clauses
                    .iter()
                    .filter_map(|c| c.get("term")?.as_object())
                    .flat_map(|term| term.iter().map(|(k, v)| (k.clone(), v.clone())))
                    .collect()
            })
            .unwrap_or_default();
        return (text, filters);
    }

    let text = query
        .get("multi_match")
        .map(|m| m.get("query").and_then(Value::as_str).unwrap_or_default().to_string());
    (text, Vec::new())
}

/// Splits query text into lower-case terms, dropping quote escapes and
/// terms without any alphanumeric character.
fn query_terms(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|t| t.replace(['\\', '"'], "").to_lowercase())
        .filter(|t| t.chars().any(char::is_alphanumeric))
        .collect()
}

fn score(source: &Fields, terms: &[String]) -> f64 {
    if terms.is_empty() {
        return 0.0;
    }

    let mut words = Vec::new();
    for value in source.values() {
        collect_words(value, &mut words);
    }

    let hits = terms
        .iter()
        .filter(|term| match term.strip_suffix('*') {
            Some(prefix) => words.iter().any(|w| w.starts_with(prefix)),
            None => words.iter().any(|w| w == *term),
        })
        .count();

    hits as f64 / terms.len() as f64
}

fn collect_words(value: &Value, words: &mut Vec<String>) {
    match value {
        Value::String(s) => words.extend(
            s.split(|c: char| !c.is_alphanumeric())
                .filter(|w| !w.is_empty())
                .map(str::to_lowercase),
        ),
        Value::Array(items) => items.iter().for_each(|v| collect_words(v, words)),
        Value::Object(map) => map.values().for_each(|v| collect_words(v, words)),
        _ => {}
    }
}

/// Looks up a possibly dotted field path.
fn lookup<'a>(source: &'a Fields, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = source.get(parts.next()?)?;
    for part in parts {
        current = current.get(part)?;
    }
    Some(current)
}

fn term_matches(source: &Fields, field: &str, expected: &Value) -> bool {
    fn scalar_eq(actual: &Value, expected: &Value) -> bool {
        match (actual, expected) {
            (Value::String(a), Value::String(e)) => a == e,
            (a, Value::String(e)) => a.to_string() == *e,
            (a, e) => a == e,
        }
    }

    match lookup(source, field) {
        Some(Value::Array(items)) => items.iter().any(|v| scalar_eq(v, expected)),
        Some(actual) => scalar_eq(actual, expected),
        None => false,
    }
}

fn parse_sort(sort: Option<&Value>) -> Vec<(String, bool)> {
    sort.and_then(Value::as_array)
        .map(|clauses| {
            clauses
                .iter()
                .filter_map(Value::as_object)
                .filter_map(|clause| clause.iter().next())
                .map(|(field, order_by)| {
                    let desc = order_by.get("order").and_then(Value::as_str) == Some("desc");
                    (field.clone(), desc)
                })
                .collect()
        })
        .unwrap_or_default()
}

fn compare(a: &Scored<'_>, b: &Scored<'_>, sort: &[(String, bool)]) -> Ordering {
    for (field, desc) in sort {
        let ordering = match field.as_str() {
            "_score" => a.score.partial_cmp(&b.score).unwrap_or(Ordering::Equal),
            "_id" => a.doc.id.cmp(b.doc.id),
            _ => compare_values(lookup(a.doc.source, field), lookup(b.doc.source, field)),
        };
        let ordering = if *desc { ordering.reverse() } else { ordering };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    a.doc.id.cmp(b.doc.id)
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

fn aggregate(aggs: &Map<String, Value>, matched: &[Scored<'_>]) -> Value {
    let mut out = Map::new();
    for (name, agg) in aggs {
        let Some(field) = agg
            .get("terms")
            .and_then(|t| t.get("field"))
            .and_then(Value::as_str)
        else {
            continue;
        };

        let mut counts: BTreeMap<String, (Value, i64)> = BTreeMap::new();
        for scored in matched {
            let values = match lookup(scored.doc.source, field) {
                Some(Value::Array(items)) => items.iter().collect::<Vec<_>>(),
                Some(v @ (Value::String(_) | Value::Number(_) | Value::Bool(_))) => vec![v],
                _ => Vec::new(),
            };
            for value in values {
                let entry = counts
                    .entry(value.to_string())
                    .or_insert_with(|| (value.clone(), 0));
                entry.1 += 1;
            }
        }

        let mut buckets: Vec<(Value, i64)> = counts.into_values().collect();
        buckets.sort_by(|a, b| b.1.cmp(&a.1));
        let buckets: Vec<Value> = buckets
            .into_iter()
            .take(DEFAULT_BUCKETS)
            .map(|(key, count)| json!({ "key": key, "doc_count": count }))
            .collect();

        out.insert(name.clone(), json!({ "buckets": buckets }));
    }
    Value::Object(out)
}
