//! Shape classification
//!
//! Derives a coarse grouping key from one raw query-stats record: the set of
//! dotted field paths its `$match` predicate constrains with operator
//! expressions. The engine's own `queryShapeHash` is stable per literal query
//! shape, so structurally-identical queries can land under many hashes; the
//! field set collapses them back together.

use serde_json::Value;

/// Logical combinators recurse into their sub-predicates without extending
/// the field path.
const LOGICAL_OPERATORS: [&str; 3] = ["$and", "$or", "$nor"];

/// Extract `(queryShapeHash, sorted field set)` from one record.
///
/// Total over arbitrary documents: every lookup is defensive, a missing path
/// yields an empty default. Only the first `$match`-bearing pipeline stage is
/// inspected; later `$match` stages are ignored.
pub fn classify(record: &Value) -> (String, Vec<String>) {
    let hash = record
        .get("queryShapeHash")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let pipeline = record
        .pointer("/key/queryShape/pipeline")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    let mut field_names = Vec::new();
    for stage in pipeline {
        if let Some(predicate) = stage.get("$match") {
            collect_field_names(predicate, "", &mut field_names);
            break;
        }
    }

    // The sorted, de-duplicated list is the grouping key.
    field_names.sort();
    field_names.dedup();

    (hash, field_names)
}

/// Recursive descent over a `$match` predicate.
///
/// A field path is recorded when its value is a document with at least one
/// operator key (a leaf operator expression like `{"$gt": 5}`). Plain
/// equality matches record nothing at their own level. Non-logical operator
/// keys contribute no field name and are not recursed into.
fn collect_field_names(value: &Value, prefix: &str, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if key.starts_with('$') {
                    if LOGICAL_OPERATORS.contains(&key.as_str())
                        && let Some(items) = child.as_array()
                    {
                        for item in items {
                            collect_field_names(item, prefix, out);
                        }
                    }
                    continue;
                }

                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };

                if child
                    .as_object()
                    .is_some_and(|m| m.keys().any(|k| k.starts_with('$')))
                {
                    out.push(path.clone());
                }

                collect_field_names(child, &path, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_field_names(item, prefix, out);
            }
        }
        _ => {}
    }
}
