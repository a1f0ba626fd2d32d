//! Metrics aggregation
//!
//! Folds raw query-stats records into per-shape summaries. Grouping happens
//! in two levels: records are bucketed by `queryShapeHash`, and hashes are
//! bucketed by classified field set. Shape ids are assigned densely from 1 in
//! first-seen order of distinct field sets, which makes id assignment
//! deterministic for a fixed input ordering and only for that ordering:
//! reordering the input reorders the ids.

use indexmap::IndexMap;
use serde_json::Value;

use super::classifier::classify;
use super::models::{HashRecords, QueryStatsAnalysis, ShapeGroup, ShapeSummary};

/// Run one aggregation pass over the decoded records.
///
/// Records with an empty or missing `queryShapeHash`, or without a `metrics`
/// field, are dropped silently. Anything else degrades field-by-field to a
/// zero contribution; this function never fails.
pub fn aggregate(records: &[Value]) -> QueryStatsAnalysis {
    // field set -> distinct hashes, and hash -> retained records, both in
    // first-seen order. Id assignment reads the first map's key order.
    let mut shape_hashes: IndexMap<Vec<String>, Vec<String>> = IndexMap::new();
    let mut hash_records: IndexMap<String, HashRecords> = IndexMap::new();

    for record in records {
        let (hash, field_names) = classify(record);
        if hash.is_empty() || record.get("metrics").is_none() {
            continue;
        }

        let hashes = shape_hashes.entry(field_names).or_default();
        if !hashes.contains(&hash) {
            hashes.push(hash.clone());
        }

        let bucket = hash_records.entry(hash).or_insert_with(|| HashRecords {
            query_shape: record
                .pointer("/key/queryShape")
                .cloned()
                .unwrap_or_default(),
            namespace: record.get("namespace").cloned().unwrap_or_default(),
            metrics: Vec::new(),
        });
        bucket
            .metrics
            .push(record.get("metrics").cloned().unwrap_or_default());
    }

    let mut summaries = IndexMap::new();
    let mut groups = IndexMap::new();

    for (index, (field_names, hashes)) in shape_hashes.into_iter().enumerate() {
        let shape_id = (index + 1) as u32;

        let records: IndexMap<String, HashRecords> = hashes
            .iter()
            .map(|hash| {
                (
                    hash.clone(),
                    hash_records.get(hash).cloned().unwrap_or_default(),
                )
            })
            .collect();

        summaries.insert(shape_id, summarize(&records));
        groups.insert(
            shape_id,
            ShapeGroup {
                field_names,
                hashes,
                records,
            },
        );
    }

    QueryStatsAnalysis { summaries, groups }
}

/// Fold every metric record of one group into a summary.
fn summarize(records: &IndexMap<String, HashRecords>) -> ShapeSummary {
    let mut summary = ShapeSummary::default();
    let mut total_exec_millis = 0.0;
    let mut per_record_averages = Vec::new();

    for bucket in records.values() {
        summary.shapes_count += bucket.metrics.len() as u64;

        for metric in &bucket.metrics {
            let exec_count = exec_count(metric);
            summary.exec_count_total += exec_count;

            // Per-record average exec time, only meaningful when the record
            // actually executed and reports a total.
            if let Some(micros) = metric_sum(metric, "totalExecMicros") {
                if exec_count > 0 {
                    per_record_averages.push(micros / exec_count as f64 / 1000.0);
                }
                total_exec_millis += micros / 1000.0;
            }

            if let Some(sum) = metric_sum(metric, "docsReturned") {
                summary.docs_returned.total += sum;
            }
            if let Some(sum) = metric_sum(metric, "keysExamined") {
                summary.keys_examined.total += sum;
            }
            if let Some(sum) = metric_sum(metric, "docsExamined") {
                summary.docs_examined.total += sum;
            }
        }
    }

    if !per_record_averages.is_empty() {
        summary.avg_exec_millis =
            per_record_averages.iter().sum::<f64>() / per_record_averages.len() as f64;
    }

    if summary.shapes_count > 0 {
        let count = summary.shapes_count as f64;
        summary.avg_total_exec_millis = total_exec_millis / count;
        summary.docs_returned.avg = summary.docs_returned.total / count;
        summary.keys_examined.avg = summary.keys_examined.total / count;
        summary.docs_examined.avg = summary.docs_examined.total / count;
    }

    summary
}

/// `execCount` is a plain integer on the metrics document, not a `{sum}`
/// sub-document like the other families.
fn exec_count(metric: &Value) -> i64 {
    match metric.get("execCount") {
        Some(value) => value
            .as_i64()
            .or_else(|| value.as_f64().map(|v| v as i64))
            .unwrap_or(0),
        None => 0,
    }
}

/// Read `<name>.sum` off a metrics document, if present.
fn metric_sum(metric: &Value, name: &str) -> Option<f64> {
    metric.get(name)?.get("sum")?.as_f64()
}
