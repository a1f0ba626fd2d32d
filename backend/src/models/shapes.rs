//! View models for the shape dashboard and console tables
//!
//! These rows re-shape the core analysis result for presentation. The
//! admin-namespace suppression lives here on purpose: it is a display policy,
//! and the core totals are computed long before any row is dropped.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::services::query_stats::{HashRecords, ShapeGroup, ShapeSummary};

/// Render a stored namespace value for display.
///
/// A `{db, coll}` document becomes `db.coll`; a plain string passes through;
/// anything else falls back to its JSON text. Returns `None` for namespaces
/// in the `admin` database, which presentation rows suppress.
pub fn namespace_display(value: Option<&Value>) -> Option<String> {
    let Some(value) = value else {
        return Some(String::new());
    };
    match value {
        Value::Object(map) if map.contains_key("db") && map.contains_key("coll") => {
            if map["db"] == "admin" {
                None
            } else {
                Some(format!("{}.{}", value_text(&map["db"]), value_text(&map["coll"])))
            }
        }
        Value::Null => Some(String::new()),
        other => Some(value_text(other)),
    }
}

fn value_text(value: &Value) -> String {
    match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Truncated hash for table cells; the full hash stays available for links.
fn hash_display(hash: &str) -> String {
    let short: String = hash.chars().take(8).collect();
    format!("{}...", short)
}

// ============================================================================
// Summary rows
// ============================================================================

/// One row of the shape summary table.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShapeRow {
    /// Display label, e.g. `"Shape 3"`.
    pub shape_id: String,
    pub namespace: String,
    pub shapes_count: u64,
    pub exec_count_total: i64,
    pub avg_exec_millis: f64,
    pub avg_total_exec_millis: f64,
    pub docs_returned_total: f64,
    pub docs_returned_avg: f64,
    pub keys_examined_total: f64,
    pub keys_examined_avg: f64,
    pub docs_examined_total: f64,
    pub docs_examined_avg: f64,
    /// Numeric id for drill-down links.
    pub id: u32,
}

impl ShapeRow {
    /// Build a display row, or `None` when the shape's namespace is
    /// suppressed.
    pub fn build(id: u32, summary: &ShapeSummary, group: &ShapeGroup) -> Option<Self> {
        let namespace = namespace_display(group.namespace())?;
        Some(Self {
            shape_id: format!("Shape {}", id),
            namespace,
            shapes_count: summary.shapes_count,
            exec_count_total: summary.exec_count_total,
            avg_exec_millis: round2(summary.avg_exec_millis),
            avg_total_exec_millis: round2(summary.avg_total_exec_millis),
            docs_returned_total: summary.docs_returned.total,
            docs_returned_avg: round2(summary.docs_returned.avg),
            keys_examined_total: summary.keys_examined.total,
            keys_examined_avg: round2(summary.keys_examined.avg),
            docs_examined_total: summary.docs_examined.total,
            docs_examined_avg: round2(summary.docs_examined.avg),
            id,
        })
    }
}

// ============================================================================
// Shape drill-down
// ============================================================================

/// One metric record under one hash, flattened for the drill-down table.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HashMetricRow {
    /// Full hash for query-details links.
    pub hash: String,
    /// Truncated hash for display.
    pub hash_display: String,
    pub namespace: String,
    pub exec_count: i64,
    pub avg_exec_ms: f64,
    pub total_exec_ms: f64,
    pub docs_returned: f64,
    pub keys_examined: f64,
    pub docs_examined: f64,
}

/// Detail response for one shape.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShapeDetail {
    pub shape_id: String,
    pub namespace: String,
    pub field_names: Vec<String>,
    pub details: Vec<HashMetricRow>,
}

impl ShapeDetail {
    pub fn build(id: u32, group: &ShapeGroup) -> Self {
        let mut details = Vec::new();
        for hash in &group.hashes {
            let Some(bucket) = group.records.get(hash) else {
                continue;
            };
            // Hashes resolving to the admin database stay invisible.
            let Some(namespace) = namespace_display(Some(&bucket.namespace)) else {
                continue;
            };
            for metric in &bucket.metrics {
                details.push(metric_row(hash, &namespace, metric));
            }
        }

        Self {
            shape_id: format!("Shape {}", id),
            namespace: namespace_display(group.namespace()).unwrap_or_default(),
            field_names: group.field_names.clone(),
            details,
        }
    }
}

fn metric_row(hash: &str, namespace: &str, metric: &Value) -> HashMetricRow {
    let exec_count = metric
        .get("execCount")
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
        .unwrap_or(0);
    let total_micros = metric
        .pointer("/totalExecMicros/sum")
        .and_then(Value::as_f64);

    let avg_exec_ms = match total_micros {
        Some(sum) if exec_count > 0 => sum / exec_count as f64 / 1000.0,
        _ => 0.0,
    };

    let sum_of = |name: &str| {
        metric
            .get(name)
            .and_then(|v| v.get("sum"))
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    };

    HashMetricRow {
        hash: hash.to_string(),
        hash_display: hash_display(hash),
        namespace: namespace.to_string(),
        exec_count,
        avg_exec_ms: round2(avg_exec_ms),
        total_exec_ms: round2(total_micros.unwrap_or(0.0) / 1000.0),
        docs_returned: sum_of("docsReturned"),
        keys_examined: sum_of("keysExamined"),
        docs_examined: sum_of("docsExamined"),
    }
}

// ============================================================================
// Query drill-down
// ============================================================================

/// Representative query shape stored for one hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueryDetail {
    pub command: String,
    pub namespace: String,
    #[schema(value_type = Object)]
    pub pipeline: Value,
    #[schema(value_type = Object)]
    pub full_query_shape: Value,
}

impl QueryDetail {
    /// Build the drill-down view, or `None` when the hash's namespace is
    /// suppressed.
    pub fn build(bucket: &HashRecords) -> Option<Self> {
        let namespace = namespace_display(Some(&bucket.namespace))?;
        Some(Self {
            command: bucket
                .query_shape
                .get("command")
                .and_then(Value::as_str)
                .unwrap_or("Unknown")
                .to_string(),
            namespace,
            pipeline: bucket
                .query_shape
                .get("pipeline")
                .cloned()
                .unwrap_or_else(|| Value::Array(Vec::new())),
            full_query_shape: bucket.query_shape.clone(),
        })
    }
}
