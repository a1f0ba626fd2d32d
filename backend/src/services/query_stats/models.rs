//! Query-stats analysis data models
//!
//! These models represent the per-shape groupings and summaries built from a
//! `$queryStats` dump. They are serializable for API responses; raw input
//! documents are kept as `serde_json::Value` for drill-down display.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// Grouping structures
// ============================================================================

/// Everything retained for one `queryShapeHash`: a representative query shape
/// and namespace (first record seen under the hash wins) plus every metrics
/// document observed, duplicates included.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HashRecords {
    pub query_shape: Value,
    pub namespace: Value,
    pub metrics: Vec<Value>,
}

/// One shape group: all hashes whose `$match` predicates touch the same set
/// of field paths, with the per-hash records kept for drill-down.
#[derive(Debug, Clone, Serialize)]
pub struct ShapeGroup {
    /// Sorted, de-duplicated dotted field paths shared by all members.
    pub field_names: Vec<String>,
    /// Distinct hashes in first-seen order.
    pub hashes: Vec<String>,
    /// Per-hash drill-down records, keyed in the same order as `hashes`.
    pub records: IndexMap<String, HashRecords>,
}

impl ShapeGroup {
    /// The namespace value stored for the group's first hash, verbatim.
    ///
    /// How (or whether) to render it is the caller's concern.
    pub fn namespace(&self) -> Option<&Value> {
        self.hashes
            .first()
            .and_then(|hash| self.records.get(hash))
            .map(|bucket| &bucket.namespace)
    }
}

// ============================================================================
// Summary statistics
// ============================================================================

/// Total and per-record average of one metric family.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct MetricStat {
    pub total: f64,
    pub avg: f64,
}

/// Statistics folded over every metric record of one shape group.
///
/// `shapes_count` is the number of individual metric records in the group
/// (summed over hashes), not the number of distinct hashes. When it is zero
/// every average is zero.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ShapeSummary {
    pub shapes_count: u64,
    pub exec_count_total: i64,
    /// Mean over records with `execCount > 0` of each record's own
    /// `totalExecMicros.sum / execCount / 1000`.
    pub avg_exec_millis: f64,
    /// Sum of `totalExecMicros.sum / 1000` over all records, divided by
    /// `shapes_count`.
    pub avg_total_exec_millis: f64,
    pub docs_returned: MetricStat,
    pub keys_examined: MetricStat,
    pub docs_examined: MetricStat,
}

// ============================================================================
// Analysis result
// ============================================================================

/// Complete result of one aggregation pass.
///
/// Shape ids are dense, assigned from 1 in first-seen order of distinct field
/// sets, so both maps iterate in id order. The result is immutable after
/// construction and safe to share behind an `Arc` for concurrent reads.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryStatsAnalysis {
    pub summaries: IndexMap<u32, ShapeSummary>,
    pub groups: IndexMap<u32, ShapeGroup>,
}

impl QueryStatsAnalysis {
    /// Look up the group owning a hash, if any.
    pub fn group_for_hash(&self, hash: &str) -> Option<(u32, &ShapeGroup)> {
        self.groups
            .iter()
            .find(|(_, group)| group.records.contains_key(hash))
            .map(|(id, group)| (*id, group))
    }
}
