//! MongoDB `$queryStats` shape analysis
//!
//! Groups the per-hash metric records of a `$queryStats` dump by the set of
//! field paths their `$match` predicates constrain, then folds each group
//! into summary statistics.
//!
//! # Architecture
//!
//! ```text
//! raw records ──▶ classifier ──▶ (hash, field set)   per record
//!                      │
//!                      ▼
//!                 aggregator ──▶ summaries: shape id -> ShapeSummary
//!                              ─▶ groups:    shape id -> ShapeGroup
//! ```
//!
//! The upstream server hashes literal query shapes, so one logical query can
//! be spread over many `queryShapeHash` values. The classifier's field-set
//! key is deliberately coarser and re-unifies them.
//!
//! # Usage
//!
//! ```ignore
//! use querystats_analyzer::services::query_stats::{aggregate, first_batch};
//!
//! let dump: serde_json::Value = serde_json::from_str(&raw)?;
//! let analysis = aggregate(first_batch(&dump));
//! for (shape_id, summary) in &analysis.summaries {
//!     println!("Shape {}: {} records", shape_id, summary.shapes_count);
//! }
//! ```

pub mod aggregator;
pub mod classifier;
pub mod models;


pub use aggregator::aggregate;
pub use classifier::classify;
pub use models::*;

use serde_json::Value;

/// Pull the record array out of a full dump document.
///
/// `$queryStats` output arrives as a cursor document; the records live under
/// `cursor.firstBatch`. Missing paths yield an empty slice.
pub fn first_batch(dump: &Value) -> &[Value] {
    dump.pointer("/cursor/firstBatch")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
