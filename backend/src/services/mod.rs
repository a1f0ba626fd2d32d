pub mod query_stats;

pub use query_stats::{QueryStatsAnalysis, ShapeGroup, ShapeSummary, aggregate, classify};
