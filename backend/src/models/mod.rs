pub mod shapes;

pub use shapes::{HashMetricRow, QueryDetail, ShapeDetail, ShapeRow, namespace_display};
