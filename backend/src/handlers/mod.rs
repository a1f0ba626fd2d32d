pub mod dashboard;
pub mod shapes;
