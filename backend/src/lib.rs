//! MongoDB query-stats analyzer
//!
//! Library crate behind the `querystats-analyzer` binary: the shape
//! classification / aggregation engine plus the console and web presentation
//! layers that consume its result read-only.

pub mod config;
pub mod console;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use services::query_stats::QueryStatsAnalysis;

/// Shared application state.
///
/// The analysis result is built once from the input dump and never mutated
/// afterwards, so request handlers share it without further synchronization.
pub struct AppState {
    pub analysis: QueryStatsAnalysis,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::shapes::list_shapes,
        handlers::shapes::get_shape,
        handlers::shapes::get_query,
    ),
    components(schemas(
        models::ShapeRow,
        models::ShapeDetail,
        models::HashMetricRow,
        models::QueryDetail,
    )),
    tags(
        (name = "Shapes", description = "Query shape analysis API")
    )
)]
pub struct ApiDoc;

/// Build the dashboard router: three HTML pages, three JSON endpoints, and
/// the Swagger UI.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard::index))
        .route("/shape/:shape_id", get(handlers::dashboard::shape_page))
        .route("/query/:hash", get(handlers::dashboard::query_page))
        .route("/api/shapes", get(handlers::shapes::list_shapes))
        .route("/api/shapes/:shape_id", get(handlers::shapes::get_shape))
        .route("/api/queries/:hash", get(handlers::shapes::get_query))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
