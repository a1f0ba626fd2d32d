use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use crate::AppState;
use crate::models::{QueryDetail, ShapeDetail, ShapeRow};
use crate::utils::{ApiError, ApiResult};

// List summary rows for every query shape
#[utoipa::path(
    get,
    path = "/api/shapes",
    responses(
        (status = 200, description = "Summary rows, one per query shape", body = Vec<ShapeRow>)
    ),
    tag = "Shapes"
)]
pub async fn list_shapes(State(state): State<Arc<AppState>>) -> Json<Vec<ShapeRow>> {
    let analysis = &state.analysis;
    let rows: Vec<ShapeRow> = analysis
        .summaries
        .iter()
        .filter_map(|(id, summary)| {
            let group = analysis.groups.get(id)?;
            ShapeRow::build(*id, summary, group)
        })
        .collect();
    Json(rows)
}

// Drill into one shape: field names and per-record hash rows
#[utoipa::path(
    get,
    path = "/api/shapes/{shape_id}",
    params(
        ("shape_id" = u32, Path, description = "Dense shape id assigned by the analysis pass")
    ),
    responses(
        (status = 200, description = "Shape detail", body = ShapeDetail),
        (status = 404, description = "Shape not found")
    ),
    tag = "Shapes"
)]
pub async fn get_shape(
    State(state): State<Arc<AppState>>,
    Path(shape_id): Path<u32>,
) -> ApiResult<Json<ShapeDetail>> {
    let group = state
        .analysis
        .groups
        .get(&shape_id)
        .ok_or(ApiError::ShapeNotFound { shape_id })?;

    Ok(Json(ShapeDetail::build(shape_id, group)))
}

// Representative query shape for one hash
#[utoipa::path(
    get,
    path = "/api/queries/{hash}",
    params(
        ("hash" = String, Path, description = "queryShapeHash value")
    ),
    responses(
        (status = 200, description = "Query detail", body = QueryDetail),
        (status = 404, description = "Query hash not found")
    ),
    tag = "Shapes"
)]
pub async fn get_query(
    State(state): State<Arc<AppState>>,
    Path(hash): Path<String>,
) -> ApiResult<Json<QueryDetail>> {
    let detail = state
        .analysis
        .group_for_hash(&hash)
        .and_then(|(_, group)| group.records.get(&hash))
        .and_then(QueryDetail::build);

    match detail {
        Some(detail) => Ok(Json(detail)),
        // Unknown hashes and admin-namespace hashes look the same from
        // outside.
        None => Err(ApiError::query_hash_not_found(hash)),
    }
}
