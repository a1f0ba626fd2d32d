//! HTTP API tests for the shape dashboard
//!
//! Drives the real router against the fixture dump with `tower::oneshot`;
//! no network involved.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use querystats_analyzer::services::query_stats::{aggregate, first_batch};
use querystats_analyzer::{AppState, build_router};

fn test_router() -> Router {
    let path = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/querystats/sample_dump.json"
    );
    let raw = std::fs::read_to_string(path).expect("fixture dump");
    let dump: Value = serde_json::from_str(&raw).expect("fixture is valid JSON");
    let analysis = aggregate(first_batch(&dump));
    build_router(Arc::new(AppState { analysis }))
}

async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_list_shapes_suppresses_admin_rows() {
    let (status, body) = get(test_router(), "/api/shapes").await;
    assert_eq!(status, StatusCode::OK);

    let rows = body.as_array().expect("array of rows");
    // The fixture yields three shapes; the admin system.sessions shape is
    // presentation-suppressed.
    assert_eq!(rows.len(), 2);

    let orders = rows
        .iter()
        .find(|row| row["id"] == 1)
        .expect("orders shape present");
    assert_eq!(orders["shapeId"], "Shape 1");
    assert_eq!(orders["namespace"], "shop.orders");
    assert_eq!(orders["shapesCount"], 3);
    assert_eq!(orders["execCountTotal"], 1260);
    assert_eq!(orders["avgExecMillis"], 5.0);
    assert_eq!(orders["avgTotalExecMillis"], 2186.67);
    assert_eq!(orders["docsReturnedTotal"], 1585.0);
    assert_eq!(orders["docsReturnedAvg"], 528.33);
}

#[tokio::test]
async fn test_get_shape_detail() {
    let (status, body) = get(test_router(), "/api/shapes/1").await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["shapeId"], "Shape 1");
    assert_eq!(
        body["fieldNames"],
        serde_json::json!(["customer.id", "status"])
    );

    let details = body["details"].as_array().unwrap();
    assert_eq!(details.len(), 3);

    let first = &details[0];
    assert_eq!(first["execCount"], 500);
    assert_eq!(first["avgExecMs"], 5.0);
    assert_eq!(first["totalExecMs"], 2500.0);
    assert_eq!(
        first["hashDisplay"].as_str().unwrap(),
        "C5A2F1E0..."
    );
}

#[tokio::test]
async fn test_get_shape_with_admin_namespace_hides_hashes() {
    // The shape itself resolves, but every hash under it is suppressed.
    let (status, body) = get(test_router(), "/api/shapes/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["namespace"], "");
    assert!(body["details"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_get_shape_not_found() {
    let (status, body) = get(test_router(), "/api/shapes/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3001);
}

#[tokio::test]
async fn test_get_query_detail() {
    let hash = "C5A2F1E09B834D67A1B2C3D4E5F60718293A4B5C6D7E8F90112233445566AABB";
    let (status, body) = get(test_router(), &format!("/api/queries/{}", hash)).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["command"], "aggregate");
    assert_eq!(body["namespace"], "shop.orders");
    assert!(body["pipeline"].as_array().unwrap().len() >= 1);
    assert!(body["fullQueryShape"]["pipeline"].is_array());
}

#[tokio::test]
async fn test_get_query_admin_hash_is_invisible() {
    let hash = "0E9D8C7B6A5F4E3D2C1B0A99887766554433221100FFEEDDCCBBAA0011223344";
    let (status, body) = get(test_router(), &format!("/api/queries/{}", hash)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3002);
}

#[tokio::test]
async fn test_get_query_not_found() {
    let (status, body) = get(test_router(), "/api/queries/doesnotexist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 3002);
}

#[tokio::test]
async fn test_index_page_served() {
    let router = test_router();
    let response = router
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8_lossy(&bytes);
    assert!(html.contains("Query Shape Metrics Summary"));
}
