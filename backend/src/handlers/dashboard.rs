use axum::{
    extract::Path,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use rust_embed::RustEmbed;

/// Dashboard pages, embedded at build time so the binary is self-contained.
#[derive(RustEmbed)]
#[folder = "static/"]
struct Assets;

fn serve_page(name: &str) -> Response {
    match Assets::get(name) {
        Some(file) => {
            Html(String::from_utf8_lossy(file.data.as_ref()).into_owned()).into_response()
        }
        None => (StatusCode::NOT_FOUND, format!("missing asset: {}", name)).into_response(),
    }
}

/// Summary page
pub async fn index() -> impl IntoResponse {
    serve_page("index.html")
}

/// Shape drill-down page; the page itself reads the id from the URL.
pub async fn shape_page(Path(_shape_id): Path<u32>) -> impl IntoResponse {
    serve_page("shape_details.html")
}

/// Query drill-down page; the page itself reads the hash from the URL.
pub async fn query_page(Path(_hash): Path<String>) -> impl IntoResponse {
    serve_page("query_details.html")
}
