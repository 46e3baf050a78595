use axum::http::{StatusCode, header::CONTENT_TYPE};
use axum::response::{IntoResponse, Response};

/// Prometheus scrape endpoint; 404 when no recorder was installed.
pub async fn scrape() -> Response {
    match dfs_metrics::render() {
        Some(body) => (
            [(CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
