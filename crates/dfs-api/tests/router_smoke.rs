use axum::{body::Body, http::Method, http::Request, http::StatusCode};
use tower::ServiceExt;

#[tokio::test]
async fn livez_healthy_and_unknown_routes_missing() {
    let tmp = tempfile::TempDir::new().unwrap();
    let app = dfs_api::create_router(dfs_api::test_state(tmp.path()));

    let livez_response = app
        .clone()
        .oneshot(Request::builder().uri("/livez").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(livez_response.status(), StatusCode::OK);

    let missing = app
        .clone()
        .oneshot(Request::builder().uri("/api/queue").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let wrong_method = app
        .oneshot(Request::builder().uri("/optimize").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(wrong_method.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn cors_preflight_allows_any_origin_by_default() {
    let tmp = tempfile::TempDir::new().unwrap();
    let app = dfs_api::create_router(dfs_api::test_state(tmp.path()));

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/optimize/")
                .header("origin", "http://localhost:3000")
                .header("access-control-request-method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}
