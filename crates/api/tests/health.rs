//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get};
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_returns_ok_with_json(pool: PgPool) {
    let test = common::build_test_app(pool).await;
    let response = get(test.app(), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_route_returns_404(pool: PgPool) {
    let test = common::build_test_app(pool).await;
    let response = get(test.app(), "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn response_contains_x_request_id_header(pool: PgPool) {
    let test = common::build_test_app(pool).await;
    let response = get(test.app(), "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cors_preflight_allows_configured_origin(pool: PgPool) {
    let test = common::build_test_app(pool).await;

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/chat")
        .header("origin", "http://localhost:8501")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();
    let response = test.app().oneshot(request).await.unwrap();

    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:8501"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn oversized_body_is_rejected(pool: PgPool) {
    let test = common::build_test_app(pool).await;

    let huge = vec![b'a'; test.config.max_upload_bytes + 1];
    let response = common::post_file_auth(
        test.app(),
        "/upload/",
        "huge.txt",
        &huge,
        &common::auth_token(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
