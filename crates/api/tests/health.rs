//! HTTP-level integration test for the health endpoint.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_reports_ok_with_live_db(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
    assert!(json["version"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_responses_carry_request_id(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, "/health").await;
    assert!(
        response.headers().contains_key("x-request-id"),
        "request id middleware should stamp every response"
    );
}
