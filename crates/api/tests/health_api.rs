//! Smoke test for the root-level health endpoint.

mod common;

use axum::http::StatusCode;
use sqlx::PgPool;

use common::{body_json, build_test_app, get_anon};

#[sqlx::test(migrations = "../db/migrations")]
async fn test_health_reports_ok_with_database(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get_anon(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db_healthy"], true);
    assert!(body["version"].as_str().is_some_and(|v| !v.is_empty()));
}
