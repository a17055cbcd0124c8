//! Shared harness for HTTP-level integration tests.
//!
//! Builds the production router (same middleware stack as `main.rs`) over a
//! per-test database pool and a throwaway storage directory, and provides
//! request helpers that attach Bearer tokens.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use sigep_api::auth::jwt::{generate_access_token, JwtConfig};
use sigep_api::auth::password::hash_password;
use sigep_api::config::ServerConfig;
use sigep_api::router::build_app_router;
use sigep_api::state::AppState;
use sigep_api::storage::LocalDocumentStore;
use sigep_db::models::user::CreateUser;
use sigep_db::repositories::catalog_repo::Catalog;
use sigep_db::repositories::{CatalogRepo, ProfileRepo, UserRepo};

/// Password shared by every seeded test account.
pub const TEST_PASSWORD: &str = "clave-segura-123";

/// Build a test `ServerConfig` with safe defaults and a unique storage root.
pub fn test_config() -> ServerConfig {
    let storage_root = std::env::temp_dir()
        .join(format!("sigep-test-{}", uuid::Uuid::new_v4()))
        .to_string_lossy()
        .into_owned();
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        storage_root,
        password_min_length: 8,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let storage = Arc::new(LocalDocumentStore::new(&config.storage_root));
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        storage,
    };
    build_app_router(state, &config)
}

/// Seed an account with the given role, returning `(user_id, bearer_token)`.
pub async fn seed_user(pool: &PgPool, username: &str, role: &str) -> (i64, String) {
    let password_hash = hash_password(TEST_PASSWORD).unwrap();
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: Some(format!("{username}@uni.edu")),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            password_hash,
            is_superuser: false,
        },
    )
    .await
    .unwrap();
    ProfileRepo::ensure_for_user(pool, user.id).await.unwrap();
    ProfileRepo::set_role(pool, user.id, role).await.unwrap();

    let token = generate_access_token(user.id, role, false, &test_config().jwt).unwrap();
    (user.id, token)
}

/// Seed one program and one track, returning their IDs for project bodies.
pub async fn seed_catalogs(pool: &PgPool) -> (i64, i64) {
    let program = CatalogRepo::create(pool, Catalog::Programs, "Informatica")
        .await
        .unwrap();
    let track = CatalogRepo::create(pool, Catalog::Tracks, "Desarrollo de Software")
        .await
        .unwrap();
    (program.id, track.id)
}

/// A valid project registration body.
pub fn project_body(program_id: i64, track_id: i64, title: &str) -> serde_json::Value {
    serde_json::json!({
        "program_id": program_id,
        "track_id": track_id,
        "section_id": null,
        "title": title,
        "description": "Sistema de gestion para la defensa de grado",
        "authors": "Ana Perez",
        "keywords": "gestion, proyectos",
        "tutor": "Dra. Garcia",
    })
}

async fn request(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str, token: &str) -> Response {
    request(app, Method::GET, uri, Some(token), None).await
}

pub async fn get_anon(app: Router, uri: &str) -> Response {
    request(app, Method::GET, uri, None, None).await
}

pub async fn post_json(app: Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    request(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_json_anon(app: Router, uri: &str, body: serde_json::Value) -> Response {
    request(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_empty(app: Router, uri: &str, token: &str) -> Response {
    request(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json(app: Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    request(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_json(app: Router, uri: &str, token: &str, body: serde_json::Value) -> Response {
    request(app, Method::DELETE, uri, Some(token), Some(body)).await
}

/// POST a single-file multipart body under the `file` field.
pub async fn post_multipart(
    app: Router,
    uri: &str,
    token: &str,
    filename: &str,
    bytes: &[u8],
) -> Response {
    let boundary = "sigep-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
