//! HTTP-level tests for project registration, visibility scoping, and the
//! review decision endpoint with its milestone approval gate.

mod common;

use axum::http::StatusCode;
use axum::Router;
use serde_json::json;
use sqlx::PgPool;

use common::{
    body_json, build_test_app, get, post_json, project_body, put_json, seed_catalogs, seed_user,
};

async fn register_project(app: Router, pool: &PgPool, token: &str, title: &str) -> i64 {
    let (program_id, track_id) = seed_catalogs(pool).await;
    let response = post_json(
        app,
        "/api/v1/projects",
        token,
        project_body(program_id, track_id, title),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

/// Set one milestone's review status through the admin endpoint.
async fn set_milestone_status(
    app: Router,
    admin_token: &str,
    project_id: i64,
    encoded_name: &str,
    status: &str,
) {
    let response = put_json(
        app,
        &format!("/api/v1/projects/{project_id}/milestones/{encoded_name}"),
        admin_token,
        json!({ "review_status": status }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Registration and visibility
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_materializes_milestones_and_notifies_admins(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_, student) = seed_user(&pool, "aperez", "ESTUDIANTE").await;
    let (_, admin) = seed_user(&pool, "admin1", "ADMIN").await;

    let project_id = register_project(app.clone(), &pool, &student, "Sistema SIGEP").await;

    // The four fixed milestones exist; only the first accepts uploads.
    let response = get(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/milestones"),
        &student,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let milestones = body_json(response).await;
    let milestones = milestones.as_array().unwrap();
    assert_eq!(milestones.len(), 4);
    let names: Vec<&str> = milestones
        .iter()
        .map(|m| m["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        ["MOMENTO I", "MOMENTO II", "MOMENTO III", "MOMENTO IV"]
    );
    assert_eq!(milestones[0]["is_open"], true);
    assert_eq!(milestones[1]["is_open"], false);
    assert_eq!(milestones[0]["review_status"], "PENDIENTE");

    // The admin inbox carries the registration notice.
    let response = get(app, "/api/v1/notifications", &admin).await;
    let inbox = body_json(response).await;
    assert_eq!(inbox.as_array().unwrap().len(), 1);
    assert!(inbox[0]["preview"]
        .as_str()
        .unwrap()
        .contains("Sistema SIGEP"));
    assert_eq!(inbox[0]["project_id"], project_id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_students_cannot_see_each_others_projects(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_, owner) = seed_user(&pool, "aperez", "ESTUDIANTE").await;
    let (_, other) = seed_user(&pool, "bgarcia", "ESTUDIANTE").await;
    let (_, admin) = seed_user(&pool, "admin1", "ADMIN").await;

    let project_id = register_project(app.clone(), &pool, &owner, "Proyecto privado").await;

    // The other student sees an empty listing and a plain 404 on lookup.
    let response = get(app.clone(), "/api/v1/projects", &other).await;
    let listing = body_json(response).await;
    assert_eq!(listing.as_array().unwrap().len(), 0);

    let response = get(
        app.clone(),
        &format!("/api/v1/projects/{project_id}"),
        &other,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The admin sees everything.
    let response = get(app.clone(), "/api/v1/projects", &admin).await;
    let listing = body_json(response).await;
    assert_eq!(listing.as_array().unwrap().len(), 1);

    let response = get(app, &format!("/api/v1/projects/{project_id}"), &owner).await;
    assert_eq!(response.status(), StatusCode::OK);
    let project = body_json(response).await;
    assert_eq!(project["review_status"], "PENDIENTE");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_review_endpoint_is_admin_only(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_, student) = seed_user(&pool, "aperez", "ESTUDIANTE").await;

    let project_id = register_project(app.clone(), &pool, &student, "Proyecto").await;

    let response = post_json(
        app,
        &format!("/api/v1/projects/{project_id}/review"),
        &student,
        json!({ "action": "approve" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Approval gate
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_approval_blocked_until_all_milestones_corrected(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_, student) = seed_user(&pool, "aperez", "ESTUDIANTE").await;
    let (_, admin) = seed_user(&pool, "admin1", "ADMIN").await;

    let project_id = register_project(app.clone(), &pool, &student, "Proyecto").await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/review"),
        &admin,
        json!({ "action": "approve" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["code"], "MILESTONES_INCOMPLETE");

    // Three corrected out of four is still not enough.
    for name in ["MOMENTO%20I", "MOMENTO%20II", "MOMENTO%20III"] {
        set_milestone_status(app.clone(), &admin, project_id, name, "CORREGIDO").await;
    }
    let response = post_json(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/review"),
        &admin,
        json!({ "action": "approve" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    set_milestone_status(app.clone(), &admin, project_id, "MOMENTO%20IV", "CORREGIDO").await;
    let response = post_json(
        app,
        &format!("/api/v1/projects/{project_id}/review"),
        &admin,
        json!({ "action": "approve", "grade": 18, "feedback": "Excelente trabajo" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let project = body_json(response).await;
    assert_eq!(project["review_status"], "APROBADO");
    assert_eq!(project["reviewed"], true);
    assert_eq!(project["grade"], 18);
    assert_eq!(project["feedback"], "Excelente trabajo");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_reject_is_always_available_and_notifies_owner(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_, student) = seed_user(&pool, "aperez", "ESTUDIANTE").await;
    let (_, admin) = seed_user(&pool, "admin1", "ADMIN").await;

    let project_id = register_project(app.clone(), &pool, &student, "Proyecto").await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/review"),
        &admin,
        json!({ "action": "reject", "feedback": "Faltan correcciones" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let project = body_json(response).await;
    assert_eq!(project["review_status"], "RECHAZADO");
    // A rejection leaves the project awaiting further review.
    assert_eq!(project["reviewed"], false);

    let response = get(app, "/api/v1/notifications", &student).await;
    let inbox = body_json(response).await;
    assert_eq!(inbox.as_array().unwrap().len(), 1);
    assert_eq!(inbox[0]["project_id"], project_id);
}

// ---------------------------------------------------------------------------
// Revert
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_revert_withdraws_standing_decision(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_, student) = seed_user(&pool, "aperez", "ESTUDIANTE").await;
    let (_, admin) = seed_user(&pool, "admin1", "ADMIN").await;

    let project_id = register_project(app.clone(), &pool, &student, "Proyecto").await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/review"),
        &admin,
        json!({ "action": "reject" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/review"),
        &admin,
        json!({ "action": "revert" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let project = body_json(response).await;
    assert_eq!(project["review_status"], "PENDIENTE");
    assert_eq!(project["reviewed"], false);

    // Reverting an already-pending project is tolerated.
    let response = post_json(
        app.clone(),
        &format!("/api/v1/projects/{project_id}/review"),
        &admin,
        json!({ "action": "revert" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let project = body_json(response).await;
    assert_eq!(project["review_status"], "PENDIENTE");

    // The owner heard about the rejection and each withdrawal.
    let response = get(app, "/api/v1/notifications", &student).await;
    let inbox = body_json(response).await;
    assert_eq!(inbox.as_array().unwrap().len(), 3);
}

// ---------------------------------------------------------------------------
// Content updates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_owner_can_update_project_content(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_, student) = seed_user(&pool, "aperez", "ESTUDIANTE").await;

    let project_id = register_project(app.clone(), &pool, &student, "Titulo inicial").await;

    let response = put_json(
        app.clone(),
        &format!("/api/v1/projects/{project_id}"),
        &student,
        json!({ "title": "Titulo corregido" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let project = body_json(response).await;
    assert_eq!(project["title"], "Titulo corregido");
    // Untouched fields survive a partial update.
    assert_eq!(project["authors"], "Ana Perez");
}
