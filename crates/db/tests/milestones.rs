//! Integration tests for milestone materialization and version numbering.
//!
//! Exercises the repository layer against a real database to verify that:
//! - Materialization creates exactly the four fixed milestones, in order
//! - Re-running materialization is idempotent and preserves statuses
//! - Version numbers are dense and sequential per milestone
//! - The default version label follows the `V{n}.0` convention

use chrono::NaiveDate;
use sigep_core::milestone::{FIXED_MILESTONES, MILESTONE_CORRECTED, MILESTONE_PENDING};
use sigep_db::models::milestone::CreateMilestoneVersion;
use sigep_db::models::project::CreateProject;
use sigep_db::models::user::CreateUser;
use sigep_db::repositories::catalog_repo::Catalog;
use sigep_db::repositories::{
    CatalogRepo, MilestoneRepo, MilestoneVersionRepo, ProfileRepo, ProjectRepo, UserRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_student(pool: &PgPool, username: &str) -> i64 {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: Some(format!("{username}@uni.edu")),
            first_name: "Ana".to_string(),
            last_name: "Pérez".to_string(),
            password_hash: "$argon2id$test".to_string(),
            is_superuser: false,
        },
    )
    .await
    .unwrap();
    ProfileRepo::ensure_for_user(pool, user.id).await.unwrap();
    user.id
}

async fn seed_project(pool: &PgPool, owner_id: i64, title: &str) -> i64 {
    let program = CatalogRepo::create(pool, Catalog::Programs, &format!("{title} program"))
        .await
        .unwrap();
    let track = CatalogRepo::create(pool, Catalog::Tracks, &format!("{title} track"))
        .await
        .unwrap();
    let project = ProjectRepo::create(
        pool,
        &CreateProject {
            owner_id,
            program_id: program.id,
            track_id: track.id,
            section_id: None,
            title: title.to_string(),
            description: "milestone test".to_string(),
            authors: "Pérez".to_string(),
            keywords: "riego".to_string(),
            tutor: "Dra. Gómez".to_string(),
            created_on: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            file_path: None,
        },
    )
    .await
    .unwrap();
    project.id
}

fn new_version(milestone_id: i64, path: &str) -> CreateMilestoneVersion {
    CreateMilestoneVersion {
        milestone_id,
        file_path: path.to_string(),
        origin: "ESTUDIANTE".to_string(),
        uploaded_by: None,
    }
}

// ---------------------------------------------------------------------------
// Test: materialization creates the fixed set in order
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_ensure_creates_four_fixed_milestones(pool: PgPool) {
    let owner = seed_student(&pool, "est001").await;
    let project_id = seed_project(&pool, owner, "Sistema de Riego").await;

    let milestones = MilestoneRepo::ensure_for_project(&pool, project_id)
        .await
        .unwrap();

    assert_eq!(milestones.len(), 4);
    for (milestone, expected) in milestones.iter().zip(FIXED_MILESTONES) {
        assert_eq!(milestone.name, expected.as_str());
        assert_eq!(milestone.review_status, MILESTONE_PENDING);
    }
}

// ---------------------------------------------------------------------------
// Test: materialization is idempotent and keeps statuses
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_ensure_is_idempotent_and_preserves_status(pool: PgPool) {
    let owner = seed_student(&pool, "est002").await;
    let project_id = seed_project(&pool, owner, "Biblioteca Digital").await;

    let first = MilestoneRepo::ensure_for_project(&pool, project_id)
        .await
        .unwrap();
    MilestoneRepo::update_review(&pool, first[0].id, Some(MILESTONE_CORRECTED), None)
        .await
        .unwrap();

    let second = MilestoneRepo::ensure_for_project(&pool, project_id)
        .await
        .unwrap();
    assert_eq!(second.len(), 4, "re-running must not duplicate milestones");
    assert_eq!(
        second[0].review_status, MILESTONE_CORRECTED,
        "re-running must not reset an existing status"
    );
}

// ---------------------------------------------------------------------------
// Test: version numbers are sequential with default labels
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_version_numbers_are_sequential(pool: PgPool) {
    let owner = seed_student(&pool, "est003").await;
    let project_id = seed_project(&pool, owner, "Control de Inventario").await;
    let milestones = MilestoneRepo::ensure_for_project(&pool, project_id)
        .await
        .unwrap();
    let milestone_id = milestones[0].id;

    for n in 1..=3 {
        let version = MilestoneVersionRepo::create(
            &pool,
            &new_version(milestone_id, &format!("docs/m1_v{n}.pdf")),
        )
        .await
        .unwrap();
        assert_eq!(version.version_number, n);
        assert_eq!(version.label, format!("V{n}.0"));
    }

    let latest = MilestoneVersionRepo::latest_for_milestone(&pool, milestone_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(latest.version_number, 3);

    let listed = MilestoneVersionRepo::list_for_milestone(&pool, milestone_id)
        .await
        .unwrap();
    let numbers: Vec<i32> = listed.iter().map(|v| v.version_number).collect();
    assert_eq!(numbers, vec![3, 2, 1], "listing is newest first");
}

// ---------------------------------------------------------------------------
// Test: numbering is per milestone, not per project
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_version_numbering_is_per_milestone(pool: PgPool) {
    let owner = seed_student(&pool, "est004").await;
    let project_id = seed_project(&pool, owner, "Plataforma de Tutorías").await;
    let milestones = MilestoneRepo::ensure_for_project(&pool, project_id)
        .await
        .unwrap();

    let v1 = MilestoneVersionRepo::create(&pool, &new_version(milestones[0].id, "a.pdf"))
        .await
        .unwrap();
    let v2 = MilestoneVersionRepo::create(&pool, &new_version(milestones[1].id, "b.pdf"))
        .await
        .unwrap();

    assert_eq!(v1.version_number, 1);
    assert_eq!(v2.version_number, 1, "each milestone has its own sequence");
}

// ---------------------------------------------------------------------------
// Test: statuses_for_project feeds the gating functions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_statuses_reflect_review_updates(pool: PgPool) {
    let owner = seed_student(&pool, "est005").await;
    let project_id = seed_project(&pool, owner, "Gestor de Actas").await;
    let milestones = MilestoneRepo::ensure_for_project(&pool, project_id)
        .await
        .unwrap();

    MilestoneRepo::update_review(&pool, milestones[0].id, Some(MILESTONE_CORRECTED), None)
        .await
        .unwrap();

    let statuses = MilestoneRepo::statuses_for_project(&pool, project_id)
        .await
        .unwrap();
    assert_eq!(statuses[0], ("MOMENTO I".to_string(), MILESTONE_CORRECTED.to_string()));
    assert_eq!(statuses[1].1, MILESTONE_PENDING);
}
