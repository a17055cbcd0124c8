//! Repository for the `milestones` table.

use sigep_core::milestone::FIXED_MILESTONES;
use sigep_core::types::DbId;
use sqlx::PgPool;

use crate::models::milestone::Milestone;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, name, review_status, feedback, created_at, updated_at";

/// Provides CRUD operations for milestones.
pub struct MilestoneRepo;

impl MilestoneRepo {
    /// Materialize the four fixed milestones for a project, returning the
    /// full set in submission order.
    ///
    /// Idempotent: rows that already exist are left untouched, so calling
    /// this on every project access (or from concurrent requests) never
    /// duplicates a milestone or resets its status.
    pub async fn ensure_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Milestone>, sqlx::Error> {
        let names: Vec<&str> = FIXED_MILESTONES.iter().map(|m| m.as_str()).collect();
        sqlx::query(
            "INSERT INTO milestones (project_id, name)
             SELECT $1, name FROM UNNEST($2::TEXT[]) AS name
             ON CONFLICT (project_id, name) DO NOTHING",
        )
        .bind(project_id)
        .bind(&names)
        .execute(pool)
        .await?;

        Self::list_for_project(pool, project_id).await
    }

    /// List a project's milestones in submission order.
    ///
    /// Names sort lexicographically in that order, so `ORDER BY name`
    /// suffices.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Milestone>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM milestones WHERE project_id = $1 ORDER BY name");
        sqlx::query_as::<_, Milestone>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Find a milestone by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Milestone>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM milestones WHERE id = $1");
        sqlx::query_as::<_, Milestone>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project's milestone by its fixed name.
    pub async fn find_by_project_and_name(
        pool: &PgPool,
        project_id: DbId,
        name: &str,
    ) -> Result<Option<Milestone>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM milestones WHERE project_id = $1 AND name = $2");
        sqlx::query_as::<_, Milestone>(&query)
            .bind(project_id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Current review statuses for a project, in submission order.
    pub async fn statuses_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<(String, String)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT name, review_status FROM milestones WHERE project_id = $1 ORDER BY name",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Apply a review update. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_review(
        pool: &PgPool,
        id: DbId,
        review_status: Option<&str>,
        feedback: Option<&str>,
    ) -> Result<Option<Milestone>, sqlx::Error> {
        let query = format!(
            "UPDATE milestones SET
                review_status = COALESCE($2, review_status),
                feedback = COALESCE($3, feedback),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Milestone>(&query)
            .bind(id)
            .bind(review_status)
            .bind(feedback)
            .fetch_optional(pool)
            .await
    }
}
