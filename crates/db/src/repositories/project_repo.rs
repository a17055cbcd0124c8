//! Repository for the `projects` table, including its trash lifecycle.

use sigep_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, program_id, track_id, section_id, title, description, \
                       authors, keywords, tutor, review_status, reviewed, grade, feedback, \
                       file_path, created_on, is_trashed, trashed_at, trashed_by, \
                       created_at, updated_at";

/// File paths collected before a hard delete so the caller can remove
/// the stored documents afterwards.
#[derive(Debug)]
pub struct ProjectPurge {
    pub file_paths: Vec<String>,
}

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (owner_id, program_id, track_id, section_id, title, \
                                   description, authors, keywords, tutor, created_on, file_path)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(input.owner_id)
            .bind(input.program_id)
            .bind(input.track_id)
            .bind(input.section_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.authors)
            .bind(&input.keywords)
            .bind(&input.tutor)
            .bind(input.created_on)
            .bind(&input.file_path)
            .fetch_one(pool)
            .await
    }

    /// Find a non-trashed project by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 AND is_trashed = false");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project by ID regardless of trash state.
    pub async fn find_by_id_any(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a non-trashed project only if it belongs to `owner_id`.
    ///
    /// Returns `None` both when the project is missing and when it belongs
    /// to someone else.
    pub async fn find_for_owner(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE id = $1 AND owner_id = $2 AND is_trashed = false"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// List a student's non-trashed projects, newest first.
    pub async fn list_for_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE owner_id = $1 AND is_trashed = false
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// List all non-trashed projects, newest first. Admin review queue.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE is_trashed = false ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// List trashed projects, most recently trashed first.
    pub async fn list_trashed(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE is_trashed = true ORDER BY trashed_at DESC"
        );
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// IDs of every project owned by a user, regardless of trash state.
    /// Used when purging an account to clean up stored documents first.
    pub async fn ids_for_owner_any(pool: &PgPool, owner_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM projects WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Update descriptive content. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no non-trashed row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                program_id = COALESCE($2, program_id),
                track_id = COALESCE($3, track_id),
                section_id = COALESCE($4, section_id),
                title = COALESCE($5, title),
                description = COALESCE($6, description),
                authors = COALESCE($7, authors),
                keywords = COALESCE($8, keywords),
                tutor = COALESCE($9, tutor),
                updated_at = NOW()
             WHERE id = $1 AND is_trashed = false
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(input.program_id)
            .bind(input.track_id)
            .bind(input.section_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.authors)
            .bind(&input.keywords)
            .bind(&input.tutor)
            .fetch_optional(pool)
            .await
    }

    /// Replace the project document path.
    pub async fn set_file_path(
        pool: &PgPool,
        id: DbId,
        file_path: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET file_path = $2, updated_at = NOW()
             WHERE id = $1 AND is_trashed = false",
        )
        .bind(id)
        .bind(file_path)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set the review decision fields, returning the updated row.
    ///
    /// `reviewed` tracks whether a final decision (approve or reject)
    /// stands; reverting a decision passes `false`.
    pub async fn set_review_status(
        pool: &PgPool,
        id: DbId,
        review_status: &str,
        reviewed: bool,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET review_status = $2, reviewed = $3, updated_at = NOW()
             WHERE id = $1 AND is_trashed = false
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(review_status)
            .bind(reviewed)
            .fetch_optional(pool)
            .await
    }

    /// Update reviewer grade and feedback. Only non-`None` fields apply.
    pub async fn set_review_notes(
        pool: &PgPool,
        id: DbId,
        grade: Option<i32>,
        feedback: Option<&str>,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                grade = COALESCE($2, grade),
                feedback = COALESCE($3, feedback),
                updated_at = NOW()
             WHERE id = $1 AND is_trashed = false
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(grade)
            .bind(feedback)
            .fetch_optional(pool)
            .await
    }

    /// Move a project to the trash, recording who did it.
    ///
    /// Returns `true` if the project was not already trashed.
    pub async fn send_to_trash(
        pool: &PgPool,
        id: DbId,
        trashed_by: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects
             SET is_trashed = true, trashed_at = NOW(), trashed_by = $2, updated_at = NOW()
             WHERE id = $1 AND is_trashed = false",
        )
        .bind(id)
        .bind(trashed_by)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a trashed project.
    ///
    /// Returns `true` if the project was trashed and is now restored.
    pub async fn restore_from_trash(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects
             SET is_trashed = false, trashed_at = NULL, trashed_by = NULL, updated_at = NOW()
             WHERE id = $1 AND is_trashed = true",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete a project and its milestone tree, returning the
    /// document paths that referenced stored files.
    ///
    /// Milestones and versions go with the project via cascading foreign
    /// keys; this collects their file paths first so the caller can remove
    /// the documents from storage. Returns `None` if the project does not
    /// exist.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<Option<ProjectPurge>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let mut file_paths: Vec<String> = sqlx::query_scalar(
            "SELECT v.file_path FROM milestone_versions v
             JOIN milestones m ON m.id = v.milestone_id
             WHERE m.project_id = $1",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let project_path: Option<Option<String>> =
            sqlx::query_scalar("DELETE FROM projects WHERE id = $1 RETURNING file_path")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(project_path) = project_path else {
            tx.rollback().await?;
            return Ok(None);
        };
        if let Some(path) = project_path {
            file_paths.push(path);
        }

        tx.commit().await?;
        Ok(Some(ProjectPurge { file_paths }))
    }
}
