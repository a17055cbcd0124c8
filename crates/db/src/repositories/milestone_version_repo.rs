//! Repository for the `milestone_versions` table.

use sigep_core::milestone::version_label;
use sigep_core::types::DbId;
use sqlx::PgPool;

use crate::models::milestone::{CreateMilestoneVersion, MilestoneVersion};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, milestone_id, version_number, label, file_path, origin, uploaded_by, created_at";

/// Provides append and lookup operations for milestone versions.
pub struct MilestoneVersionRepo;

impl MilestoneVersionRepo {
    /// Append a version, assigning the next sequential number and its
    /// default `V{n}.0` label.
    ///
    /// The parent milestone row is locked for the duration of the
    /// transaction so concurrent uploads to the same milestone serialize
    /// and receive distinct numbers. The unique constraint on
    /// `(milestone_id, version_number)` backstops the lock.
    pub async fn create(
        pool: &PgPool,
        input: &CreateMilestoneVersion,
    ) -> Result<MilestoneVersion, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT id FROM milestones WHERE id = $1 FOR UPDATE")
            .bind(input.milestone_id)
            .fetch_one(&mut *tx)
            .await?;

        let next: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(version_number), 0) + 1 FROM milestone_versions
             WHERE milestone_id = $1",
        )
        .bind(input.milestone_id)
        .fetch_one(&mut *tx)
        .await?;

        let query = format!(
            "INSERT INTO milestone_versions (milestone_id, version_number, label, file_path, \
                                             origin, uploaded_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let version = sqlx::query_as::<_, MilestoneVersion>(&query)
            .bind(input.milestone_id)
            .bind(next)
            .bind(version_label(next))
            .bind(&input.file_path)
            .bind(&input.origin)
            .bind(input.uploaded_by)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(version)
    }

    /// List a milestone's versions, newest first.
    pub async fn list_for_milestone(
        pool: &PgPool,
        milestone_id: DbId,
    ) -> Result<Vec<MilestoneVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM milestone_versions
             WHERE milestone_id = $1
             ORDER BY version_number DESC"
        );
        sqlx::query_as::<_, MilestoneVersion>(&query)
            .bind(milestone_id)
            .fetch_all(pool)
            .await
    }

    /// The latest version of a milestone, if any.
    pub async fn latest_for_milestone(
        pool: &PgPool,
        milestone_id: DbId,
    ) -> Result<Option<MilestoneVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM milestone_versions
             WHERE milestone_id = $1
             ORDER BY version_number DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, MilestoneVersion>(&query)
            .bind(milestone_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a version by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<MilestoneVersion>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM milestone_versions WHERE id = $1");
        sqlx::query_as::<_, MilestoneVersion>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
