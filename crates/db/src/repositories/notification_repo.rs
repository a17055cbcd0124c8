//! Repository for the `notifications` table.

use sigep_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::Notification;

/// Column list for `notifications` queries.
const COLUMNS: &str = "id, recipient_id, project_id, preview, is_read, created_at";

/// Provides fan-out and inbox operations for notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert one notification per recipient in a single statement.
    ///
    /// Returns the number of rows created. An empty recipient list is a
    /// no-op rather than an error so dispatch sites need not special-case
    /// "no admins configured". Conflicting rows are dropped instead of
    /// failing the whole batch.
    pub async fn create_batch(
        pool: &PgPool,
        recipients: &[DbId],
        project_id: Option<DbId>,
        preview: &str,
    ) -> Result<u64, sqlx::Error> {
        if recipients.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(
            "INSERT INTO notifications (recipient_id, project_id, preview)
             SELECT r, $2, $3 FROM UNNEST($1::BIGINT[]) AS r
             ON CONFLICT DO NOTHING",
        )
        .bind(recipients)
        .bind(project_id)
        .bind(preview)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// List a recipient's notifications, newest first.
    ///
    /// When `unread_only` is `true`, only notifications with
    /// `is_read = false` are returned.
    pub async fn list_for_recipient(
        pool: &PgPool,
        recipient_id: DbId,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let filter = if unread_only {
            "AND is_read = false"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM notifications
             WHERE recipient_id = $1 {filter}
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(recipient_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count a recipient's unread notifications.
    pub async fn unread_count(pool: &PgPool, recipient_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND is_read = false",
        )
        .bind(recipient_id)
        .fetch_one(pool)
        .await
    }

    /// Mark a single notification as read.
    ///
    /// Returns `true` if the notification exists for the given recipient,
    /// already-read included, so re-marking is a no-op rather than an
    /// error. Scoping by recipient means one user can never mark another's
    /// notification.
    pub async fn mark_read(
        pool: &PgPool,
        notification_id: DbId,
        recipient_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = true
             WHERE id = $1 AND recipient_id = $2",
        )
        .bind(notification_id)
        .bind(recipient_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark all of a recipient's notifications as read, returning the count.
    pub async fn mark_all_read(pool: &PgPool, recipient_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = true
             WHERE recipient_id = $1 AND is_read = false",
        )
        .bind(recipient_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
