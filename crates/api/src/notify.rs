//! Notification dispatch helpers.
//!
//! All fan-out goes through these two functions so every dispatch site
//! truncates previews the same way and logs the delivery count.

use sigep_core::notification::truncate_preview;
use sigep_core::types::DbId;
use sigep_db::repositories::{NotificationRepo, UserRepo};
use sqlx::PgPool;

/// Notify every active account with administrative capability.
///
/// An empty admin set is a quiet no-op.
pub async fn notify_admins(
    pool: &PgPool,
    project_id: Option<DbId>,
    preview: &str,
) -> Result<(), sqlx::Error> {
    let admins = UserRepo::active_admin_ids(pool).await?;
    let created =
        NotificationRepo::create_batch(pool, &admins, project_id, &truncate_preview(preview))
            .await?;
    tracing::debug!(recipients = created, "admin notification fan-out");
    Ok(())
}

/// Notify a single user.
pub async fn notify_user(
    pool: &PgPool,
    recipient_id: DbId,
    project_id: Option<DbId>,
    preview: &str,
) -> Result<(), sqlx::Error> {
    NotificationRepo::create_batch(pool, &[recipient_id], project_id, &truncate_preview(preview))
        .await?;
    Ok(())
}
