//! Notification entity model.

use serde::Serialize;
use sigep_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub recipient_id: DbId,
    pub project_id: Option<DbId>,
    pub preview: String,
    pub is_read: bool,
    pub created_at: Timestamp,
}
