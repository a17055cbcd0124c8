//! Handlers for the `/notifications` inbox.
//!
//! Every operation is scoped to the authenticated recipient; there is no
//! admin view into another user's inbox.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use sigep_core::error::CoreError;
use sigep_core::types::DbId;

use sigep_db::models::notification::Notification;
use sigep_db::repositories::NotificationRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Query parameters for the inbox listing.
#[derive(Debug, Deserialize)]
pub struct InboxQuery {
    /// Only unread notifications when `true`.
    #[serde(default)]
    pub unread: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Unread counter payload.
#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub unread: i64,
}

/// GET /api/v1/notifications
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<InboxQuery>,
) -> AppResult<Json<Vec<Notification>>> {
    let limit = params.limit.unwrap_or(50).clamp(1, 200);
    let offset = params.offset.unwrap_or(0).max(0);
    let items = NotificationRepo::list_for_recipient(
        &state.pool,
        auth.user_id,
        params.unread,
        limit,
        offset,
    )
    .await?;
    Ok(Json(items))
}

/// GET /api/v1/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<UnreadCount>> {
    let unread = NotificationRepo::unread_count(&state.pool, auth.user_id).await?;
    Ok(Json(UnreadCount { unread }))
}

/// POST /api/v1/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let marked = NotificationRepo::mark_read(&state.pool, id, auth.user_id).await?;
    if marked {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::NotFoundOrForbidden {
            entity: "Notification",
        }
        .into())
    }
}

/// POST /api/v1/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<serde_json::Value>> {
    let marked = NotificationRepo::mark_all_read(&state.pool, auth.user_id).await?;
    Ok(Json(serde_json::json!({ "marked": marked })))
}
