//! Route definitions for the `/notifications` inbox.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::notifications;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET  /                 -> list (?unread=true&limit&offset)
/// GET  /unread-count     -> unread counter
/// POST /{id}/read        -> mark one read
/// POST /read-all         -> mark all read
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(notifications::list))
        .route("/unread-count", get(notifications::unread_count))
        .route("/{id}/read", post(notifications::mark_read))
        .route("/read-all", post(notifications::mark_all_read))
}
