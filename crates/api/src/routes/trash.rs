//! Route definitions for the admin `/trash` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::trash;
use crate::state::AppState;

/// Routes mounted at `/trash` (all admin only).
///
/// ```text
/// GET    /                          -> combined listing
/// POST   /projects/{id}             -> trash_project
/// POST   /projects/{id}/restore     -> restore_project
/// DELETE /projects/{id}/purge       -> purge_project (password confirm)
/// POST   /users/{id}                -> trash_user
/// POST   /users/{id}/restore        -> restore_user
/// DELETE /users/{id}/purge          -> purge_user (password confirm)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(trash::list))
        .route("/projects/{id}", post(trash::trash_project))
        .route("/projects/{id}/restore", post(trash::restore_project))
        .route("/projects/{id}/purge", delete(trash::purge_project))
        .route("/users/{id}", post(trash::trash_user))
        .route("/users/{id}/restore", post(trash::restore_user))
        .route("/users/{id}/purge", delete(trash::purge_user))
}
