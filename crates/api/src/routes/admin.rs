//! Route definitions for the admin `/admin/users` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin_users;
use crate::state::AppState;

/// Routes mounted at `/admin/users` (all admin only).
///
/// ```text
/// GET  /                      -> list
/// POST /                      -> create
/// GET  /{id}                  -> get_by_id
/// PUT  /{id}                  -> update
/// POST /{id}/role             -> set_role
/// POST /{id}/unlock           -> unlock
/// POST /{id}/reset-password   -> reset_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(admin_users::list).post(admin_users::create))
        .route(
            "/{id}",
            get(admin_users::get_by_id).put(admin_users::update),
        )
        .route("/{id}/role", post(admin_users::set_role))
        .route("/{id}/unlock", post(admin_users::unlock))
        .route("/{id}/reset-password", post(admin_users::reset_password))
}
