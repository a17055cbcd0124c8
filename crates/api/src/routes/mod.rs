pub mod admin;
pub mod auth;
pub mod catalogs;
pub mod health;
pub mod notifications;
pub mod projects;
pub mod trash;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
/// /auth/me                                         current account
/// /auth/change-password                            change own password
///
/// /projects                                        list, create
/// /projects/{id}                                   get, update
/// /projects/{id}/document                          upload project document
/// /projects/{id}/review                            review decision (admin)
/// /projects/{id}/milestones                        milestone overview
/// /projects/{id}/milestones/{name}                 review update (admin)
/// /projects/{id}/milestones/{name}/versions        upload version
///
/// /notifications                                   inbox
/// /notifications/unread-count                      unread counter
/// /notifications/{id}/read                         mark one read
/// /notifications/read-all                          mark all read
///
/// /catalogs/{catalog}                              list, create (create: admin)
///
/// /admin/users                                     list, create (admin only)
/// /admin/users/{id}                                get, update
/// /admin/users/{id}/role                           assign role
/// /admin/users/{id}/unlock                         clear lockout
/// /admin/users/{id}/reset-password                 reset password
///
/// /trash                                           combined listing (admin)
/// /trash/projects/{id}[/restore|/purge]            project lifecycle
/// /trash/users/{id}[/restore|/purge]               user lifecycle
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/projects", projects::router())
        .nest("/notifications", notifications::router())
        .nest("/catalogs", catalogs::router())
        .nest("/admin/users", admin::router())
        .nest("/trash", trash::router())
}
