//! Route definitions for the `/projects` resource, including the nested
//! milestone progression endpoints.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{milestones, projects};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET  /                                    -> list (role-scoped)
/// POST /                                    -> create
/// GET  /{id}                                -> get_by_id
/// PUT  /{id}                                -> update
/// POST /{id}/document                       -> upload_document
/// POST /{id}/review                         -> review (admin)
/// GET  /{id}/milestones                     -> milestone overview
/// PUT  /{id}/milestones/{name}              -> milestone review (admin)
/// POST /{id}/milestones/{name}/versions     -> upload_version
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list).post(projects::create))
        .route("/{id}", get(projects::get_by_id).put(projects::update))
        .route("/{id}/document", post(projects::upload_document))
        .route("/{id}/review", post(projects::review))
        .route("/{id}/milestones", get(milestones::list))
        .route("/{id}/milestones/{name}", put(milestones::review))
        .route(
            "/{id}/milestones/{name}/versions",
            post(milestones::upload_version),
        )
}
