//! Route definitions for the `/catalogs` lookups.

use axum::routing::get;
use axum::Router;

use crate::handlers::catalogs;
use crate::state::AppState;

/// Routes mounted at `/catalogs`.
///
/// ```text
/// GET  /{catalog}   -> list entries (programs | tracks | sections)
/// POST /{catalog}   -> create entry (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{catalog}", get(catalogs::list).post(catalogs::create))
}
