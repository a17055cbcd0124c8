//! Handlers for the academic catalog lookups (programs, tracks, sections).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use sigep_core::error::CoreError;

use sigep_db::models::catalog::CatalogEntry;
use sigep_db::repositories::catalog_repo::{Catalog, CatalogRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::state::AppState;

/// Request body for creating a catalog entry.
#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    pub name: String,
}

fn parse_catalog(name: &str) -> AppResult<Catalog> {
    match name {
        "programs" => Ok(Catalog::Programs),
        "tracks" => Ok(Catalog::Tracks),
        "sections" => Ok(Catalog::Sections),
        other => Err(AppError::BadRequest(format!("Unknown catalog: {other}"))),
    }
}

/// GET /api/v1/catalogs/{catalog}
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(catalog): Path<String>,
) -> AppResult<Json<Vec<CatalogEntry>>> {
    let catalog = parse_catalog(&catalog)?;
    Ok(Json(CatalogRepo::list(&state.pool, catalog).await?))
}

/// POST /api/v1/catalogs/{catalog}
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(catalog): Path<String>,
    Json(req): Json<CreateEntryRequest>,
) -> AppResult<(StatusCode, Json<CatalogEntry>)> {
    let catalog = parse_catalog(&catalog)?;
    let name = req.name.trim();
    if name.is_empty() {
        return Err(CoreError::Validation("Catalog entry name must not be empty".into()).into());
    }
    let entry = CatalogRepo::create(&state.pool, catalog, name).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}
