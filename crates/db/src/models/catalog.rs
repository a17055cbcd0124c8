//! Academic catalog entities: programs, tracks, and sections.

use serde::Serialize;
use sigep_core::types::DbId;
use sqlx::FromRow;

/// A row from one of the catalog tables. All three share the same shape.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CatalogEntry {
    pub id: DbId,
    pub name: String,
}
