//! Repository for the academic catalog tables.
//!
//! Programs, tracks, and sections share one shape, so a single repo
//! serves all three behind a table selector.

use sigep_core::types::DbId;
use sqlx::PgPool;

use crate::models::catalog::CatalogEntry;

/// Which catalog table a call addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Catalog {
    Programs,
    Tracks,
    Sections,
}

impl Catalog {
    fn table(self) -> &'static str {
        match self {
            Catalog::Programs => "programs",
            Catalog::Tracks => "tracks",
            Catalog::Sections => "sections",
        }
    }
}

/// Provides lookups over the catalog tables.
pub struct CatalogRepo;

impl CatalogRepo {
    /// Insert a catalog entry, returning the created row.
    pub async fn create(
        pool: &PgPool,
        catalog: Catalog,
        name: &str,
    ) -> Result<CatalogEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO {} (name) VALUES ($1) RETURNING id, name",
            catalog.table()
        );
        sqlx::query_as::<_, CatalogEntry>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    /// Find an entry by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        catalog: Catalog,
        id: DbId,
    ) -> Result<Option<CatalogEntry>, sqlx::Error> {
        let query = format!("SELECT id, name FROM {} WHERE id = $1", catalog.table());
        sqlx::query_as::<_, CatalogEntry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all entries in name order.
    pub async fn list(pool: &PgPool, catalog: Catalog) -> Result<Vec<CatalogEntry>, sqlx::Error> {
        let query = format!("SELECT id, name FROM {} ORDER BY name", catalog.table());
        sqlx::query_as::<_, CatalogEntry>(&query).fetch_all(pool).await
    }
}
