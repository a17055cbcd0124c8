use std::sync::Arc;

use crate::config::ServerConfig;
use crate::storage::DocumentStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: sigep_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Backing store for uploaded project and milestone documents.
    pub storage: Arc<dyn DocumentStore>,
}
