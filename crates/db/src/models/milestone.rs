//! Milestone and milestone-version entity models and DTOs.

use serde::Serialize;
use sigep_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `milestones` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Milestone {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub review_status: String,
    pub feedback: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `milestone_versions` table. Versions are append-only.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MilestoneVersion {
    pub id: DbId,
    pub milestone_id: DbId,
    pub version_number: i32,
    pub label: String,
    pub file_path: String,
    pub origin: String,
    pub uploaded_by: Option<DbId>,
    pub created_at: Timestamp,
}

/// DTO for appending a version to a milestone. The version number and
/// default label are assigned inside the repository transaction.
#[derive(Debug)]
pub struct CreateMilestoneVersion {
    pub milestone_id: DbId,
    pub file_path: String,
    pub origin: String,
    pub uploaded_by: Option<DbId>,
}
