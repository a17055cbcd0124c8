//! Project entity models and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sigep_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub owner_id: DbId,
    pub program_id: DbId,
    pub track_id: DbId,
    pub section_id: Option<DbId>,
    pub title: String,
    pub description: String,
    pub authors: String,
    pub keywords: String,
    pub tutor: String,
    pub review_status: String,
    pub reviewed: bool,
    pub grade: Option<i32>,
    pub feedback: Option<String>,
    pub file_path: Option<String>,
    pub created_on: NaiveDate,
    pub is_trashed: bool,
    pub trashed_at: Option<Timestamp>,
    pub trashed_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a new project.
#[derive(Debug)]
pub struct CreateProject {
    pub owner_id: DbId,
    pub program_id: DbId,
    pub track_id: DbId,
    pub section_id: Option<DbId>,
    pub title: String,
    pub description: String,
    pub authors: String,
    pub keywords: String,
    pub tutor: String,
    pub created_on: NaiveDate,
    pub file_path: Option<String>,
}

/// DTO for patching a project's descriptive content.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProject {
    pub program_id: Option<DbId>,
    pub track_id: Option<DbId>,
    pub section_id: Option<DbId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub authors: Option<String>,
    pub keywords: Option<String>,
    pub tutor: Option<String>,
}
