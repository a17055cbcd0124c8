//! User and profile entity models and DTOs.

use serde::{Deserialize, Serialize};
use sigep_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `users` table.
///
/// Carries the password hash; never serialize this struct to a response.
/// Use [`UserSummary`] for anything that leaves the server.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `profiles` table (1:1 with `users`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub user_id: DbId,
    pub role: String,
    pub failed_login_attempts: i32,
    pub locked_at: Option<Timestamp>,
    pub photo_path: Option<String>,
    pub is_trashed: bool,
    pub trashed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Response-safe projection of a user joined with their profile.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserSummary {
    pub id: DbId,
    pub username: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub role: String,
    pub failed_login_attempts: i32,
    pub locked_at: Option<Timestamp>,
    pub is_trashed: bool,
    pub trashed_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for inserting a new user. The password arrives already hashed.
#[derive(Debug)]
pub struct CreateUser {
    pub username: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub is_superuser: bool,
}

/// DTO for patching user account fields.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
}
