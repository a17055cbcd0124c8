//! Repository for the `users` table.

use sigep_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, UpdateUser, User, UserSummary};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, first_name, last_name, password_hash, \
                       is_active, is_superuser, created_at, updated_at";

/// Columns for the user + profile summary projection.
const SUMMARY_COLUMNS: &str = "u.id, u.username, u.email, u.first_name, u.last_name, \
                               u.is_active, u.is_superuser, p.role, p.failed_login_attempts, \
                               p.locked_at, p.is_trashed, p.trashed_at, u.created_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, first_name, last_name, password_hash, is_superuser)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.password_hash)
            .bind(input.is_superuser)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List all non-trashed users with their profiles, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<UserSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM users u
             JOIN profiles p ON p.user_id = u.id
             WHERE p.is_trashed = false
             ORDER BY u.created_at DESC"
        );
        sqlx::query_as::<_, UserSummary>(&query)
            .fetch_all(pool)
            .await
    }

    /// List trashed users with their profiles, most recently trashed first.
    pub async fn list_trashed(pool: &PgPool) -> Result<Vec<UserSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM users u
             JOIN profiles p ON p.user_id = u.id
             WHERE p.is_trashed = true
             ORDER BY p.trashed_at DESC"
        );
        sqlx::query_as::<_, UserSummary>(&query)
            .fetch_all(pool)
            .await
    }

    /// IDs of active accounts with administrative capability. Used for
    /// admin-audience notification fan-out.
    pub async fn active_admin_ids(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT u.id FROM users u
             LEFT JOIN profiles p ON p.user_id = u.id
             WHERE u.is_active = true
               AND (u.is_superuser = true OR p.role = 'ADMIN')",
        )
        .fetch_all(pool)
        .await
    }

    /// Update a user. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                email = COALESCE($2, email),
                first_name = COALESCE($3, first_name),
                last_name = COALESCE($4, last_name),
                is_active = COALESCE($5, is_active),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Replace a user's password hash.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(password_hash)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set the `is_active` flag.
    ///
    /// Returns `true` if the row was updated.
    pub async fn set_active(pool: &PgPool, id: DbId, is_active: bool) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET is_active = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(is_active)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete a user row. Cascades remove the profile, the
    /// user's projects, and dependent rows.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
