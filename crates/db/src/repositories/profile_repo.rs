//! Repository for the `profiles` table.

use sigep_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::Profile;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, role, failed_login_attempts, locked_at, photo_path, \
                       is_trashed, trashed_at, created_at, updated_at";

/// Provides CRUD operations for user profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Ensure a profile row exists for the user, creating a default
    /// student profile when absent. Idempotent under concurrent calls.
    pub async fn ensure_for_user(pool: &PgPool, user_id: DbId) -> Result<Profile, sqlx::Error> {
        sqlx::query("INSERT INTO profiles (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(pool)
            .await?;
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE user_id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Find a profile by its owning user.
    pub async fn find_by_user(pool: &PgPool, user_id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE user_id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Assign a role.
    pub async fn set_role(pool: &PgPool, user_id: DbId, role: &str) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE profiles SET role = $2, updated_at = NOW() WHERE user_id = $1")
                .bind(user_id)
                .bind(role)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set or clear the profile photo path.
    pub async fn set_photo(
        pool: &PgPool,
        user_id: DbId,
        photo_path: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE profiles SET photo_path = $2, updated_at = NOW() WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(photo_path)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomically bump the failed-login counter, returning the new value.
    ///
    /// The read-modify-write happens in one statement so concurrent failed
    /// attempts each observe a distinct count.
    pub async fn increment_failed_attempts(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE profiles
             SET failed_login_attempts = failed_login_attempts + 1, updated_at = NOW()
             WHERE user_id = $1
             RETURNING failed_login_attempts",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Record a lockout: stamp `locked_at` and deactivate the account.
    pub async fn lock(pool: &PgPool, user_id: DbId) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("UPDATE profiles SET locked_at = NOW(), updated_at = NOW() WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE users SET is_active = false, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await
    }

    /// Clear lockout state: zero the counter, clear `locked_at`, and
    /// reactivate the account. Used both on successful login and when an
    /// administrator unlocks an account.
    pub async fn reset_lockout(pool: &PgPool, user_id: DbId) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query(
            "UPDATE profiles
             SET failed_login_attempts = 0, locked_at = NULL, updated_at = NOW()
             WHERE user_id = $1",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("UPDATE users SET is_active = true, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await
    }

    /// Record a successful authentication: zero the failed-attempt counter
    /// and clear the lock timestamp, unconditionally and without touching
    /// activation.
    pub async fn record_login_success(pool: &PgPool, user_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE profiles
             SET failed_login_attempts = 0, locked_at = NULL, updated_at = NOW()
             WHERE user_id = $1",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Move a user to the trash.
    ///
    /// Returns `true` if the profile was not already trashed.
    pub async fn send_to_trash(pool: &PgPool, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE profiles
             SET is_trashed = true, trashed_at = NOW(), updated_at = NOW()
             WHERE user_id = $1 AND is_trashed = false",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a trashed user.
    ///
    /// Returns `true` if the profile was trashed and is now restored.
    pub async fn restore_from_trash(pool: &PgPool, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE profiles
             SET is_trashed = false, trashed_at = NULL, updated_at = NOW()
             WHERE user_id = $1 AND is_trashed = true",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
