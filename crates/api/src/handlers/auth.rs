//! Handlers for registration, login, and session-level account actions.
//!
//! Login enforces the failed-attempt lockout: five consecutive failures
//! deactivate the account, stamp `locked_at`, and notify administrators.
//! Only an administrator unlock (or the counter reset on a successful
//! earlier attempt) reopens the account.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use sigep_core::error::CoreError;
use sigep_core::lockout::{attempts_remaining, is_lockout_threshold, AccountLock};
use sigep_core::notification::account_locked_preview;
use validator::Validate;

use sigep_db::models::user::{CreateUser, User};
use sigep_db::repositories::{ProfileRepo, UserRepo};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::notify::notify_admins;
use crate::state::AppState;

/// Request body for student self-registration.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 150))]
    pub username: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 150))]
    pub first_name: String,
    #[validate(length(max = 150))]
    pub last_name: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for a password change by the authenticated user.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Successful login payload.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: AccountInfo,
}

/// Response-safe account projection.
#[derive(Debug, Serialize)]
pub struct AccountInfo {
    pub id: sigep_core::types::DbId,
    pub username: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub is_superuser: bool,
}

fn account_info(user: &User, role: &str) -> AccountInfo {
    AccountInfo {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        role: role.to_string(),
        is_superuser: user.is_superuser,
    }
}

/// POST /api/v1/auth/register
///
/// Self-registration creates a student account. Duplicate username or
/// email reports a specific conflict before the insert is attempted.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AccountInfo>)> {
    req.validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;
    validate_password_strength(&req.password, state.config.password_min_length)
        .map_err(CoreError::Validation)?;

    if UserRepo::find_by_username(&state.pool, &req.username)
        .await?
        .is_some()
    {
        return Err(CoreError::DuplicateUsername(req.username).into());
    }
    if let Some(ref email) = req.email {
        if UserRepo::find_by_email(&state.pool, email).await?.is_some() {
            return Err(CoreError::DuplicateEmail(email.clone()).into());
        }
    }

    let password_hash = hash_password(&req.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: req.username,
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
            password_hash,
            is_superuser: false,
        },
    )
    .await?;
    let profile = ProfileRepo::ensure_for_user(&state.pool, user.id).await?;

    tracing::info!(user_id = user.id, username = %user.username, "student registered");
    Ok((StatusCode::CREATED, Json(account_info(&user, &profile.role))))
}

/// POST /api/v1/auth/login
///
/// Blocked accounts (locked out or suspended) are rejected before the
/// password check so the guidance message never leaks whether the
/// password was right.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let Some(user) = UserRepo::find_by_username(&state.pool, &req.username).await? else {
        return Err(CoreError::Unauthorized("Invalid credentials".into()).into());
    };
    let profile = ProfileRepo::ensure_for_user(&state.pool, user.id).await?;

    let lock = AccountLock::classify(user.is_active, profile.locked_at);
    if let Some(guidance) = lock.guidance() {
        return Err(CoreError::Forbidden(guidance.to_string()).into());
    }

    let verified = verify_password(&req.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;

    if !verified {
        let attempts = ProfileRepo::increment_failed_attempts(&state.pool, user.id).await?;
        if is_lockout_threshold(attempts) {
            ProfileRepo::lock(&state.pool, user.id).await?;
            notify_admins(&state.pool, None, &account_locked_preview(&user.username)).await?;
            tracing::warn!(user_id = user.id, "account locked after failed attempts");
            if let Some(guidance) = AccountLock::LockedForFailedAttempts.guidance() {
                return Err(CoreError::Forbidden(guidance.to_string()).into());
            }
        }
        return Err(CoreError::Unauthorized(format!(
            "Invalid credentials. {} attempts remaining",
            attempts_remaining(attempts)
        ))
        .into());
    }

    ProfileRepo::record_login_success(&state.pool, user.id).await?;

    let access_token =
        generate_access_token(user.id, &profile.role, user.is_superuser, &state.config.jwt)
            .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = user.id, "login succeeded");
    Ok(Json(LoginResponse {
        access_token,
        token_type: "Bearer",
        user: account_info(&user, &profile.role),
    }))
}

/// GET /api/v1/auth/me
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<AccountInfo>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        })?;
    let profile = ProfileRepo::ensure_for_user(&state.pool, user.id).await?;
    Ok(Json(account_info(&user, &profile.role)))
}

/// POST /api/v1/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        })?;

    let verified = verify_password(&req.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;
    if !verified {
        return Err(CoreError::Unauthorized("Current password is incorrect".into()).into());
    }

    validate_password_strength(&req.new_password, state.config.password_min_length)
        .map_err(CoreError::Validation)?;
    let password_hash = hash_password(&req.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &password_hash).await?;

    tracing::info!(user_id = user.id, "password changed");
    Ok(StatusCode::NO_CONTENT)
}
