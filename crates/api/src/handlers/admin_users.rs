//! Handlers for the admin `/admin/users` resource: account management,
//! role assignment, and lockout administration.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use sigep_core::error::CoreError;
use sigep_core::roles::validate_role;
use sigep_core::types::DbId;
use validator::Validate;

use sigep_db::models::user::{CreateUser, UpdateUser, User, UserSummary};
use sigep_db::repositories::{ProfileRepo, UserRepo};

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Request body for an admin-created account.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 150))]
    pub username: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 150))]
    pub first_name: String,
    #[validate(length(max = 150))]
    pub last_name: String,
    pub password: String,
    /// `ADMIN` or `ESTUDIANTE`; defaults to student.
    pub role: Option<String>,
}

/// Request body for a role change.
#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: String,
}

/// Request body for an admin password reset.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

async fn summary_for(state: &AppState, user: &User) -> AppResult<UserSummary> {
    let profile = ProfileRepo::ensure_for_user(&state.pool, user.id).await?;
    Ok(UserSummary {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        is_active: user.is_active,
        is_superuser: user.is_superuser,
        role: profile.role,
        failed_login_attempts: profile.failed_login_attempts,
        locked_at: profile.locked_at,
        is_trashed: profile.is_trashed,
        trashed_at: profile.trashed_at,
        created_at: user.created_at,
    })
}

/// GET /api/v1/admin/users
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<Vec<UserSummary>>> {
    Ok(Json(UserRepo::list(&state.pool).await?))
}

/// POST /api/v1/admin/users
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(req): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserSummary>)> {
    req.validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;
    validate_password_strength(&req.password, state.config.password_min_length)
        .map_err(CoreError::Validation)?;
    let role = req.role.as_deref().unwrap_or(sigep_core::roles::ROLE_STUDENT);
    validate_role(role)?;

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
    ProfileRepo::ensure_for_user(&state.pool, user.id).await?;
    ProfileRepo::set_role(&state.pool, user.id, role).await?;

    tracing::info!(user_id = user.id, role, by = admin.user_id, "account created");
    let summary = summary_for(&state, &user).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserSummary>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "User", id })?;
    let summary = summary_for(&state, &user).await?;
    Ok(Json(summary))
}

/// PUT /api/v1/admin/users/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<UserSummary>> {
    let user = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound { entity: "User", id })?;
    let summary = summary_for(&state, &user).await?;
    Ok(Json(summary))
}

/// POST /api/v1/admin/users/{id}/role
pub async fn set_role(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(req): Json<SetRoleRequest>,
) -> AppResult<StatusCode> {
    validate_role(&req.role)?;
    ProfileRepo::ensure_for_user(&state.pool, id).await?;
    let updated = ProfileRepo::set_role(&state.pool, id, &req.role).await?;
    if updated {
        tracing::info!(user_id = id, role = %req.role, by = admin.user_id, "role assigned");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::NotFound { entity: "User", id }.into())
    }
}

/// POST /api/v1/admin/users/{id}/unlock
///
/// The single unlock operation: zeroes the failed-attempt counter, clears
/// the lock timestamp, and reactivates the account.
pub async fn unlock(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "User", id })?;
    ProfileRepo::ensure_for_user(&state.pool, id).await?;
    ProfileRepo::reset_lockout(&state.pool, id).await?;
    tracing::info!(user_id = id, by = admin.user_id, "account unlocked");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/users/{id}/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(req): Json<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    validate_password_strength(&req.new_password, state.config.password_min_length)
        .map_err(CoreError::Validation)?;
    let password_hash = hash_password(&req.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;
    let updated = UserRepo::update_password(&state.pool, id, &password_hash).await?;
    if updated {
        tracing::info!(user_id = id, by = admin.user_id, "password reset");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::NotFound { entity: "User", id }.into())
    }
}
