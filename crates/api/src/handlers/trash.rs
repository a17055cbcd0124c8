//! Handlers for the admin `/trash` resource.
//!
//! Projects and user accounts share the same lifecycle: trash hides the
//! entity, restore brings it back intact, and purge permanently deletes a
//! trashed entity after the administrator re-confirms their own password.
//! Stored document cleanup on purge is best-effort; the database row
//! removal is what must not fail.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use sigep_core::error::CoreError;
use sigep_core::types::DbId;

use sigep_db::models::project::Project;
use sigep_db::models::user::UserSummary;
use sigep_db::repositories::{ProfileRepo, ProjectRepo, UserRepo};

use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Request body confirming a purge with the administrator's own password.
#[derive(Debug, Deserialize)]
pub struct PurgeConfirm {
    pub password: String,
}

/// Combined trash listing.
#[derive(Debug, Serialize)]
pub struct TrashSummary {
    pub projects: Vec<Project>,
    pub users: Vec<UserSummary>,
}

/// Verify the calling administrator's password before a destructive action.
async fn confirm_password(state: &AppState, admin: &AuthUser, password: &str) -> AppResult<()> {
    let user = UserRepo::find_by_id(&state.pool, admin.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: admin.user_id,
        })?;
    let verified = verify_password(password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))?;
    if verified {
        Ok(())
    } else {
        Err(CoreError::InvalidConfirmation.into())
    }
}

/// GET /api/v1/trash
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<TrashSummary>> {
    let projects = ProjectRepo::list_trashed(&state.pool).await?;
    let users = UserRepo::list_trashed(&state.pool).await?;
    Ok(Json(TrashSummary { projects, users }))
}

/// POST /api/v1/trash/projects/{id}
pub async fn trash_project(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let trashed = ProjectRepo::send_to_trash(&state.pool, id, admin.user_id).await?;
    if trashed {
        tracing::info!(project_id = id, by = admin.user_id, "project moved to trash");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::NotFound { entity: "Project", id }.into())
    }
}

/// POST /api/v1/trash/projects/{id}/restore
pub async fn restore_project(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let restored = ProjectRepo::restore_from_trash(&state.pool, id).await?;
    if restored {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::NotInTrash { entity: "Project", id }.into())
    }
}

/// DELETE /api/v1/trash/projects/{id}/purge
///
/// Requires the project to be in the trash and the administrator's
/// password in the body. Document files are removed after the row delete
/// commits.
pub async fn purge_project(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(confirm): Json<PurgeConfirm>,
) -> AppResult<StatusCode> {
    let project = ProjectRepo::find_by_id_any(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Project", id })?;
    if !project.is_trashed {
        return Err(CoreError::NotInTrash { entity: "Project", id }.into());
    }
    confirm_password(&state, &admin, &confirm.password).await?;

    let purge = ProjectRepo::hard_delete(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Project", id })?;
    remove_files(&state, &purge.file_paths).await;

    tracing::info!(project_id = id, by = admin.user_id, "project purged");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/trash/users/{id}
///
/// Administrators cannot trash themselves or a superuser account. The
/// account is deactivated while in the trash.
pub async fn trash_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(CoreError::ForbiddenTarget(
            "Cannot move your own account to the trash".into(),
        )
        .into());
    }
    let target = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "User", id })?;
    if target.is_superuser {
        return Err(CoreError::ForbiddenTarget(
            "Cannot move a superuser account to the trash".into(),
        )
        .into());
    }

    ProfileRepo::ensure_for_user(&state.pool, id).await?;
    let trashed = ProfileRepo::send_to_trash(&state.pool, id).await?;
    if trashed {
        UserRepo::set_active(&state.pool, id, false).await?;
        tracing::info!(user_id = id, by = admin.user_id, "user moved to trash");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::Conflict("User is already in the trash".into()).into())
    }
}

/// POST /api/v1/trash/users/{id}/restore
///
/// Restoring reactivates the account and discards any lockout state
/// accrued before it was trashed, so the account never comes back active
/// with a stale lock timestamp or failed-attempt counter.
pub async fn restore_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let restored = ProfileRepo::restore_from_trash(&state.pool, id).await?;
    if restored {
        ProfileRepo::reset_lockout(&state.pool, id).await?;
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::NotInTrash { entity: "User", id }.into())
    }
}

/// DELETE /api/v1/trash/users/{id}/purge
///
/// Permanently deletes a trashed account, its projects, and their stored
/// documents, after password confirmation.
pub async fn purge_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(confirm): Json<PurgeConfirm>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(CoreError::ForbiddenTarget("Cannot purge your own account".into()).into());
    }
    let target = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "User", id })?;
    if target.is_superuser {
        return Err(CoreError::ForbiddenTarget("Cannot purge a superuser account".into()).into());
    }
    let profile = ProfileRepo::find_by_user(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "User", id })?;
    if !profile.is_trashed {
        return Err(CoreError::NotInTrash { entity: "User", id }.into());
    }
    confirm_password(&state, &admin, &confirm.password).await?;

    // Purge the user's projects first so their documents can be cleaned up.
    for project_id in ProjectRepo::ids_for_owner_any(&state.pool, id).await? {
        if let Some(purge) = ProjectRepo::hard_delete(&state.pool, project_id).await? {
            remove_files(&state, &purge.file_paths).await;
        }
    }
    if let Some(photo) = profile.photo_path {
        remove_files(&state, std::slice::from_ref(&photo)).await;
    }

    let deleted = UserRepo::hard_delete(&state.pool, id).await?;
    if !deleted {
        return Err(CoreError::NotFound { entity: "User", id }.into());
    }

    tracing::info!(user_id = id, by = admin.user_id, "user purged");
    Ok(StatusCode::NO_CONTENT)
}

/// Best-effort removal of stored documents; failures are logged, never
/// surfaced, because the database rows are already gone.
async fn remove_files(state: &AppState, paths: &[String]) {
    for path in paths {
        if let Err(e) = state.storage.remove(path).await {
            tracing::warn!(path = %path, error = %e, "failed to remove stored document");
        }
    }
}
