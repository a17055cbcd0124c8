//! Handlers for the milestone progression under `/projects/{id}/milestones`.
//!
//! Gating is recomputed from current statuses on every request, never
//! persisted: MOMENTO I is always open, every later milestone opens only
//! once its predecessor is CORREGIDO.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use sigep_core::error::CoreError;
use sigep_core::milestone::{
    is_milestone_open, validate_milestone_status, MilestoneName, MILESTONE_CORRECTED,
};
use sigep_core::notification::{milestone_update_preview, new_version_preview};
use sigep_core::roles::{ROLE_ADMIN, ROLE_STUDENT};
use sigep_core::types::DbId;

use sigep_db::models::milestone::{CreateMilestoneVersion, Milestone, MilestoneVersion};
use sigep_db::repositories::{MilestoneRepo, MilestoneVersionRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::notify::{notify_admins, notify_user};
use crate::state::AppState;

use super::projects::read_single_file;

/// A milestone with its computed gating state and version history.
#[derive(Debug, Serialize)]
pub struct MilestoneOverview {
    #[serde(flatten)]
    pub milestone: Milestone,
    /// Whether the milestone currently accepts student uploads.
    pub is_open: bool,
    pub versions: Vec<MilestoneVersion>,
}

/// Request body for an admin review update on a milestone.
#[derive(Debug, Deserialize)]
pub struct MilestoneReviewRequest {
    pub review_status: Option<String>,
    pub feedback: Option<String>,
}

/// Resolve the project for the caller, then the named milestone within it.
async fn load_milestone(
    state: &AppState,
    auth: &AuthUser,
    project_id: DbId,
    name: &str,
) -> AppResult<(MilestoneName, Milestone)> {
    let visible = if auth.is_admin() {
        ProjectRepo::find_by_id(&state.pool, project_id).await?
    } else {
        ProjectRepo::find_for_owner(&state.pool, project_id, auth.user_id).await?
    };
    if visible.is_none() {
        return Err(CoreError::NotFoundOrForbidden { entity: "Project" }.into());
    }

    let milestone_name = MilestoneName::parse(name)?;
    MilestoneRepo::ensure_for_project(&state.pool, project_id).await?;
    let milestone =
        MilestoneRepo::find_by_project_and_name(&state.pool, project_id, milestone_name.as_str())
            .await?
            .ok_or(CoreError::NotFoundOrForbidden { entity: "Milestone" })?;
    Ok((milestone_name, milestone))
}

/// Parsed statuses for gating checks.
async fn parsed_statuses(
    state: &AppState,
    project_id: DbId,
) -> AppResult<Vec<(MilestoneName, String)>> {
    let rows = MilestoneRepo::statuses_for_project(&state.pool, project_id).await?;
    let mut parsed = Vec::with_capacity(rows.len());
    for (name, status) in rows {
        parsed.push((MilestoneName::parse(&name)?, status));
    }
    Ok(parsed)
}

/// GET /api/v1/projects/{id}/milestones
///
/// Materializes the fixed set on first access and returns each milestone
/// with its computed `is_open` flag and version history.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<MilestoneOverview>>> {
    let visible = if auth.is_admin() {
        ProjectRepo::find_by_id(&state.pool, project_id).await?
    } else {
        ProjectRepo::find_for_owner(&state.pool, project_id, auth.user_id).await?
    };
    if visible.is_none() {
        return Err(CoreError::NotFoundOrForbidden { entity: "Project" }.into());
    }

    let milestones = MilestoneRepo::ensure_for_project(&state.pool, project_id).await?;
    let statuses = parsed_statuses(&state, project_id).await?;
    let status_refs: Vec<(MilestoneName, &str)> = statuses
        .iter()
        .map(|(n, s)| (*n, s.as_str()))
        .collect();

    let mut overview = Vec::with_capacity(milestones.len());
    for milestone in milestones {
        let name = MilestoneName::parse(&milestone.name)?;
        let versions = MilestoneVersionRepo::list_for_milestone(&state.pool, milestone.id).await?;
        overview.push(MilestoneOverview {
            is_open: is_milestone_open(name, &status_refs),
            milestone,
            versions,
        });
    }
    Ok(Json(overview))
}

/// POST /api/v1/projects/{id}/milestones/{name}/versions
///
/// Append a document version (multipart, field `file`). Students may only
/// upload to open milestones of their own projects; admins may attach a
/// corrected document to any milestone, which notifies the owner instead
/// of the admin audience.
pub async fn upload_version(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((project_id, name)): Path<(DbId, String)>,
    multipart: Multipart,
) -> AppResult<Json<MilestoneVersion>> {
    let (milestone_name, milestone) = load_milestone(&state, &auth, project_id, &name).await?;

    if !auth.is_admin() {
        let statuses = parsed_statuses(&state, project_id).await?;
        let status_refs: Vec<(MilestoneName, &str)> =
            statuses.iter().map(|(n, s)| (*n, s.as_str())).collect();
        if !is_milestone_open(milestone_name, &status_refs) {
            // parse() guarantees a predecessor exists for any closed milestone.
            let requires = milestone_name
                .predecessor()
                .ok_or_else(|| AppError::InternalError("first milestone cannot be closed".into()))?;
            return Err(CoreError::MilestoneLocked {
                milestone: milestone_name,
                requires,
            }
            .into());
        }
    }

    let (filename, bytes) = read_single_file(multipart).await?;
    sigep_core::document::validate_document(&filename, bytes.len() as u64)?;
    let stored = state.storage.store(&filename, &bytes).await?;

    let origin = if auth.is_admin() { ROLE_ADMIN } else { ROLE_STUDENT };
    let version = match MilestoneVersionRepo::create(
        &state.pool,
        &CreateMilestoneVersion {
            milestone_id: milestone.id,
            file_path: stored.clone(),
            origin: origin.to_string(),
            uploaded_by: Some(auth.user_id),
        },
    )
    .await
    {
        Ok(version) => version,
        Err(e) => {
            // No version row, no stored file: remove the orphan before
            // surfacing the failure.
            if let Err(re) = state.storage.remove(&stored).await {
                tracing::warn!(path = %stored, error = %re, "failed to remove orphaned upload");
            }
            return Err(e.into());
        }
    };

    if auth.is_admin() {
        let project = ProjectRepo::find_by_id(&state.pool, project_id)
            .await?
            .ok_or(CoreError::NotFound { entity: "Project", id: project_id })?;
        notify_user(
            &state.pool,
            project.owner_id,
            Some(project_id),
            &milestone_update_preview(milestone_name, None, false, true),
        )
        .await?;
    } else {
        notify_admins(
            &state.pool,
            Some(project_id),
            &new_version_preview(milestone_name, project_id),
        )
        .await?;
    }

    tracing::info!(
        milestone_id = milestone.id,
        version = version.version_number,
        origin,
        "milestone version uploaded"
    );
    Ok(Json(version))
}

/// PUT /api/v1/projects/{id}/milestones/{name}
///
/// Admin review update: status and/or feedback. The owner receives one
/// consolidated notification listing exactly what changed.
pub async fn review(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path((project_id, name)): Path<(DbId, String)>,
    Json(req): Json<MilestoneReviewRequest>,
) -> AppResult<Json<Milestone>> {
    let (milestone_name, milestone) = load_milestone(&state, &admin, project_id, &name).await?;

    if let Some(ref status) = req.review_status {
        validate_milestone_status(status)?;
    }
    if req.review_status.is_none() && req.feedback.is_none() {
        return Err(AppError::BadRequest("Nothing to update".into()));
    }

    let status_changed = req
        .review_status
        .as_deref()
        .is_some_and(|s| s != milestone.review_status);
    let feedback_changed = req
        .feedback
        .as_deref()
        .is_some_and(|f| Some(f) != milestone.feedback.as_deref());

    let updated = MilestoneRepo::update_review(
        &state.pool,
        milestone.id,
        req.review_status.as_deref(),
        req.feedback.as_deref(),
    )
    .await?
    .ok_or(CoreError::NotFound { entity: "Milestone", id: milestone.id })?;

    if status_changed || feedback_changed {
        let project = ProjectRepo::find_by_id(&state.pool, project_id)
            .await?
            .ok_or(CoreError::NotFound { entity: "Project", id: project_id })?;
        notify_user(
            &state.pool,
            project.owner_id,
            Some(project_id),
            &milestone_update_preview(
                milestone_name,
                status_changed.then_some(updated.review_status.as_str()),
                feedback_changed,
                false,
            ),
        )
        .await?;
    }

    if updated.review_status == MILESTONE_CORRECTED {
        tracing::info!(
            milestone = %milestone_name,
            project_id,
            "milestone corrected; successor now open"
        );
    }
    Ok(Json(updated))
}
