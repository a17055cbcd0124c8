//! Handlers for the `/projects` resource: registration, content updates,
//! the project document, and the review decision endpoints.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use sigep_core::error::CoreError;
use sigep_core::notification::{
    decision_reverted_preview, new_project_preview, project_approved_preview,
    project_rejected_preview,
};
use sigep_core::review::{
    check_approval_gate, PROJECT_APPROVED, PROJECT_PENDING, PROJECT_REJECTED,
};
use sigep_core::types::DbId;
use validator::Validate;

use sigep_db::models::project::{CreateProject, Project, UpdateProject};
use sigep_db::repositories::{MilestoneRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::notify::{notify_admins, notify_user};
use crate::state::AppState;

/// Request body for registering a new project.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    pub program_id: DbId,
    pub track_id: DbId,
    pub section_id: Option<DbId>,
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: String,
    #[validate(length(min = 1, max = 500))]
    pub authors: String,
    #[validate(length(max = 500))]
    pub keywords: String,
    #[validate(length(max = 300))]
    pub tutor: String,
}

/// Request body for a review decision.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub action: ReviewAction,
    pub grade: Option<i32>,
    pub feedback: Option<String>,
}

/// The three review decisions an administrator can take.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewAction {
    Approve,
    Reject,
    Revert,
}

/// Response for a document upload.
#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub file_path: String,
}

/// Load a project visible to `auth`: any non-trashed project for admins,
/// only the caller's own for students. The student path deliberately does
/// not distinguish "missing" from "not yours".
async fn load_visible(state: &AppState, auth: &AuthUser, id: DbId) -> AppResult<Project> {
    if auth.is_admin() {
        ProjectRepo::find_by_id(&state.pool, id)
            .await?
            .ok_or_else(|| CoreError::NotFound { entity: "Project", id }.into())
    } else {
        ProjectRepo::find_for_owner(&state.pool, id, auth.user_id)
            .await?
            .ok_or_else(|| CoreError::NotFoundOrForbidden { entity: "Project" }.into())
    }
}

/// POST /api/v1/projects
///
/// Registers a project for the calling student, materializes its four
/// milestones, and fans a notice out to administrators.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateProjectRequest>,
) -> AppResult<(StatusCode, Json<Project>)> {
    req.validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;

    let project = ProjectRepo::create(
        &state.pool,
        &CreateProject {
            owner_id: auth.user_id,
            program_id: req.program_id,
            track_id: req.track_id,
            section_id: req.section_id,
            title: req.title,
            description: req.description,
            authors: req.authors,
            keywords: req.keywords,
            tutor: req.tutor,
            created_on: chrono::Utc::now().date_naive(),
            file_path: None,
        },
    )
    .await?;

    MilestoneRepo::ensure_for_project(&state.pool, project.id).await?;
    notify_admins(
        &state.pool,
        Some(project.id),
        &new_project_preview(&project.title, &project.authors),
    )
    .await?;

    tracing::info!(project_id = project.id, owner_id = auth.user_id, "project registered");
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects
///
/// Admins see every non-trashed project; students see their own.
pub async fn list(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<Vec<Project>>> {
    let projects = if auth.is_admin() {
        ProjectRepo::list(&state.pool).await?
    } else {
        ProjectRepo::list_for_owner(&state.pool, auth.user_id).await?
    };
    Ok(Json(projects))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    let project = load_visible(&state, &auth, id).await?;
    Ok(Json(project))
}

/// PUT /api/v1/projects/{id}
///
/// Content edits only; review fields are owned by the review endpoints.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<Project>> {
    load_visible(&state, &auth, id).await?;
    let updated = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound { entity: "Project", id })?;
    Ok(Json(updated))
}

/// POST /api/v1/projects/{id}/document
///
/// Upload or replace the main project document (multipart, field `file`).
/// Validation runs before storage so a rejected upload never leaves a
/// stray file; the previous document is removed best-effort afterwards.
pub async fn upload_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DocumentResponse>> {
    let project = load_visible(&state, &auth, id).await?;

    let (filename, bytes) = read_single_file(multipart).await?;
    sigep_core::document::validate_document(&filename, bytes.len() as u64)?;

    let stored = state.storage.store(&filename, &bytes).await?;
    ProjectRepo::set_file_path(&state.pool, id, &stored).await?;

    if let Some(old) = project.file_path {
        if let Err(e) = state.storage.remove(&old).await {
            tracing::warn!(path = %old, error = %e, "failed to remove replaced document");
        }
    }

    Ok(Json(DocumentResponse { file_path: stored }))
}

/// POST /api/v1/projects/{id}/review
///
/// Admin-only review decision. Approval is gated on all four milestones
/// being CORREGIDO; reject is always available; revert withdraws a
/// standing decision and returns the project to PENDIENTE. Each decision
/// notifies the project owner.
pub async fn review(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(req): Json<ReviewRequest>,
) -> AppResult<Json<Project>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "Project", id })?;

    let project = match req.action {
        ReviewAction::Approve => {
            let statuses = MilestoneRepo::statuses_for_project(&state.pool, id).await?;
            let statuses: Vec<&str> = statuses.iter().map(|(_, s)| s.as_str()).collect();
            check_approval_gate(&statuses)?;

            let updated = ProjectRepo::set_review_status(&state.pool, id, PROJECT_APPROVED, true)
                .await?
                .ok_or(CoreError::NotFound { entity: "Project", id })?;
            notify_user(
                &state.pool,
                updated.owner_id,
                Some(id),
                &project_approved_preview(),
            )
            .await?;
            updated
        }
        ReviewAction::Reject => {
            let updated = ProjectRepo::set_review_status(&state.pool, id, PROJECT_REJECTED, false)
                .await?
                .ok_or(CoreError::NotFound { entity: "Project", id })?;
            notify_user(
                &state.pool,
                updated.owner_id,
                Some(id),
                &project_rejected_preview(),
            )
            .await?;
            updated
        }
        ReviewAction::Revert => {
            // Tolerated from any state; without a standing decision the
            // wording falls back to the generic withdrawal notice.
            let prior = project.review_status.clone();
            let updated = ProjectRepo::set_review_status(&state.pool, id, PROJECT_PENDING, false)
                .await?
                .ok_or(CoreError::NotFound { entity: "Project", id })?;
            notify_user(
                &state.pool,
                updated.owner_id,
                Some(id),
                &decision_reverted_preview(&prior),
            )
            .await?;
            updated
        }
    };

    let project = if req.grade.is_some() || req.feedback.is_some() {
        ProjectRepo::set_review_notes(&state.pool, id, req.grade, req.feedback.as_deref())
            .await?
            .ok_or(CoreError::NotFound { entity: "Project", id })?
    } else {
        project
    };

    tracing::info!(project_id = id, action = ?req.action, "review decision applied");
    Ok(Json(project))
}

/// Read the single expected file field from a multipart body.
pub(crate) async fn read_single_file(
    mut multipart: Multipart,
) -> AppResult<(String, axum::body::Bytes)> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
        .ok_or_else(|| AppError::BadRequest("Missing file field".into()))?;

    let filename = field
        .file_name()
        .map(str::to_string)
        .ok_or_else(|| AppError::BadRequest("Missing filename".into()))?;

    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;

    Ok((filename, bytes))
}
