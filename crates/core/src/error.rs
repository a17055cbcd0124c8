use crate::milestone::MilestoneName;
use crate::types::DbId;

/// Domain error taxonomy shared by the DB and API layers.
///
/// Validation-class variants are recoverable and carry an actionable,
/// user-presentable message; they never leave partial state behind.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Submission gate unmet: the named predecessor milestone must reach
    /// CORREGIDO before `milestone` accepts uploads.
    #[error("{requires} must be marked CORREGIDO before uploading to {milestone}")]
    MilestoneLocked {
        milestone: MilestoneName,
        requires: MilestoneName,
    },

    /// Uploaded file failed type or size validation. The message names the
    /// offending reason (bad extension, MiB over the limit).
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Project approval attempted before every milestone is CORREGIDO.
    #[error("Cannot approve: {corrected} of {required} milestones are CORREGIDO")]
    MilestonesIncomplete { corrected: usize, required: usize },

    /// Cross-ownership access. Deliberately does not distinguish "missing"
    /// from "not yours" so ids cannot be probed.
    #[error("{entity} not found")]
    NotFoundOrForbidden { entity: &'static str },

    /// Hard delete requested on an entity that is not in the trash.
    #[error("{entity} with id {id} is not in the trash")]
    NotInTrash { entity: &'static str, id: DbId },

    /// Trash/delete action aimed at a protected target (self, superuser).
    #[error("Forbidden target: {0}")]
    ForbiddenTarget(String),

    /// Hard-delete confirmation password did not verify.
    #[error("Confirmation password is incorrect")]
    InvalidConfirmation,

    #[error("Username '{0}' is already registered")]
    DuplicateUsername(String),

    #[error("Email '{0}' is already registered")]
    DuplicateEmail(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
