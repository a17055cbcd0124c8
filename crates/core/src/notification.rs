//! Notification preview construction and truncation.
//!
//! Previews are short user-facing strings (Spanish, matching the portal's
//! UI language) capped at 250 characters before storage. The builders here
//! are the single source for event wording so every dispatch site produces
//! the same text.

use crate::milestone::MilestoneName;
use crate::review::{PROJECT_APPROVED, PROJECT_REJECTED};
use crate::types::DbId;

/// Maximum stored preview length, in characters.
pub const PREVIEW_MAX_CHARS: usize = 250;

/// Truncate a preview to [`PREVIEW_MAX_CHARS`] characters.
///
/// Operates on characters, not bytes, so multi-byte text is never split
/// mid-codepoint.
pub fn truncate_preview(preview: &str) -> String {
    preview.chars().take(PREVIEW_MAX_CHARS).collect()
}

/// Fan-out to admins when a student registers a new project.
pub fn new_project_preview(title: &str, authors: &str) -> String {
    let preview = format!("Nuevo proyecto: {title} — {authors}");
    truncate_preview(preview.trim_end_matches([' ', '—']))
}

/// Owner notice for a project approval.
pub fn project_approved_preview() -> String {
    "Tu proyecto ha sido APROBADO por el administrador.".to_string()
}

/// Owner notice for a project rejection.
pub fn project_rejected_preview() -> String {
    "Tu proyecto ha sido RECHAZADO por el administrador.".to_string()
}

/// Owner notice when an administrator withdraws a prior decision.
pub fn decision_reverted_preview(prior_status: &str) -> String {
    match prior_status {
        PROJECT_APPROVED => {
            "La aprobación de tu proyecto ha sido removida por el administrador.".to_string()
        }
        PROJECT_REJECTED => {
            "La desaprobación de tu proyecto ha sido removida por el administrador.".to_string()
        }
        _ => "La decisión sobre tu proyecto ha sido removida por el administrador.".to_string(),
    }
}

/// Consolidated owner notice for a milestone review update.
///
/// Lists only the fields that actually changed in this call.
pub fn milestone_update_preview(
    milestone: MilestoneName,
    new_status: Option<&str>,
    feedback_changed: bool,
    version_attached: bool,
) -> String {
    let mut changes: Vec<String> = Vec::new();
    if let Some(status) = new_status {
        changes.push(format!("estado: {status}"));
    }
    if feedback_changed {
        changes.push("nuevo comentario".to_string());
    }
    if version_attached {
        changes.push("nueva versión subida por el admin".to_string());
    }

    let preview = if changes.is_empty() {
        format!("Actualización en {milestone}")
    } else {
        format!("Actualización en {milestone}: {}", changes.join(", "))
    };
    truncate_preview(&preview)
}

/// Fan-out to admins when a student uploads a milestone version.
pub fn new_version_preview(milestone: MilestoneName, project_id: DbId) -> String {
    format!("Nueva versión en {milestone} del Proyecto #{project_id}")
}

/// Fan-out to admins when an account trips the failed-login lockout.
pub fn account_locked_preview(username: &str) -> String {
    truncate_preview(&format!(
        "Usuario \"{username}\" bloqueado por múltiples intentos fallidos."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::milestone::MILESTONE_CORRECTED;

    #[test]
    fn test_truncate_short_string_unchanged() {
        assert_eq!(truncate_preview("hola"), "hola");
    }

    #[test]
    fn test_truncate_caps_at_250_chars() {
        let long = "x".repeat(400);
        assert_eq!(truncate_preview(&long).chars().count(), PREVIEW_MAX_CHARS);
    }

    #[test]
    fn test_truncate_is_char_boundary_safe() {
        // 300 two-byte characters; a byte-based cut would panic or split one.
        let long = "ñ".repeat(300);
        let out = truncate_preview(&long);
        assert_eq!(out.chars().count(), PREVIEW_MAX_CHARS);
        assert!(out.chars().all(|c| c == 'ñ'));
    }

    #[test]
    fn test_new_project_preview() {
        let p = new_project_preview("Sistema de Riego", "Pérez; Gómez");
        assert!(p.starts_with("Nuevo proyecto: Sistema de Riego"));
        assert!(p.contains("Pérez; Gómez"));
    }

    #[test]
    fn test_milestone_update_lists_only_changed_fields() {
        let p = milestone_update_preview(
            MilestoneName::II,
            Some(MILESTONE_CORRECTED),
            true,
            false,
        );
        assert!(p.contains("MOMENTO II"));
        assert!(p.contains("estado: CORREGIDO"));
        assert!(p.contains("nuevo comentario"));
        assert!(!p.contains("nueva versión"));
    }

    #[test]
    fn test_milestone_update_with_no_changes() {
        let p = milestone_update_preview(MilestoneName::IV, None, false, false);
        assert_eq!(p, "Actualización en MOMENTO IV");
    }

    #[test]
    fn test_decision_reverted_wording_depends_on_prior_status() {
        assert!(decision_reverted_preview(PROJECT_APPROVED).contains("aprobación"));
        assert!(decision_reverted_preview(PROJECT_REJECTED).contains("desaprobación"));
        assert!(decision_reverted_preview("PENDIENTE").contains("decisión"));
    }

    #[test]
    fn test_new_version_preview_names_milestone_and_project() {
        let p = new_version_preview(MilestoneName::I, 42);
        assert_eq!(p, "Nueva versión en MOMENTO I del Proyecto #42");
    }

    #[test]
    fn test_account_locked_preview_names_user() {
        assert!(account_locked_preview("12345678").contains("\"12345678\""));
    }
}
