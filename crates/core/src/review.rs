//! Project review-status vocabulary and the approval gate.
//!
//! A project can be approved only when every one of its four milestones is
//! CORREGIDO. The count of four is a true invariant enforced by milestone
//! materialization, not a derived total.

use crate::error::CoreError;
use crate::milestone::MILESTONE_CORRECTED;

/// Project is awaiting review.
pub const PROJECT_PENDING: &str = "PENDIENTE";

/// Project is actively being reviewed.
pub const PROJECT_IN_REVIEW: &str = "EN_REVISION";

/// Project was approved.
pub const PROJECT_APPROVED: &str = "APROBADO";

/// Project was rejected.
pub const PROJECT_REJECTED: &str = "RECHAZADO";

/// All valid project review status values.
pub const VALID_PROJECT_STATUSES: &[&str] = &[
    PROJECT_PENDING,
    PROJECT_IN_REVIEW,
    PROJECT_APPROVED,
    PROJECT_REJECTED,
];

/// Number of milestones every project has once materialized.
pub const MILESTONE_COUNT: usize = 4;

/// Validate that a project review status string is one of the accepted values.
pub fn validate_project_status(status: &str) -> Result<(), CoreError> {
    if VALID_PROJECT_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid project status '{status}'. Must be one of: {}",
            VALID_PROJECT_STATUSES.join(", ")
        )))
    }
}

/// Whether every milestone is CORREGIDO.
///
/// Requires exactly [`MILESTONE_COUNT`] statuses: fewer means the set was
/// never materialized and the project is not approvable.
pub fn all_milestones_corrected(statuses: &[&str]) -> bool {
    statuses.len() == MILESTONE_COUNT && statuses.iter().all(|s| *s == MILESTONE_CORRECTED)
}

/// Check the approval gate, reporting progress on failure.
pub fn check_approval_gate(statuses: &[&str]) -> Result<(), CoreError> {
    if all_milestones_corrected(statuses) {
        Ok(())
    } else {
        Err(CoreError::MilestonesIncomplete {
            corrected: statuses.iter().filter(|s| **s == MILESTONE_CORRECTED).count(),
            required: MILESTONE_COUNT,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::milestone::{MILESTONE_NEEDS_CORRECTION, MILESTONE_PENDING};

    #[test]
    fn test_gate_passes_with_four_corrected() {
        let statuses = [MILESTONE_CORRECTED; 4];
        assert!(all_milestones_corrected(&statuses));
        assert!(check_approval_gate(&statuses).is_ok());
    }

    #[test]
    fn test_gate_fails_with_three_of_four() {
        let statuses = [
            MILESTONE_CORRECTED,
            MILESTONE_CORRECTED,
            MILESTONE_CORRECTED,
            MILESTONE_PENDING,
        ];
        let err = check_approval_gate(&statuses).unwrap_err();
        match err {
            CoreError::MilestonesIncomplete { corrected, required } => {
                assert_eq!(corrected, 3);
                assert_eq!(required, 4);
            }
            other => panic!("expected MilestonesIncomplete, got {other:?}"),
        }
    }

    #[test]
    fn test_gate_fails_with_fewer_than_four_milestones() {
        // Even all-corrected, an incomplete set must not pass.
        let statuses = [MILESTONE_CORRECTED; 3];
        assert!(!all_milestones_corrected(&statuses));
    }

    #[test]
    fn test_gate_fails_with_needs_correction() {
        let statuses = [
            MILESTONE_CORRECTED,
            MILESTONE_NEEDS_CORRECTION,
            MILESTONE_CORRECTED,
            MILESTONE_CORRECTED,
        ];
        assert!(check_approval_gate(&statuses).is_err());
    }

    #[test]
    fn test_validate_project_status() {
        for s in VALID_PROJECT_STATUSES {
            assert!(validate_project_status(s).is_ok());
        }
        assert!(validate_project_status("CORREGIDO").is_err());
        assert!(validate_project_status("").is_err());
    }
}
