//! Fixed milestone list, ordering, and the submission gating rule.
//!
//! Every project carries exactly four milestones with fixed names. The set
//! is a compile-time constant, not configuration. Gating is a pure function
//! of current statuses and is recomputed on every access, never persisted.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Milestone is awaiting review.
pub const MILESTONE_PENDING: &str = "PENDIENTE";

/// Milestone was reviewed and accepted; unlocks the next milestone.
pub const MILESTONE_CORRECTED: &str = "CORREGIDO";

/// Milestone was reviewed and sent back for corrections.
pub const MILESTONE_NEEDS_CORRECTION: &str = "CON_CORRECCIONES";

/// All valid milestone review status values.
pub const VALID_MILESTONE_STATUSES: &[&str] = &[
    MILESTONE_PENDING,
    MILESTONE_CORRECTED,
    MILESTONE_NEEDS_CORRECTION,
];

/// One of the four fixed project milestones, in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MilestoneName {
    I,
    II,
    III,
    IV,
}

/// The four milestones in their fixed order.
pub const FIXED_MILESTONES: [MilestoneName; 4] = [
    MilestoneName::I,
    MilestoneName::II,
    MilestoneName::III,
    MilestoneName::IV,
];

impl MilestoneName {
    /// Database / display name, e.g. `"MOMENTO I"`.
    ///
    /// Lexicographic order of these strings equals submission order, which
    /// lets the DB layer `ORDER BY name`.
    pub fn as_str(self) -> &'static str {
        match self {
            MilestoneName::I => "MOMENTO I",
            MilestoneName::II => "MOMENTO II",
            MilestoneName::III => "MOMENTO III",
            MilestoneName::IV => "MOMENTO IV",
        }
    }

    /// Parse a stored milestone name.
    pub fn parse(name: &str) -> Result<Self, CoreError> {
        match name {
            "MOMENTO I" => Ok(MilestoneName::I),
            "MOMENTO II" => Ok(MilestoneName::II),
            "MOMENTO III" => Ok(MilestoneName::III),
            "MOMENTO IV" => Ok(MilestoneName::IV),
            other => Err(CoreError::Validation(format!(
                "Unknown milestone name '{other}'"
            ))),
        }
    }

    /// Zero-based position in the fixed order.
    pub fn position(self) -> usize {
        match self {
            MilestoneName::I => 0,
            MilestoneName::II => 1,
            MilestoneName::III => 2,
            MilestoneName::IV => 3,
        }
    }

    /// The milestone that must be CORREGIDO before this one opens.
    /// `None` for MOMENTO I, which is always open.
    pub fn predecessor(self) -> Option<MilestoneName> {
        match self.position() {
            0 => None,
            p => Some(FIXED_MILESTONES[p - 1]),
        }
    }
}

impl fmt::Display for MilestoneName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate that a milestone review status string is one of the accepted values.
pub fn validate_milestone_status(status: &str) -> Result<(), CoreError> {
    if VALID_MILESTONE_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid milestone status '{status}'. Must be one of: {}",
            VALID_MILESTONE_STATUSES.join(", ")
        )))
    }
}

/// Whether `name` is currently open for student submission.
///
/// MOMENTO I is always open; any later milestone is open iff its
/// predecessor's status in `statuses` is [`MILESTONE_CORRECTED`]. A
/// predecessor missing from `statuses` counts as not corrected.
pub fn is_milestone_open(name: MilestoneName, statuses: &[(MilestoneName, &str)]) -> bool {
    match name.predecessor() {
        None => true,
        Some(prev) => statuses
            .iter()
            .any(|(n, s)| *n == prev && *s == MILESTONE_CORRECTED),
    }
}

/// The set of milestones currently open for submission, in fixed order.
pub fn open_milestones(statuses: &[(MilestoneName, &str)]) -> Vec<MilestoneName> {
    FIXED_MILESTONES
        .into_iter()
        .filter(|name| is_milestone_open(*name, statuses))
        .collect()
}

/// Derive the default label for a version number, e.g. `"V3.0"`.
pub fn version_label(version_number: i32) -> String {
    format!("V{version_number}.0")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_with_status(status: &'static str) -> Vec<(MilestoneName, &'static str)> {
        FIXED_MILESTONES.iter().map(|m| (*m, status)).collect()
    }

    #[test]
    fn test_fixed_order_matches_lexicographic_name_order() {
        let mut names: Vec<&str> = FIXED_MILESTONES.iter().map(|m| m.as_str()).collect();
        let ordered = names.clone();
        names.sort_unstable();
        assert_eq!(names, ordered, "ORDER BY name must equal submission order");
    }

    #[test]
    fn test_parse_round_trips() {
        for m in FIXED_MILESTONES {
            assert_eq!(MilestoneName::parse(m.as_str()).unwrap(), m);
        }
        assert!(MilestoneName::parse("MOMENTO V").is_err());
    }

    #[test]
    fn test_first_milestone_always_open() {
        assert!(is_milestone_open(MilestoneName::I, &[]));
        assert!(is_milestone_open(
            MilestoneName::I,
            &all_with_status(MILESTONE_NEEDS_CORRECTION)
        ));
    }

    #[test]
    fn test_milestone_opens_only_when_predecessor_corrected() {
        // MOMENTO III depends solely on MOMENTO II, regardless of I and IV.
        let statuses = [
            (MilestoneName::I, MILESTONE_PENDING),
            (MilestoneName::II, MILESTONE_CORRECTED),
            (MilestoneName::IV, MILESTONE_PENDING),
        ];
        assert!(is_milestone_open(MilestoneName::III, &statuses));

        let statuses = [
            (MilestoneName::I, MILESTONE_CORRECTED),
            (MilestoneName::II, MILESTONE_NEEDS_CORRECTION),
            (MilestoneName::IV, MILESTONE_CORRECTED),
        ];
        assert!(!is_milestone_open(MilestoneName::III, &statuses));
    }

    #[test]
    fn test_missing_predecessor_counts_as_closed() {
        assert!(!is_milestone_open(MilestoneName::II, &[]));
    }

    #[test]
    fn test_open_set_is_prefix_until_first_uncorrected() {
        let statuses = [
            (MilestoneName::I, MILESTONE_CORRECTED),
            (MilestoneName::II, MILESTONE_CORRECTED),
            (MilestoneName::III, MILESTONE_PENDING),
            (MilestoneName::IV, MILESTONE_PENDING),
        ];
        assert_eq!(
            open_milestones(&statuses),
            vec![MilestoneName::I, MilestoneName::II, MilestoneName::III]
        );
    }

    #[test]
    fn test_all_open_when_all_corrected() {
        let statuses = all_with_status(MILESTONE_CORRECTED);
        assert_eq!(open_milestones(&statuses).len(), 4);
    }

    #[test]
    fn test_version_label() {
        assert_eq!(version_label(1), "V1.0");
        assert_eq!(version_label(12), "V12.0");
    }

    #[test]
    fn test_validate_milestone_status() {
        assert!(validate_milestone_status(MILESTONE_CORRECTED).is_ok());
        assert!(validate_milestone_status("APROBADO").is_err());
        assert!(validate_milestone_status("").is_err());
    }
}
