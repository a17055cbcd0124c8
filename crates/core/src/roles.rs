//! Well-known role name constants and the single authorization check.

use crate::error::CoreError;

pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_STUDENT: &str = "ESTUDIANTE";

/// All valid role values.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_STUDENT];

/// Validate that a role string is one of the accepted values.
pub fn validate_role(role: &str) -> Result<(), CoreError> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        )))
    }
}

/// The one authorization capability check used everywhere.
///
/// An actor has administrative capability when their profile role is
/// `ADMIN` or the account is a superuser. Call sites must not re-derive
/// this from individual flags.
pub fn has_admin_capability(role: &str, is_superuser: bool) -> bool {
    is_superuser || role == ROLE_ADMIN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_capability() {
        assert!(has_admin_capability(ROLE_ADMIN, false));
        assert!(has_admin_capability(ROLE_STUDENT, true));
        assert!(!has_admin_capability(ROLE_STUDENT, false));
        assert!(!has_admin_capability("", false));
    }

    #[test]
    fn test_validate_role() {
        assert!(validate_role(ROLE_ADMIN).is_ok());
        assert!(validate_role(ROLE_STUDENT).is_ok());
        assert!(validate_role("DOCENTE").is_err());
    }
}
