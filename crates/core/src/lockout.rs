//! Failed-login lockout arithmetic and account lock classification.
//!
//! The threshold is fixed at five consecutive failures. An account locked
//! by failures and an account deactivated by an administrator both block
//! login, but they surface different guidance to the user.

use crate::types::Timestamp;

/// Consecutive failed attempts that trigger a lockout.
pub const MAX_FAILED_LOGIN_ATTEMPTS: i32 = 5;

/// Attempts remaining before lockout, never negative.
pub fn attempts_remaining(failed_attempts: i32) -> i32 {
    (MAX_FAILED_LOGIN_ATTEMPTS - failed_attempts).max(0)
}

/// Whether this failure count trips the lockout.
pub fn is_lockout_threshold(failed_attempts: i32) -> bool {
    failed_attempts >= MAX_FAILED_LOGIN_ATTEMPTS
}

/// Why an account is (or is not) blocked from logging in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountLock {
    /// Account is active; login may proceed to credential checks.
    Active,
    /// Deactivated with a lock timestamp: tripped the failed-attempt limit.
    LockedForFailedAttempts,
    /// Deactivated without a lock timestamp: administrative suspension.
    Deactivated,
}

impl AccountLock {
    /// Classify from the persisted account state.
    ///
    /// Invariant: a non-null lock timestamp implies the account is inactive,
    /// so an active account classifies as [`AccountLock::Active`] regardless
    /// of a stale `locked_at`.
    pub fn classify(is_active: bool, locked_at: Option<Timestamp>) -> Self {
        if is_active {
            AccountLock::Active
        } else if locked_at.is_some() {
            AccountLock::LockedForFailedAttempts
        } else {
            AccountLock::Deactivated
        }
    }

    /// User-facing guidance for a blocked login attempt.
    pub fn guidance(self) -> Option<&'static str> {
        match self {
            AccountLock::Active => None,
            AccountLock::LockedForFailedAttempts => Some(
                "Tu cuenta fue bloqueada por múltiples intentos fallidos. \
                 Contacta al administrador para desbloquearla.",
            ),
            AccountLock::Deactivated => Some(
                "Tu usuario está suspendido. Contacta al administrador.",
            ),
        }
    }
}
