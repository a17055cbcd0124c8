//! Pure domain logic for the project-submission portal.
//!
//! This crate has no I/O: milestone ordering and gating, review-status
//! vocabularies, document validation, lockout arithmetic, notification
//! preview construction, and the shared error taxonomy all live here so
//! the DB and API layers can agree on one set of rules.

pub mod document;
pub mod error;
pub mod lockout;
pub mod milestone;
pub mod notification;
pub mod review;
pub mod roles;
pub mod types;
