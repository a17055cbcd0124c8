//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to the repositories in `sigep_db`, enforce the domain
//! rules from `sigep_core`, and map errors via [`crate::error::AppError`].

pub mod admin_users;
pub mod auth;
pub mod catalogs;
pub mod milestones;
pub mod notifications;
pub mod projects;
pub mod trash;
