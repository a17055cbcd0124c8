//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod catalog_repo;
pub mod milestone_repo;
pub mod milestone_version_repo;
pub mod notification_repo;
pub mod profile_repo;
pub mod project_repo;
pub mod user_repo;

pub use catalog_repo::CatalogRepo;
pub use milestone_repo::MilestoneRepo;
pub use milestone_version_repo::MilestoneVersionRepo;
pub use notification_repo::NotificationRepo;
pub use profile_repo::ProfileRepo;
pub use project_repo::ProjectRepo;
pub use user_repo::UserRepo;
