//! Core domain logic for the salon back end.
//! This crate is the single source of truth for organization/department
//! invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::department::{Department, DepartmentId, OrganizationDepartment};
pub use model::organization::{Organization, OrganizationId};
pub use model::{normalize_entity_id, ModelValidationError};
pub use repo::department_repo::{DepartmentRepository, SqliteDepartmentRepository, SyncOutcome};
pub use repo::organization_repo::{OrganizationRepository, SqliteOrganizationRepository};
pub use repo::{RepoError, RepoResult};
pub use service::department_sync_service::{
    normalize_sync_request, DepartmentSyncService, SyncServiceError,
};
pub use service::organization_service::OrganizationService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
