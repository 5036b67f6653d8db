//! Organization-department synchronization use-cases.
//!
//! # Responsibility
//! - Validate sync requests before any storage mutation.
//! - Replace an organization's department set through the repository.
//! - Manage the department catalog used by the admin dashboard.
//!
//! # Invariants
//! - Invalid input never reaches the repository.
//! - Requested ids are deduplicated, never rewritten; order is irrelevant.
//! - After a successful sync the organization's links equal the requested set.

use crate::model::department::{Department, DepartmentId};
use crate::model::organization::OrganizationId;
use crate::model::{normalize_entity_id, ModelValidationError};
use crate::repo::department_repo::{DepartmentRepository, SyncOutcome};
use crate::repo::RepoError;
use log::{error, info, warn};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Service error for department use-cases.
#[derive(Debug)]
pub enum SyncServiceError {
    /// Organization id or one department id is blank or malformed.
    Validation(ModelValidationError),
    /// Sync request carried no department ids.
    EmptyDepartmentList,
    /// Target organization does not exist.
    OrganizationNotFound(OrganizationId),
    /// Ids that could not be resolved into departments.
    UnresolvedDepartments(Vec<DepartmentId>),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl SyncServiceError {
    /// Returns whether the caller can fix this error by changing its input.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Repo(_))
    }
}

impl Display for SyncServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::EmptyDepartmentList => write!(f, "no departments provided"),
            Self::OrganizationNotFound(id) => write!(f, "organization not found: {id}"),
            Self::UnresolvedDepartments(ids) => {
                write!(f, "the following departments are invalid: {}", ids.join(", "))
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SyncServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelValidationError> for SyncServiceError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for SyncServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::OrganizationNotFound(id) => Self::OrganizationNotFound(id),
            RepoError::UnresolvedDepartments(ids) => Self::UnresolvedDepartments(ids),
            other => Self::Repo(other),
        }
    }
}

/// Department service facade over repository implementations.
pub struct DepartmentSyncService<R: DepartmentRepository> {
    repo: R,
}

impl<R: DepartmentRepository> DepartmentSyncService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Replaces the full department set of one organization.
    ///
    /// Unknown department ids are created as placeholders (see
    /// `Department::placeholder`) before linking; existing departments keep
    /// their attributes. Ids are stored exactly as given; an id with
    /// surrounding whitespace is rejected rather than trimmed.
    ///
    /// # Errors
    /// - `Validation` / `EmptyDepartmentList` before any mutation.
    /// - `OrganizationNotFound` when the owner is unknown; nothing is written.
    /// - `Repo` when storage fails; the replacement is rolled back.
    pub fn synchronize(
        &mut self,
        organization_id: &str,
        department_ids: &[String],
    ) -> Result<SyncOutcome, SyncServiceError> {
        let started_at = Instant::now();
        let (organization_id, requested) =
            match normalize_sync_request(organization_id, department_ids) {
                Ok(normalized) => normalized,
                Err(err) => {
                    warn!("event=department_sync module=service status=rejected reason={err}");
                    return Err(err);
                }
            };

        match self
            .repo
            .replace_organization_departments(&organization_id, &requested)
        {
            Ok(outcome) => {
                info!(
                    "event=department_sync module=service status=ok linked={} placeholders={} duration_ms={}",
                    outcome.created.len(),
                    outcome.placeholders_created.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(outcome)
            }
            Err(err) => {
                let err = SyncServiceError::from(err);
                if err.is_client_error() {
                    warn!("event=department_sync module=service status=rejected reason={err}");
                } else {
                    error!(
                        "event=department_sync module=service status=error duration_ms={} error={err}",
                        started_at.elapsed().as_millis()
                    );
                }
                Err(err)
            }
        }
    }

    /// Lists the departments currently linked to one organization.
    pub fn list_organization_departments(
        &self,
        organization_id: &str,
    ) -> Result<Vec<Department>, SyncServiceError> {
        let organization_id = normalize_entity_id("organization", organization_id)?;
        Ok(self.repo.list_organization_departments(&organization_id)?)
    }

    /// Lists the full department catalog.
    pub fn list_departments(&self) -> Result<Vec<Department>, SyncServiceError> {
        Ok(self.repo.list_departments()?)
    }

    /// Gets one department by id.
    pub fn get_department(&self, id: &str) -> Result<Option<Department>, SyncServiceError> {
        let id = normalize_entity_id("department", id)?;
        Ok(self.repo.get_department(&id)?)
    }

    /// Creates or edits one department with explicit attributes.
    pub fn save_department(&self, department: Department) -> Result<Department, SyncServiceError> {
        let department = Department {
            id: normalize_entity_id("department", &department.id)?,
            name: department.name.trim().to_string(),
            label: department.label.trim().to_string(),
            icon: department.icon.trim().to_string(),
        };
        self.repo.upsert_department(&department)?;
        Ok(department)
    }
}

/// Validates and normalizes one sync request.
///
/// Returns the organization id and the sorted, deduplicated department ids,
/// both exactly as supplied.
pub fn normalize_sync_request(
    organization_id: &str,
    department_ids: &[String],
) -> Result<(OrganizationId, Vec<DepartmentId>), SyncServiceError> {
    let organization_id = normalize_entity_id("organization", organization_id)?;
    if department_ids.is_empty() {
        return Err(SyncServiceError::EmptyDepartmentList);
    }

    let mut unique = BTreeSet::new();
    for id in department_ids {
        unique.insert(normalize_entity_id("department", id)?);
    }

    Ok((organization_id, unique.into_iter().collect()))
}
