//! Organization registration use-cases.

use crate::model::normalize_entity_id;
use crate::model::organization::Organization;
use crate::repo::organization_repo::OrganizationRepository;
use crate::repo::{RepoError, RepoResult};
use log::info;

/// Organization service facade over repository implementations.
pub struct OrganizationService<R: OrganizationRepository> {
    repo: R,
}

impl<R: OrganizationRepository> OrganizationService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers one organization with a caller-supplied id.
    ///
    /// # Errors
    /// - `RepoError::Validation` when id or name is blank or malformed.
    /// - `RepoError::DuplicateOrganization` when the id is already taken.
    pub fn register_organization(&self, id: &str, name: &str) -> RepoResult<Organization> {
        let organization = Organization::new(normalize_entity_id("organization", id)?, name.trim());
        self.repo.create_organization(&organization)?;
        info!("event=organization_register module=service status=ok");
        Ok(organization)
    }

    /// Gets one organization, mapping absence to `OrganizationNotFound`.
    pub fn get_organization(&self, id: &str) -> RepoResult<Organization> {
        let id = normalize_entity_id("organization", id)?;
        self.repo
            .get_organization(&id)?
            .ok_or(RepoError::OrganizationNotFound(id))
    }
}
