//! Organization (salon tenant) model.
//!
//! Organizations own department links but are never created or removed by
//! department synchronization.

use super::{normalize_entity_id, require_text, ModelValidationError};
use serde::{Deserialize, Serialize};

/// Stable, caller-supplied organization identifier.
pub type OrganizationId = String;

/// One salon tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrganizationId,
    pub name: String,
}

impl Organization {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Checks identifier format and required fields before persistence.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        normalize_entity_id("organization", &self.id)?;
        require_text("organization", "name", &self.name)
    }
}
