//! Department model and organization-department link.
//!
//! # Invariants
//! - `name`, `label` and `icon` are non-empty for every persisted department.
//! - Placeholder attributes are a pure function of the department id.

use super::organization::OrganizationId;
use super::{normalize_entity_id, require_text, ModelValidationError};
use serde::{Deserialize, Serialize};

/// Stable, caller-supplied department identifier.
pub type DepartmentId = String;

/// Service department offered by salons (hair, nails, spa, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    pub label: String,
    pub icon: String,
}

impl Department {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        label: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            label: label.into(),
            icon: icon.into(),
        }
    }

    /// Builds the default record inserted when a link references an unknown id.
    pub fn placeholder(id: &str) -> Self {
        Self::new(
            id,
            format!("Department {id}"),
            format!("Label for {id}"),
            format!("icon-{id}"),
        )
    }

    /// Checks identifier format and required fields before persistence.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        normalize_entity_id("department", &self.id)?;
        require_text("department", "name", &self.name)?;
        require_text("department", "label", &self.label)?;
        require_text("department", "icon", &self.icon)
    }
}

/// Membership link between one organization and one department.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationDepartment {
    pub organization_id: OrganizationId,
    pub department_id: DepartmentId,
}

#[cfg(test)]
mod tests {
    use super::Department;

    #[test]
    fn placeholder_attributes_derive_from_id() {
        let department = Department::placeholder("d1");
        assert_eq!(department.id, "d1");
        assert_eq!(department.name, "Department d1");
        assert_eq!(department.label, "Label for d1");
        assert_eq!(department.icon, "icon-d1");
        assert!(department.validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_label() {
        let department = Department::new("d1", "Hair", " ", "icon-hair");
        assert!(department.validate().is_err());
    }
}
