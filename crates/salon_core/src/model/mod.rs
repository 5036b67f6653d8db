//! Domain model for salon organizations and their service departments.
//!
//! # Responsibility
//! - Define the records persisted by core (organizations, departments, links).
//! - Own identifier validation shared by every write path.
//!
//! # Invariants
//! - Identifiers are caller-supplied opaque strings; core never mints or
//!   rewrites them.
//! - Every identifier accepted by core is non-empty, has no surrounding
//!   whitespace and is at most `ENTITY_ID_MAX_CHARS` characters.

pub mod department;
pub mod organization;

use std::error::Error;
use std::fmt::{Display, Formatter};

pub const ENTITY_ID_MAX_CHARS: usize = 256;

/// Validation failure for model fields and identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// Identifier is empty or whitespace only.
    EmptyId { entity: &'static str },
    /// Identifier has surrounding whitespace or exceeds the length cap.
    MalformedId { entity: &'static str, value: String },
    /// Required descriptive field is blank.
    EmptyField {
        entity: &'static str,
        field: &'static str,
    },
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId { entity } => write!(f, "{entity} id cannot be empty"),
            Self::MalformedId { entity, value } => write!(
                f,
                "{entity} id `{value}` must have no surrounding whitespace and at most {ENTITY_ID_MAX_CHARS} characters"
            ),
            Self::EmptyField { entity, field } => write!(f, "{entity} {field} cannot be empty"),
        }
    }
}

impl Error for ModelValidationError {}

/// Validates one caller-supplied identifier and returns it unchanged.
///
/// Ids are opaque: any characters are accepted. `entity` names the record
/// kind in error messages (`organization`, `department`).
pub fn normalize_entity_id(
    entity: &'static str,
    value: &str,
) -> Result<String, ModelValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ModelValidationError::EmptyId { entity });
    }
    if trimmed.len() != value.len() || value.chars().count() > ENTITY_ID_MAX_CHARS {
        return Err(ModelValidationError::MalformedId {
            entity,
            value: value.to_string(),
        });
    }
    Ok(value.to_string())
}

pub(crate) fn require_text(
    entity: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), ModelValidationError> {
    if value.trim().is_empty() {
        return Err(ModelValidationError::EmptyField { entity, field });
    }
    Ok(())
}
