//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes validate model records before SQL mutations.
//! - Repository APIs return semantic errors (`OrganizationNotFound`,
//!   `UnresolvedDepartments`) in addition to DB transport errors.

pub mod department_repo;
pub mod organization_repo;
mod schema;

use crate::db::DbError;
use crate::model::department::DepartmentId;
use crate::model::organization::OrganizationId;
use crate::model::ModelValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by organization and department persistence.
#[derive(Debug)]
pub enum RepoError {
    /// Record failed model validation before reaching SQL.
    Validation(ModelValidationError),
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Referenced organization does not exist.
    OrganizationNotFound(OrganizationId),
    /// Organization id is already registered.
    DuplicateOrganization(OrganizationId),
    /// Department ids that still do not resolve after placeholder creation.
    UnresolvedDepartments(Vec<DepartmentId>),
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::OrganizationNotFound(id) => write!(f, "organization not found: {id}"),
            Self::DuplicateOrganization(id) => write!(f, "organization already exists: {id}"),
            Self::UnresolvedDepartments(ids) => {
                write!(f, "unresolved departments: {}", ids.join(", "))
            }
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelValidationError> for RepoError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
