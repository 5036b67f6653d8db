//! Organization repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Organization ids are unique; re-registering an id is a semantic error,
//!   never a silent overwrite.

use super::schema::ensure_tables;
use super::{RepoError, RepoResult};
use crate::db::DbError;
use crate::model::organization::{Organization, OrganizationId};
use rusqlite::{params, Connection, OptionalExtension};

/// Repository interface for organization registration and lookup.
pub trait OrganizationRepository {
    /// Inserts one organization and returns its id.
    fn create_organization(&self, organization: &Organization) -> RepoResult<OrganizationId>;
    /// Gets one organization by id.
    fn get_organization(&self, id: &str) -> RepoResult<Option<Organization>>;
}

/// SQLite-backed organization repository.
pub struct SqliteOrganizationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteOrganizationRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &[("organizations", &["id", "name"])])?;
        Ok(Self { conn })
    }
}

impl OrganizationRepository for SqliteOrganizationRepository<'_> {
    fn create_organization(&self, organization: &Organization) -> RepoResult<OrganizationId> {
        organization.validate()?;

        let inserted = self.conn.execute(
            "INSERT INTO organizations (id, name) VALUES (?1, ?2);",
            params![organization.id.as_str(), organization.name.trim()],
        );
        match inserted {
            Ok(_) => Ok(organization.id.clone()),
            Err(err) => {
                let err = DbError::from(err);
                if err.is_constraint_violation() {
                    Err(RepoError::DuplicateOrganization(organization.id.clone()))
                } else {
                    Err(err.into())
                }
            }
        }
    }

    fn get_organization(&self, id: &str) -> RepoResult<Option<Organization>> {
        let organization = self
            .conn
            .query_row(
                "SELECT id, name FROM organizations WHERE id = ?1;",
                [id],
                |row| {
                    Ok(Organization {
                        id: row.get("id")?,
                        name: row.get("name")?,
                    })
                },
            )
            .optional()?;
        Ok(organization)
    }
}
