//! Department repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist the department catalog shared by all organizations.
//! - Own organization-department link replacement with reconcile-then-link
//!   semantics.
//!
//! # Invariants
//! - `replace_organization_departments` runs in one IMMEDIATE transaction:
//!   readers see either the previous link set or the new one, never a gap.
//! - Placeholder creation is insert-or-ignore; existing department
//!   attributes are never overwritten by a link replacement.
//! - Links are only inserted after every referenced department resolves.

use super::schema::{ensure_tables, organization_exists};
use super::{RepoError, RepoResult};
use crate::model::department::{Department, DepartmentId, OrganizationDepartment};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, TransactionBehavior};
use std::collections::BTreeSet;

const DEPARTMENT_SELECT_SQL: &str = "SELECT
    d.id,
    d.name,
    d.label,
    d.icon
FROM departments d";

/// Ids bound per `IN (...)` lookup; stays well under SQLite's variable limit.
const ID_LOOKUP_CHUNK: usize = 500;

/// Result of one link replacement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Links now held by the organization, sorted by department id.
    pub created: Vec<OrganizationDepartment>,
    /// Department ids inserted as placeholders by this call, sorted.
    pub placeholders_created: Vec<DepartmentId>,
}

/// Repository interface for department catalog and link operations.
pub trait DepartmentRepository {
    /// Inserts or fully updates one department record.
    fn upsert_department(&self, department: &Department) -> RepoResult<()>;
    /// Gets one department by id.
    fn get_department(&self, id: &str) -> RepoResult<Option<Department>>;
    /// Lists the full department catalog sorted by id.
    fn list_departments(&self) -> RepoResult<Vec<Department>>;
    /// Lists departments linked to one organization, sorted by id.
    fn list_organization_departments(&self, organization_id: &str) -> RepoResult<Vec<Department>>;
    /// Replaces all links of one organization with `department_ids`,
    /// creating placeholder departments for unknown ids first.
    fn replace_organization_departments(
        &mut self,
        organization_id: &str,
        department_ids: &[DepartmentId],
    ) -> RepoResult<SyncOutcome>;
}

/// SQLite-backed department repository.
pub struct SqliteDepartmentRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteDepartmentRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_tables(
            conn,
            &[
                ("organizations", &["id"]),
                ("departments", &["id", "name", "label", "icon"]),
                ("organization_departments", &["organization_id", "department_id"]),
            ],
        )?;
        Ok(Self { conn })
    }
}

impl DepartmentRepository for SqliteDepartmentRepository<'_> {
    fn upsert_department(&self, department: &Department) -> RepoResult<()> {
        department.validate()?;

        self.conn.execute(
            "INSERT INTO departments (id, name, label, icon)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (id) DO UPDATE SET
                name = excluded.name,
                label = excluded.label,
                icon = excluded.icon,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                department.id.as_str(),
                department.name.as_str(),
                department.label.as_str(),
                department.icon.as_str(),
            ],
        )?;
        Ok(())
    }

    fn get_department(&self, id: &str) -> RepoResult<Option<Department>> {
        let department = self
            .conn
            .query_row(
                &format!("{DEPARTMENT_SELECT_SQL} WHERE d.id = ?1;"),
                [id],
                parse_department_row,
            )
            .optional()?;
        Ok(department)
    }

    fn list_departments(&self) -> RepoResult<Vec<Department>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DEPARTMENT_SELECT_SQL} ORDER BY d.id ASC;"))?;
        let departments = stmt
            .query_map([], parse_department_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(departments)
    }

    fn list_organization_departments(&self, organization_id: &str) -> RepoResult<Vec<Department>> {
        if !organization_exists(self.conn, organization_id)? {
            return Err(RepoError::OrganizationNotFound(organization_id.to_string()));
        }

        let mut stmt = self.conn.prepare(&format!(
            "{DEPARTMENT_SELECT_SQL}
             INNER JOIN organization_departments od ON od.department_id = d.id
             WHERE od.organization_id = ?1
             ORDER BY d.id ASC;"
        ))?;
        let departments = stmt
            .query_map([organization_id], parse_department_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(departments)
    }

    fn replace_organization_departments(
        &mut self,
        organization_id: &str,
        department_ids: &[DepartmentId],
    ) -> RepoResult<SyncOutcome> {
        let requested: BTreeSet<&str> = department_ids.iter().map(String::as_str).collect();

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !organization_exists(&tx, organization_id)? {
            return Err(RepoError::OrganizationNotFound(organization_id.to_string()));
        }

        // Reconcile: make every requested department exist.
        let existing = find_existing_department_ids(&tx, &requested)?;
        let missing: Vec<&str> = requested
            .iter()
            .copied()
            .filter(|id| !existing.contains(*id))
            .collect();
        let placeholders_created = insert_placeholder_departments(&tx, &missing)?;

        let resolved = find_existing_department_ids(&tx, &requested)?;
        let unresolved: Vec<DepartmentId> = requested
            .iter()
            .filter(|id| !resolved.contains(**id))
            .map(|id| id.to_string())
            .collect();
        if !unresolved.is_empty() {
            return Err(RepoError::UnresolvedDepartments(unresolved));
        }

        // Link: replace the organization's set, other organizations untouched.
        tx.execute(
            "DELETE FROM organization_departments WHERE organization_id = ?1;",
            [organization_id],
        )?;
        let created = link_departments(&tx, organization_id, &requested)?;

        tx.commit()?;
        Ok(SyncOutcome {
            created,
            placeholders_created,
        })
    }
}

fn parse_department_row(row: &Row<'_>) -> rusqlite::Result<Department> {
    Ok(Department {
        id: row.get("id")?,
        name: row.get("name")?,
        label: row.get("label")?,
        icon: row.get("icon")?,
    })
}

fn find_existing_department_ids(
    conn: &Connection,
    ids: &BTreeSet<&str>,
) -> RepoResult<BTreeSet<String>> {
    let ids: Vec<&str> = ids.iter().copied().collect();
    let mut found = BTreeSet::new();
    for chunk in ids.chunks(ID_LOOKUP_CHUNK) {
        let placeholders = vec!["?"; chunk.len()].join(", ");
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT id FROM departments WHERE id IN ({placeholders});"
        ))?;
        let rows = stmt.query_map(params_from_iter(chunk.iter()), |row| row.get::<_, String>(0))?;
        for id in rows {
            found.insert(id?);
        }
    }
    Ok(found)
}

fn insert_placeholder_departments(
    conn: &Connection,
    ids: &[&str],
) -> RepoResult<Vec<DepartmentId>> {
    let mut inserted = Vec::new();
    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO departments (id, name, label, icon)
         VALUES (?1, ?2, ?3, ?4);",
    )?;
    for id in ids {
        let placeholder = Department::placeholder(id);
        placeholder.validate()?;
        let changed = stmt.execute(params![
            placeholder.id.as_str(),
            placeholder.name.as_str(),
            placeholder.label.as_str(),
            placeholder.icon.as_str(),
        ])?;
        if changed == 1 {
            inserted.push(placeholder.id);
        }
    }
    Ok(inserted)
}

fn link_departments(
    conn: &Connection,
    organization_id: &str,
    department_ids: &BTreeSet<&str>,
) -> RepoResult<Vec<OrganizationDepartment>> {
    let mut stmt = conn.prepare(
        "INSERT INTO organization_departments (organization_id, department_id)
         VALUES (?1, ?2);",
    )?;
    let mut created = Vec::with_capacity(department_ids.len());
    for department_id in department_ids {
        stmt.execute(params![organization_id, department_id])?;
        created.push(OrganizationDepartment {
            organization_id: organization_id.to_string(),
            department_id: department_id.to_string(),
        });
    }
    Ok(created)
}
