use rusqlite::Connection;
use salon_core::db::open_db_in_memory;
use salon_core::{
    Department, DepartmentSyncService, OrganizationService, SqliteDepartmentRepository,
    SqliteOrganizationRepository, SyncServiceError,
};

fn setup(organizations: &[&str]) -> Connection {
    let conn = open_db_in_memory().unwrap();
    {
        let repo = SqliteOrganizationRepository::try_new(&conn).unwrap();
        let service = OrganizationService::new(repo);
        for id in organizations {
            service
                .register_organization(id, &format!("Salon {id}"))
                .unwrap();
        }
    }
    conn
}

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn linked_ids(conn: &mut Connection, organization_id: &str) -> Vec<String> {
    let repo = SqliteDepartmentRepository::try_new(conn).unwrap();
    let service = DepartmentSyncService::new(repo);
    service
        .list_organization_departments(organization_id)
        .unwrap()
        .into_iter()
        .map(|department| department.id)
        .collect()
}

fn count_rows(conn: &Connection, sql: &str) -> i64 {
    conn.query_row(sql, [], |row| row.get(0)).unwrap()
}

#[test]
fn sync_creates_placeholders_and_links_for_unknown_departments() {
    let mut conn = setup(&["org1"]);
    let repo = SqliteDepartmentRepository::try_new(&mut conn).unwrap();
    let mut service = DepartmentSyncService::new(repo);

    let outcome = service.synchronize("org1", &ids(&["d1", "d2"])).unwrap();
    assert_eq!(outcome.placeholders_created, ids(&["d1", "d2"]));
    assert_eq!(outcome.created.len(), 2);
    assert!(outcome
        .created
        .iter()
        .all(|link| link.organization_id == "org1"));

    let placeholder = service.get_department("d1").unwrap().unwrap();
    assert_eq!(placeholder, Department::placeholder("d1"));

    drop(service);
    assert_eq!(linked_ids(&mut conn, "org1"), ids(&["d1", "d2"]));
}

#[test]
fn resync_replaces_previous_set_and_reuses_existing_departments() {
    let mut conn = setup(&["org1"]);
    {
        let repo = SqliteDepartmentRepository::try_new(&mut conn).unwrap();
        let mut service = DepartmentSyncService::new(repo);
        service.synchronize("org1", &ids(&["d1", "d2"])).unwrap();

        let outcome = service.synchronize("org1", &ids(&["d1", "d3"])).unwrap();
        assert_eq!(outcome.placeholders_created, ids(&["d3"]));
    }

    assert_eq!(linked_ids(&mut conn, "org1"), ids(&["d1", "d3"]));
    // Departments are never deleted by a sync.
    assert_eq!(count_rows(&conn, "SELECT COUNT(*) FROM departments;"), 3);
}

#[test]
fn repeated_identical_sync_is_idempotent() {
    let mut conn = setup(&["org1"]);
    {
        let repo = SqliteDepartmentRepository::try_new(&mut conn).unwrap();
        let mut service = DepartmentSyncService::new(repo);
        let first = service.synchronize("org1", &ids(&["d2", "d1"])).unwrap();
        let second = service.synchronize("org1", &ids(&["d1", "d2"])).unwrap();
        assert_eq!(first.created, second.created);
        assert!(second.placeholders_created.is_empty());
    }

    assert_eq!(linked_ids(&mut conn, "org1"), ids(&["d1", "d2"]));
    assert_eq!(
        count_rows(&conn, "SELECT COUNT(*) FROM organization_departments;"),
        2
    );
}

#[test]
fn duplicate_requested_ids_collapse_to_one_link() {
    let mut conn = setup(&["org1"]);
    {
        let repo = SqliteDepartmentRepository::try_new(&mut conn).unwrap();
        let mut service = DepartmentSyncService::new(repo);
        let outcome = service
            .synchronize("org1", &ids(&["d1", "d1", "d1"]))
            .unwrap();
        assert_eq!(outcome.created.len(), 1);
    }
    assert_eq!(linked_ids(&mut conn, "org1"), ids(&["d1"]));
}

#[test]
fn empty_list_and_missing_owner_are_rejected_without_mutation() {
    let mut conn = setup(&["org1"]);
    {
        let repo = SqliteDepartmentRepository::try_new(&mut conn).unwrap();
        let mut service = DepartmentSyncService::new(repo);
        service.synchronize("org1", &ids(&["d1"])).unwrap();

        let empty = service.synchronize("org1", &[]).unwrap_err();
        assert!(matches!(empty, SyncServiceError::EmptyDepartmentList));

        let no_owner = service.synchronize("", &ids(&["d9"])).unwrap_err();
        assert!(matches!(no_owner, SyncServiceError::Validation(_)));

        let padded = service
            .synchronize("org1", &ids(&["d2", " d1"]))
            .unwrap_err();
        assert!(matches!(padded, SyncServiceError::Validation(_)));
    }

    assert_eq!(linked_ids(&mut conn, "org1"), ids(&["d1"]));
    assert_eq!(count_rows(&conn, "SELECT COUNT(*) FROM departments;"), 1);
}

#[test]
fn unknown_organization_is_rejected_without_creating_departments() {
    let mut conn = setup(&["org1"]);
    let repo = SqliteDepartmentRepository::try_new(&mut conn).unwrap();
    let mut service = DepartmentSyncService::new(repo);

    let err = service.synchronize("ghost", &ids(&["d1"])).unwrap_err();
    assert!(matches!(err, SyncServiceError::OrganizationNotFound(ref id) if id == "ghost"));
    assert!(service.list_departments().unwrap().is_empty());
}

#[test]
fn sync_for_one_owner_leaves_other_owners_untouched() {
    let mut conn = setup(&["org1", "org2"]);
    {
        let repo = SqliteDepartmentRepository::try_new(&mut conn).unwrap();
        let mut service = DepartmentSyncService::new(repo);
        service.synchronize("org2", &ids(&["d1", "d5"])).unwrap();
        service.synchronize("org1", &ids(&["d1", "d2"])).unwrap();
        service.synchronize("org1", &ids(&["d3"])).unwrap();
    }

    assert_eq!(linked_ids(&mut conn, "org1"), ids(&["d3"]));
    assert_eq!(linked_ids(&mut conn, "org2"), ids(&["d1", "d5"]));
}

#[test]
fn sync_never_overwrites_existing_department_attributes() {
    let mut conn = setup(&["org1"]);
    let repo = SqliteDepartmentRepository::try_new(&mut conn).unwrap();
    let mut service = DepartmentSyncService::new(repo);
    let custom = Department::new("hair", "Coiffure", "Hair styling", "scissors");
    service.save_department(custom.clone()).unwrap();

    let outcome = service.synchronize("org1", &ids(&["hair", "nails"])).unwrap();
    assert_eq!(outcome.placeholders_created, ids(&["nails"]));
    assert_eq!(service.get_department("hair").unwrap(), Some(custom));
}

#[test]
fn save_department_updates_attributes_in_place() {
    let mut conn = setup(&["org1"]);
    let repo = SqliteDepartmentRepository::try_new(&mut conn).unwrap();
    let mut service = DepartmentSyncService::new(repo);
    service.synchronize("org1", &ids(&["spa"])).unwrap();

    let edited = service
        .save_department(Department::new("spa", " Spa ", "Wellness", "lotus"))
        .unwrap();
    assert_eq!(edited.id, "spa");
    assert_eq!(edited.name, "Spa");
    assert_eq!(service.list_departments().unwrap(), vec![edited.clone()]);
    assert_eq!(
        service.list_organization_departments("org1").unwrap(),
        vec![edited]
    );

    let invalid = service
        .save_department(Department::new("spa", "Spa", "", "lotus"))
        .unwrap_err();
    assert!(matches!(invalid, SyncServiceError::Validation(_)));
}

#[test]
fn links_never_dangle() {
    let mut conn = setup(&["org1", "org2"]);
    {
        let repo = SqliteDepartmentRepository::try_new(&mut conn).unwrap();
        let mut service = DepartmentSyncService::new(repo);
        service.synchronize("org1", &ids(&["a", "b", "c"])).unwrap();
        service.synchronize("org2", &ids(&["c", "d"])).unwrap();
        service.synchronize("org1", &ids(&["b"])).unwrap();
    }

    let dangling = count_rows(
        &conn,
        "SELECT COUNT(*)
         FROM organization_departments od
         LEFT JOIN departments d ON d.id = od.department_id
         WHERE d.id IS NULL;",
    );
    assert_eq!(dangling, 0);
}

#[test]
fn sync_outcome_links_serialize_with_camel_case_keys() {
    let mut conn = setup(&["org1"]);
    let repo = SqliteDepartmentRepository::try_new(&mut conn).unwrap();
    let mut service = DepartmentSyncService::new(repo);
    let outcome = service.synchronize("org1", &ids(&["d1"])).unwrap();

    let json = serde_json::to_value(&outcome.created).unwrap();
    assert_eq!(
        json,
        serde_json::json!([{ "organizationId": "org1", "departmentId": "d1" }])
    );
}

#[test]
fn opaque_department_ids_are_stored_verbatim() {
    let mut conn = setup(&["org1"]);
    let requested = ids(&["hair.color", "café", "dept:1", "nails & feet"]);
    {
        let repo = SqliteDepartmentRepository::try_new(&mut conn).unwrap();
        let mut service = DepartmentSyncService::new(repo);
        let outcome = service.synchronize("org1", &requested).unwrap();
        assert_eq!(outcome.placeholders_created.len(), 4);
        assert_eq!(
            service.get_department("dept:1").unwrap(),
            Some(Department::placeholder("dept:1"))
        );
    }

    let mut expected = requested;
    expected.sort();
    assert_eq!(linked_ids(&mut conn, "org1"), expected);
}

#[test]
fn large_department_sets_link_in_one_sync() {
    let mut conn = setup(&["org1"]);
    let requested: Vec<String> = (0..1_200).map(|idx| format!("dept-{idx:04}")).collect();
    {
        let repo = SqliteDepartmentRepository::try_new(&mut conn).unwrap();
        let mut service = DepartmentSyncService::new(repo);
        service.synchronize("org1", &requested[..700]).unwrap();

        let outcome = service.synchronize("org1", &requested).unwrap();
        assert_eq!(outcome.created.len(), 1_200);
        assert_eq!(outcome.placeholders_created, requested[700..].to_vec());
    }

    assert_eq!(linked_ids(&mut conn, "org1"), requested);
    assert_eq!(count_rows(&conn, "SELECT COUNT(*) FROM departments;"), 1_200);
}

#[test]
fn failed_link_insert_rolls_back_placeholders_and_keeps_previous_set() {
    let mut conn = setup(&["org1"]);
    {
        let repo = SqliteDepartmentRepository::try_new(&mut conn).unwrap();
        let mut service = DepartmentSyncService::new(repo);
        service.synchronize("org1", &ids(&["d1"])).unwrap();
    }
    conn.execute_batch(
        "CREATE TRIGGER freeze_links BEFORE INSERT ON organization_departments
         BEGIN
             SELECT RAISE(ABORT, 'links are frozen');
         END;",
    )
    .unwrap();

    {
        let repo = SqliteDepartmentRepository::try_new(&mut conn).unwrap();
        let mut service = DepartmentSyncService::new(repo);
        let err = service.synchronize("org1", &ids(&["d1", "d2"])).unwrap_err();
        assert!(matches!(err, SyncServiceError::Repo(_)));
        assert!(!err.is_client_error());
    }

    assert_eq!(linked_ids(&mut conn, "org1"), ids(&["d1"]));
    let leftover = count_rows(&conn, "SELECT COUNT(*) FROM departments WHERE id = 'd2';");
    assert_eq!(leftover, 0);
    assert_eq!(count_rows(&conn, "SELECT COUNT(*) FROM departments;"), 1);
}
