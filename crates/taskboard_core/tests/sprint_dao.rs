mod common;

use common::{
    assert_same_items, connector, id_of, legacy_date, seed_customer, seed_project, seed_sprint,
    seed_task, sprint,
};
use taskboard_core::{
    DatabaseConnector, ModelValidationError, RepoError, SqliteSprintRepository,
};

#[test]
fn create() {
    let connector = connector();
    let db: &dyn DatabaseConnector = &connector;
    let project = seed_project(db, "customer");
    let mut sprint = sprint("sprint", id_of(project.id));

    let id = db.sprint_dao().create(&mut sprint).unwrap();

    assert_eq!(sprint.id, Some(id));
    let db_sprint = db.sprint_dao().find_by_id(id).unwrap().unwrap();
    assert_eq!(db_sprint, sprint);
}

#[test]
fn create_keeps_legacy_planned_start_date_exactly() {
    let connector = connector();
    let db: &dyn DatabaseConnector = &connector;
    let project = seed_project(db, "customer1");
    let sprint = seed_sprint(db, "sprint1", id_of(project.id));

    let db_sprint = db.sprint_dao().find_by_id(id_of(sprint.id)).unwrap().unwrap();

    assert_eq!(
        db_sprint.planned_start_date,
        Some(legacy_date(1, 0, 0)),
    );
    assert_eq!(
        db_sprint.planned_start_date.unwrap().to_string(),
        "1900-12-31"
    );
}

#[test]
fn create_fails_for_missing_project() {
    let connector = connector();
    let db: &dyn DatabaseConnector = &connector;
    let mut orphan = sprint("orphan", 404);

    let err = db.sprint_dao().create(&mut orphan).unwrap_err();

    assert!(err.is_constraint_violation(), "unexpected error: {err}");
    assert!(orphan.id.is_none());
    assert_eq!(db.sprint_dao().count().unwrap(), 0);
}

#[test]
fn create_rejects_already_persisted_sprint() {
    let connector = connector();
    let db: &dyn DatabaseConnector = &connector;
    let project = seed_project(db, "customer");
    let mut sprint = seed_sprint(db, "sprint", id_of(project.id));

    let err = db.sprint_dao().create(&mut sprint).unwrap_err();

    assert!(matches!(err, RepoError::AlreadyPersisted { entity: "sprint", .. }));
}

#[test]
fn delete() {
    let connector = connector();
    let db: &dyn DatabaseConnector = &connector;
    let project = seed_project(db, "customer");
    let sprint = seed_sprint(db, "sprint", id_of(project.id));
    let id = id_of(sprint.id);
    assert!(db.sprint_dao().find_by_id(id).unwrap().is_some());

    db.sprint_dao().delete(id).unwrap();

    assert!(db.sprint_dao().find_by_id(id).unwrap().is_none());
}

#[test]
fn delete_missing_sprint_is_a_no_op() {
    let connector = connector();
    let db: &dyn DatabaseConnector = &connector;

    db.sprint_dao().delete(12345).unwrap();
    db.sprint_dao().delete(12345).unwrap();
}

#[test]
fn delete_clears_links_and_removes_owned_tasks() {
    let connector = connector();
    let db: &dyn DatabaseConnector = &connector;
    let project = seed_project(db, "customer");
    let sprint1 = seed_sprint(db, "sprint1", id_of(project.id));
    let mut sprint2 = sprint("sprint2", id_of(project.id));
    sprint2.previous_sprint_id = sprint1.id;
    db.sprint_dao().create(&mut sprint2).unwrap();
    let task = seed_task(db, "task", id_of(sprint1.id));

    db.sprint_dao().delete(id_of(sprint1.id)).unwrap();

    let db_sprint2 = db.sprint_dao().find_by_id(id_of(sprint2.id)).unwrap().unwrap();
    assert_eq!(db_sprint2.previous_sprint_id, None);
    assert!(db.task_dao().find_by_id(id_of(task.id)).unwrap().is_none());
}

#[test]
fn find_all() {
    let connector = connector();
    let db: &dyn DatabaseConnector = &connector;
    let project1 = seed_project(db, "customer1");
    let project2 = seed_project(db, "customer2");
    let sprint1 = seed_sprint(db, "sprint1", id_of(project1.id));
    let sprint2 = seed_sprint(db, "sprint2", id_of(project1.id));
    let sprint3 = seed_sprint(db, "sprint3", id_of(project2.id));

    let actual = db.sprint_dao().find_all().unwrap();

    assert_same_items(&[sprint3, sprint1, sprint2], &actual, |sprint| sprint.id);
}

#[test]
fn find_all_on_empty_store_is_empty() {
    let connector = connector();
    let db: &dyn DatabaseConnector = &connector;
    assert!(db.sprint_dao().find_all().unwrap().is_empty());
}

#[test]
fn update() {
    let connector = connector();
    let db: &dyn DatabaseConnector = &connector;
    let project = seed_project(db, "customer");
    let mut sprint = seed_sprint(db, "sprint", id_of(project.id));

    sprint.finished = false;
    sprint.name = "updatedName".to_string();
    sprint.start_date = Some(legacy_date(1, 0, 0));
    sprint.end_date = Some(legacy_date(1, 1, 1));
    sprint.planned_start_date = Some(legacy_date(1, 1, 2));
    sprint.planned_end_date = Some(legacy_date(1, 2, 1));
    db.sprint_dao().update(&sprint).unwrap();

    let db_sprint = db.sprint_dao().find_by_id(id_of(sprint.id)).unwrap().unwrap();
    assert_eq!(db_sprint, sprint);
}

#[test]
fn update_can_move_sprint_to_another_project() {
    let connector = connector();
    let db: &dyn DatabaseConnector = &connector;
    let project1 = seed_project(db, "customer1");
    let project2 = seed_project(db, "customer2");
    let mut sprint = seed_sprint(db, "sprint", id_of(project1.id));

    sprint.project_id = id_of(project2.id);
    db.sprint_dao().update(&sprint).unwrap();

    assert!(db
        .sprint_dao()
        .find_by_project_id(id_of(project1.id))
        .unwrap()
        .is_empty());
    assert_eq!(
        db.sprint_dao()
            .find_by_project_id(id_of(project2.id))
            .unwrap(),
        vec![sprint]
    );
}

#[test]
fn update_missing_sprint_returns_not_found() {
    let connector = connector();
    let db: &dyn DatabaseConnector = &connector;
    let project = seed_project(db, "customer");
    let mut ghost = sprint("ghost", id_of(project.id));

    let err = db.sprint_dao().update(&ghost).unwrap_err();
    assert!(matches!(err, RepoError::Unsaved { entity: "sprint" }));

    ghost.id = Some(999);
    let err = db.sprint_dao().update(&ghost).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "sprint", id: 999 }));
}

#[test]
fn update_rejects_invalid_ranges_without_touching_row() {
    let connector = connector();
    let db: &dyn DatabaseConnector = &connector;
    let project = seed_project(db, "customer");
    let sprint = seed_sprint(db, "sprint", id_of(project.id));

    let mut invalid = sprint.clone();
    invalid.planned_end_date = Some(legacy_date(0, 0, 1));
    let err = db.sprint_dao().update(&invalid).unwrap_err();

    assert!(matches!(
        err,
        RepoError::Validation(ModelValidationError::InvalidDateRange { .. })
    ));
    let db_sprint = db.sprint_dao().find_by_id(id_of(sprint.id)).unwrap().unwrap();
    assert_eq!(db_sprint, sprint);
}

#[test]
fn update_to_missing_project_fails_without_touching_row() {
    let connector = connector();
    let db: &dyn DatabaseConnector = &connector;
    let project = seed_project(db, "customer");
    let sprint = seed_sprint(db, "sprint", id_of(project.id));

    let mut orphaned = sprint.clone();
    orphaned.project_id = 4242;
    let err = db.sprint_dao().update(&orphaned).unwrap_err();

    assert!(err.is_constraint_violation(), "unexpected error: {err}");
    let db_sprint = db.sprint_dao().find_by_id(id_of(sprint.id)).unwrap().unwrap();
    assert_eq!(db_sprint, sprint);
}

#[test]
fn find_by_project_id() {
    let connector = connector();
    let db: &dyn DatabaseConnector = &connector;
    let project1 = seed_project(db, "customer1");
    let project2 = seed_project(db, "customer2");
    let sprint1 = seed_sprint(db, "sprint1", id_of(project1.id));
    let sprint2 = seed_sprint(db, "sprint2", id_of(project1.id));
    seed_sprint(db, "sprint3", id_of(project2.id));

    let actual = db
        .sprint_dao()
        .find_by_project_id(id_of(project1.id))
        .unwrap();

    assert_same_items(&[sprint1, sprint2], &actual, |sprint| sprint.id);
}

#[test]
fn find_by_task_id() {
    let connector = connector();
    let db: &dyn DatabaseConnector = &connector;
    let project = seed_project(db, "customer");
    let mut sprint = seed_sprint(db, "sprint", id_of(project.id));
    let task = seed_task(db, "task", id_of(sprint.id));

    sprint.task_ids.insert(id_of(task.id));

    let db_sprint = db
        .sprint_dao()
        .find_by_task_id(id_of(task.id))
        .unwrap()
        .unwrap();
    assert_eq!(db_sprint, sprint);
}

#[test]
fn find_by_task_id_for_missing_task_is_none() {
    let connector = connector();
    let db: &dyn DatabaseConnector = &connector;
    assert!(db.sprint_dao().find_by_task_id(77).unwrap().is_none());
}

#[test]
fn find_by_next_sprint_id() {
    let connector = connector();
    let db: &dyn DatabaseConnector = &connector;
    let project = seed_project(db, "customer");
    let mut sprint1 = seed_sprint(db, "sprint1", id_of(project.id));
    let mut sprint2 = sprint("sprint2", id_of(project.id));
    sprint2.previous_sprint_id = sprint1.id;
    db.sprint_dao().create(&mut sprint2).unwrap();
    sprint1.next_sprint_id = sprint2.id;
    db.sprint_dao()
        .update_next_sprint(id_of(sprint1.id), sprint2.id)
        .unwrap();

    let db_sprint = db
        .sprint_dao()
        .find_by_next_sprint_id(id_of(sprint2.id))
        .unwrap()
        .unwrap();

    assert_eq!(db_sprint, sprint1);
}

#[test]
fn find_by_previous_sprint_id() {
    let connector = connector();
    let db: &dyn DatabaseConnector = &connector;
    let project = seed_project(db, "customer");
    let mut sprint1 = seed_sprint(db, "sprint1", id_of(project.id));
    let mut sprint2 = sprint("sprint2", id_of(project.id));
    sprint2.previous_sprint_id = sprint1.id;
    db.sprint_dao().create(&mut sprint2).unwrap();
    sprint1.next_sprint_id = sprint2.id;
    db.sprint_dao()
        .update_next_sprint(id_of(sprint1.id), sprint2.id)
        .unwrap();

    let db_sprint = db
        .sprint_dao()
        .find_by_previous_sprint_id(id_of(sprint1.id))
        .unwrap()
        .unwrap();

    assert_eq!(db_sprint, sprint2);
}

#[test]
fn update_next_sprint_touches_only_the_link_column() {
    let connector = connector();
    let db: &dyn DatabaseConnector = &connector;
    let project = seed_project(db, "customer");
    let sprint1 = seed_sprint(db, "sprint1", id_of(project.id));
    let sprint2 = seed_sprint(db, "sprint2", id_of(project.id));

    db.sprint_dao()
        .update_next_sprint(id_of(sprint1.id), sprint2.id)
        .unwrap();

    let db_sprint1 = db.sprint_dao().find_by_id(id_of(sprint1.id)).unwrap().unwrap();
    let mut expected = sprint1.clone();
    expected.next_sprint_id = sprint2.id;
    assert_eq!(db_sprint1, expected);

    let db_sprint2 = db.sprint_dao().find_by_id(id_of(sprint2.id)).unwrap().unwrap();
    assert_eq!(db_sprint2.previous_sprint_id, None);

    db.sprint_dao()
        .update_next_sprint(id_of(sprint1.id), None)
        .unwrap();
    assert!(db
        .sprint_dao()
        .find_by_next_sprint_id(id_of(sprint2.id))
        .unwrap()
        .is_none());
}

#[test]
fn update_next_sprint_rejects_missing_rows_and_self_links() {
    let connector = connector();
    let db: &dyn DatabaseConnector = &connector;
    let project = seed_project(db, "customer");
    let sprint = seed_sprint(db, "sprint", id_of(project.id));
    let id = id_of(sprint.id);

    let err = db.sprint_dao().update_next_sprint(500, sprint.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "sprint", id: 500 }));

    let err = db.sprint_dao().update_next_sprint(id, Some(500)).unwrap_err();
    assert!(err.is_constraint_violation(), "unexpected error: {err}");

    let err = db.sprint_dao().update_next_sprint(id, Some(id)).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ModelValidationError::SelfLink { .. })
    ));
}

#[test]
fn update_previous_sprint_mirrors_next_link_update() {
    let connector = connector();
    let db: &dyn DatabaseConnector = &connector;
    let project = seed_project(db, "customer");
    let sprint1 = seed_sprint(db, "sprint1", id_of(project.id));
    let sprint2 = seed_sprint(db, "sprint2", id_of(project.id));

    db.sprint_dao()
        .update_previous_sprint(id_of(sprint2.id), sprint1.id)
        .unwrap();

    let successor = db
        .sprint_dao()
        .find_by_previous_sprint_id(id_of(sprint1.id))
        .unwrap()
        .unwrap();
    assert_eq!(successor.id, sprint2.id);
    assert_eq!(successor.next_sprint_id, None);
}

#[test]
fn concrete_repository_requires_migrated_connection() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();

    match SqliteSprintRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn dao_getters_share_one_connection() {
    let connector = connector();
    let db: &dyn DatabaseConnector = &connector;
    let customer = seed_customer(db, "shared");

    let via_concrete = connector
        .customers()
        .connection()
        .query_row(
            "SELECT name FROM customers WHERE id = ?1;",
            [id_of(customer.id)],
            |row| row.get::<_, String>(0),
        )
        .unwrap();
    assert_eq!(via_concrete, "shared");
}
