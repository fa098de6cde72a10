mod common;

use common::{
    connector, employee, id_of, seed_confirmation, seed_employee, seed_project, seed_sprint,
    seed_task,
};
use taskboard_core::{DatabaseConnector, EmployeeRole, RepoError};

#[test]
fn create_update_delete_roundtrip() {
    let connector = connector();
    let db: &dyn DatabaseConnector = &connector;
    let mut employee = employee("Ada", EmployeeRole::Developer);

    let id = db.employee_dao().create(&mut employee).unwrap();
    assert_eq!(db.employee_dao().find_by_id(id).unwrap(), Some(employee.clone()));

    employee.role = EmployeeRole::Manager;
    employee.last_name = "Lovelace".to_string();
    db.employee_dao().update(&employee).unwrap();
    let loaded = db.employee_dao().find_by_id(id).unwrap().unwrap();
    assert_eq!(loaded, employee);
    assert_eq!(loaded.full_name(), "Ada Lovelace");

    db.employee_dao().delete(id).unwrap();
    assert!(db.employee_dao().find_by_id(id).unwrap().is_none());
}

#[test]
fn find_by_role_filters_rows() {
    let connector = connector();
    let db: &dyn DatabaseConnector = &connector;
    let dev = seed_employee(db, "Dev", EmployeeRole::Developer);
    seed_employee(db, "Qa", EmployeeRole::Tester);

    let developers = db
        .employee_dao()
        .find_by_role(EmployeeRole::Developer)
        .unwrap();

    assert_eq!(developers, vec![dev]);
    assert!(db
        .employee_dao()
        .find_by_role(EmployeeRole::Manager)
        .unwrap()
        .is_empty());
}

#[test]
fn find_by_task_id_returns_confirming_employees() {
    let connector = connector();
    let db: &dyn DatabaseConnector = &connector;
    let project = seed_project(db, "customer");
    let sprint = seed_sprint(db, "sprint", id_of(project.id));
    let task = seed_task(db, "task", id_of(sprint.id));
    let other_task = seed_task(db, "other", id_of(sprint.id));
    let dev = seed_employee(db, "Dev", EmployeeRole::Developer);
    let qa = seed_employee(db, "Qa", EmployeeRole::Tester);
    seed_confirmation(db, id_of(task.id), id_of(dev.id));
    seed_confirmation(db, id_of(task.id), id_of(qa.id));
    seed_confirmation(db, id_of(other_task.id), id_of(qa.id));

    let employees = db.employee_dao().find_by_task_id(id_of(task.id)).unwrap();

    assert_eq!(employees, vec![dev, qa]);
}

#[test]
fn update_unknown_employee_is_not_found() {
    let connector = connector();
    let db: &dyn DatabaseConnector = &connector;
    let mut ghost = employee("Ghost", EmployeeRole::Tester);
    ghost.id = Some(31);

    let err = db.employee_dao().update(&ghost).unwrap_err();

    assert!(matches!(err, RepoError::NotFound { entity: "employee", id: 31 }));
}
