//! Shared fixtures for DAO contract tests.
//!
//! Factories build unsaved entities; `seed_*` helpers create them through a
//! `DatabaseConnector` so every suite exercises the trait-object surface.

#![allow(dead_code)]

use chrono::NaiveDate;
use taskboard_core::{
    Customer, DatabaseConnector, Employee, EmployeeRole, EntityId, Project, Sprint,
    SqliteConnector, Task, TaskConfirmation,
};

pub fn connector() -> SqliteConnector {
    SqliteConnector::open_in_memory().unwrap()
}

/// Builds `NaiveDate` from legacy `(years since 1900, zero-based month, day)`
/// arguments, rolling day 0 back to the last day of the previous month.
pub fn legacy_date(year_offset: i32, month0: u32, day: u32) -> NaiveDate {
    let first = NaiveDate::from_ymd_opt(1900 + year_offset, month0 + 1, 1).unwrap();
    first + chrono::Duration::days(i64::from(day) - 1)
}

pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn customer(name: &str) -> Customer {
    let mut customer = Customer::new(name);
    customer.email = Some(format!("{}@example.com", name.to_lowercase()));
    customer
}

pub fn employee(first_name: &str, role: EmployeeRole) -> Employee {
    Employee::new(first_name, "Tester", role)
}

pub fn project(customer_id: EntityId, manager_id: Option<EntityId>) -> Project {
    let mut project = Project::new("project", customer_id);
    project.manager_id = manager_id;
    project.planned_start_date = Some(day(2017, 2, 1));
    project.planned_end_date = Some(day(2017, 6, 30));
    project
}

pub fn sprint(name: &str, project_id: EntityId) -> Sprint {
    let mut sprint = Sprint::new(name, project_id);
    sprint.planned_start_date = Some(legacy_date(1, 0, 0));
    sprint.planned_end_date = Some(legacy_date(1, 0, 14));
    sprint.finished = true;
    sprint
}

pub fn task(name: &str, sprint_id: EntityId) -> Task {
    let mut task = Task::new(name, sprint_id);
    task.description = Some(format!("{name} description"));
    task.estimate_minutes = Some(90);
    task
}

pub fn seed_customer(db: &dyn DatabaseConnector, name: &str) -> Customer {
    let mut customer = customer(name);
    db.customer_dao().create(&mut customer).unwrap();
    customer
}

pub fn seed_employee(db: &dyn DatabaseConnector, first_name: &str, role: EmployeeRole) -> Employee {
    let mut employee = employee(first_name, role);
    db.employee_dao().create(&mut employee).unwrap();
    employee
}

/// Creates a customer named `customer_name` and one project for it.
pub fn seed_project(db: &dyn DatabaseConnector, customer_name: &str) -> Project {
    let customer = seed_customer(db, customer_name);
    let mut project = project(id_of(customer.id), None);
    db.project_dao().create(&mut project).unwrap();
    project
}

pub fn seed_sprint(db: &dyn DatabaseConnector, name: &str, project_id: EntityId) -> Sprint {
    let mut sprint = sprint(name, project_id);
    db.sprint_dao().create(&mut sprint).unwrap();
    sprint
}

pub fn seed_task(db: &dyn DatabaseConnector, name: &str, sprint_id: EntityId) -> Task {
    let mut task = task(name, sprint_id);
    db.task_dao().create(&mut task).unwrap();
    task
}

pub fn seed_confirmation(
    db: &dyn DatabaseConnector,
    task_id: EntityId,
    employee_id: EntityId,
) -> TaskConfirmation {
    let mut confirmation = TaskConfirmation::new(task_id, employee_id);
    confirmation.requested_on = Some(day(2017, 2, 27));
    db.task_confirmation_dao()
        .create(&mut confirmation)
        .unwrap();
    confirmation
}

pub fn id_of(id: Option<EntityId>) -> EntityId {
    id.expect("entity should have been created")
}

/// Asserts both collections hold the same entities regardless of order.
pub fn assert_same_items<T, K>(expected: &[T], actual: &[T], key: impl Fn(&T) -> K)
where
    T: Clone + PartialEq + std::fmt::Debug,
    K: Ord,
{
    let mut expected = expected.to_vec();
    let mut actual = actual.to_vec();
    expected.sort_by_key(|item| key(item));
    actual.sort_by_key(|item| key(item));
    assert_eq!(expected, actual);
}
