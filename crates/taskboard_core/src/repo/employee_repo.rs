//! Employee repository contract and SQLite implementation.

use crate::model::employee::{Employee, EmployeeRole};
use crate::model::{EntityId, ModelValidationError};
use crate::repo::crud::{read_enum, CrudRepository, Entity, RepoResult, SqliteRepository};
use rusqlite::types::Value;
use rusqlite::Row;

pub type SqliteEmployeeRepository<'conn> = SqliteRepository<'conn, Employee>;

impl Entity for Employee {
    const NAME: &'static str = "employee";
    const TABLE: &'static str = "employees";
    const COLUMNS: &'static [&'static str] = &["first_name", "last_name", "role"];

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }

    fn check_invariants(&self) -> Result<(), ModelValidationError> {
        self.validate()
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.first_name.clone()),
            Value::Text(self.last_name.clone()),
            Value::Text(self.role.as_str().to_string()),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: Some(row.get("id")?),
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            role: read_enum(row, Self::TABLE, "role", EmployeeRole::parse)?,
        })
    }
}

pub trait EmployeeRepository: CrudRepository<Employee> {
    /// Employees holding a confirmation on the given task.
    fn find_by_task_id(&self, task_id: EntityId) -> RepoResult<Vec<Employee>>;
    fn find_by_role(&self, role: EmployeeRole) -> RepoResult<Vec<Employee>>;
}

impl EmployeeRepository for SqliteRepository<'_, Employee> {
    fn find_by_task_id(&self, task_id: EntityId) -> RepoResult<Vec<Employee>> {
        self.query_many(
            "id IN (SELECT employee_id FROM task_confirmations WHERE task_id = ?1)",
            [task_id],
        )
    }

    fn find_by_role(&self, role: EmployeeRole) -> RepoResult<Vec<Employee>> {
        self.query_many("role = ?1", [role.as_str()])
    }
}
