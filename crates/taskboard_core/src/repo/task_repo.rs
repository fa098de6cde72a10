//! Task repository contract and SQLite implementation.

use crate::model::task::{Task, TaskStatus};
use crate::model::{EntityId, ModelValidationError};
use crate::repo::crud::{
    read_enum, text_value, CrudRepository, Entity, RepoResult, SqliteRepository,
};
use rusqlite::types::Value;
use rusqlite::Row;

pub type SqliteTaskRepository<'conn> = SqliteRepository<'conn, Task>;

impl Entity for Task {
    const NAME: &'static str = "task";
    const TABLE: &'static str = "tasks";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "sprint_id",
        "description",
        "estimate_minutes",
        "status",
    ];

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
            Value::Text(self.name.clone()),
            Value::Integer(self.sprint_id),
            text_value(self.description.as_deref()),
            self.estimate_minutes.map_or(Value::Null, Value::Integer),
            Value::Text(self.status.as_str().to_string()),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: Some(row.get("id")?),
            name: row.get("name")?,
            sprint_id: row.get("sprint_id")?,
            description: row.get("description")?,
            estimate_minutes: row.get("estimate_minutes")?,
            status: read_enum(row, Self::TABLE, "status", TaskStatus::parse)?,
        })
    }
}

pub trait TaskRepository: CrudRepository<Task> {
    fn find_by_sprint_id(&self, sprint_id: EntityId) -> RepoResult<Vec<Task>>;
    /// Tasks the employee holds a confirmation for.
    fn find_by_employee_id(&self, employee_id: EntityId) -> RepoResult<Vec<Task>>;
}

impl TaskRepository for SqliteRepository<'_, Task> {
    fn find_by_sprint_id(&self, sprint_id: EntityId) -> RepoResult<Vec<Task>> {
        self.query_many("sprint_id = ?1", [sprint_id])
    }

    fn find_by_employee_id(&self, employee_id: EntityId) -> RepoResult<Vec<Task>> {
        self.query_many(
            "id IN (SELECT task_id FROM task_confirmations WHERE employee_id = ?1)",
            [employee_id],
        )
    }
}
