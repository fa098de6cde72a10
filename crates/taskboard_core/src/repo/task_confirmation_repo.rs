//! Task confirmation repository contract and SQLite implementation.
//!
//! # Invariants
//! - `(task_id, employee_id)` is unique; a duplicate create fails with a
//!   constraint violation.

use crate::model::task_confirmation::{ConfirmationStatus, TaskConfirmation};
use crate::model::{EntityId, ModelValidationError};
use crate::repo::crud::{
    date_value, read_enum, CrudRepository, Entity, RepoResult, SqliteRepository,
};
use rusqlite::types::Value;
use rusqlite::{params, Row};

pub type SqliteTaskConfirmationRepository<'conn> = SqliteRepository<'conn, TaskConfirmation>;

impl Entity for TaskConfirmation {
    const NAME: &'static str = "task_confirmation";
    const TABLE: &'static str = "task_confirmations";
    const COLUMNS: &'static [&'static str] = &["task_id", "employee_id", "status", "requested_on"];

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
            Value::Integer(self.task_id),
            Value::Integer(self.employee_id),
            Value::Text(self.status.as_str().to_string()),
            date_value(self.requested_on),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: Some(row.get("id")?),
            task_id: row.get("task_id")?,
            employee_id: row.get("employee_id")?,
            status: read_enum(row, Self::TABLE, "status", ConfirmationStatus::parse)?,
            requested_on: row.get("requested_on")?,
        })
    }
}

pub trait TaskConfirmationRepository: CrudRepository<TaskConfirmation> {
    fn find_by_task_id(&self, task_id: EntityId) -> RepoResult<Vec<TaskConfirmation>>;
    fn find_by_employee_id(&self, employee_id: EntityId) -> RepoResult<Vec<TaskConfirmation>>;
    fn find_by_task_id_and_employee_id(
        &self,
        task_id: EntityId,
        employee_id: EntityId,
    ) -> RepoResult<Option<TaskConfirmation>>;
}

impl TaskConfirmationRepository for SqliteRepository<'_, TaskConfirmation> {
    fn find_by_task_id(&self, task_id: EntityId) -> RepoResult<Vec<TaskConfirmation>> {
        self.query_many("task_id = ?1", [task_id])
    }

    fn find_by_employee_id(&self, employee_id: EntityId) -> RepoResult<Vec<TaskConfirmation>> {
        self.query_many("employee_id = ?1", [employee_id])
    }

    fn find_by_task_id_and_employee_id(
        &self,
        task_id: EntityId,
        employee_id: EntityId,
    ) -> RepoResult<Option<TaskConfirmation>> {
        self.query_one(
            "task_id = ?1 AND employee_id = ?2",
            params![task_id, employee_id],
        )
    }
}
