//! Sprint repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Map `Sprint` to the `sprints` table.
//! - Answer the sprint relationship queries: by project, by owned task and
//!   by either end of a chain link.
//!
//! # Invariants
//! - `task_ids` is loaded from `tasks.sprint_id` on every read.
//! - `update_next_sprint`/`update_previous_sprint` touch exactly one column.

use crate::model::sprint::Sprint;
use crate::model::{EntityId, ModelValidationError};
use crate::repo::crud::{
    date_value, flag_value, id_value, read_flag, CrudRepository, Entity, RepoError, RepoResult,
    SqliteRepository,
};
use rusqlite::types::Value;
use rusqlite::{Connection, Row};
use std::collections::BTreeSet;

pub type SqliteSprintRepository<'conn> = SqliteRepository<'conn, Sprint>;

impl Entity for Sprint {
    const NAME: &'static str = "sprint";
    const TABLE: &'static str = "sprints";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "project_id",
        "start_date",
        "end_date",
        "planned_start_date",
        "planned_end_date",
        "finished",
        "previous_sprint_id",
        "next_sprint_id",
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
            Value::Integer(self.project_id),
            date_value(self.start_date),
            date_value(self.end_date),
            date_value(self.planned_start_date),
            date_value(self.planned_end_date),
            flag_value(self.finished),
            id_value(self.previous_sprint_id),
            id_value(self.next_sprint_id),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: Some(row.get("id")?),
            name: row.get("name")?,
            project_id: row.get("project_id")?,
            start_date: row.get("start_date")?,
            end_date: row.get("end_date")?,
            planned_start_date: row.get("planned_start_date")?,
            planned_end_date: row.get("planned_end_date")?,
            finished: read_flag(row, Self::TABLE, "finished")?,
            previous_sprint_id: row.get("previous_sprint_id")?,
            next_sprint_id: row.get("next_sprint_id")?,
            task_ids: BTreeSet::new(),
        })
    }

    fn load_relations(&mut self, conn: &Connection) -> RepoResult<()> {
        let Some(id) = self.id else {
            return Ok(());
        };
        let mut stmt = conn.prepare("SELECT id FROM tasks WHERE sprint_id = ?1;")?;
        let mut rows = stmt.query([id])?;
        let mut task_ids = BTreeSet::new();
        while let Some(row) = rows.next()? {
            task_ids.insert(row.get::<_, EntityId>(0)?);
        }
        self.task_ids = task_ids;
        Ok(())
    }
}

/// Sprint DAO: the generic contract plus sprint relationship queries.
pub trait SprintRepository: CrudRepository<Sprint> {
    /// All sprints of one project.
    fn find_by_project_id(&self, project_id: EntityId) -> RepoResult<Vec<Sprint>>;
    /// The sprint owning the given task.
    fn find_by_task_id(&self, task_id: EntityId) -> RepoResult<Option<Sprint>>;
    /// The sprint whose `next_sprint_id` is `next_sprint_id` (its predecessor).
    fn find_by_next_sprint_id(&self, next_sprint_id: EntityId) -> RepoResult<Option<Sprint>>;
    /// The sprint whose `previous_sprint_id` is `previous_sprint_id` (its
    /// successor).
    fn find_by_previous_sprint_id(
        &self,
        previous_sprint_id: EntityId,
    ) -> RepoResult<Option<Sprint>>;
    /// Sets only the `next_sprint_id` column of `sprint_id`.
    fn update_next_sprint(
        &self,
        sprint_id: EntityId,
        next_sprint_id: Option<EntityId>,
    ) -> RepoResult<()>;
    /// Sets only the `previous_sprint_id` column of `sprint_id`.
    fn update_previous_sprint(
        &self,
        sprint_id: EntityId,
        previous_sprint_id: Option<EntityId>,
    ) -> RepoResult<()>;
}

impl SprintRepository for SqliteRepository<'_, Sprint> {
    fn find_by_project_id(&self, project_id: EntityId) -> RepoResult<Vec<Sprint>> {
        self.query_many("project_id = ?1", [project_id])
    }

    fn find_by_task_id(&self, task_id: EntityId) -> RepoResult<Option<Sprint>> {
        self.query_one(
            "id = (SELECT sprint_id FROM tasks WHERE id = ?1)",
            [task_id],
        )
    }

    fn find_by_next_sprint_id(&self, next_sprint_id: EntityId) -> RepoResult<Option<Sprint>> {
        self.query_one("next_sprint_id = ?1", [next_sprint_id])
    }

    fn find_by_previous_sprint_id(
        &self,
        previous_sprint_id: EntityId,
    ) -> RepoResult<Option<Sprint>> {
        self.query_one("previous_sprint_id = ?1", [previous_sprint_id])
    }

    fn update_next_sprint(
        &self,
        sprint_id: EntityId,
        next_sprint_id: Option<EntityId>,
    ) -> RepoResult<()> {
        reject_self_link(sprint_id, next_sprint_id, "next_sprint_id")?;
        self.update_column(sprint_id, "next_sprint_id", id_value(next_sprint_id))
    }

    fn update_previous_sprint(
        &self,
        sprint_id: EntityId,
        previous_sprint_id: Option<EntityId>,
    ) -> RepoResult<()> {
        reject_self_link(sprint_id, previous_sprint_id, "previous_sprint_id")?;
        self.update_column(sprint_id, "previous_sprint_id", id_value(previous_sprint_id))
    }
}

fn reject_self_link(
    sprint_id: EntityId,
    target: Option<EntityId>,
    field: &'static str,
) -> RepoResult<()> {
    if target == Some(sprint_id) {
        return Err(RepoError::Validation(ModelValidationError::SelfLink {
            id: sprint_id,
            field,
        }));
    }
    Ok(())
}
