//! Project repository contract and SQLite implementation.

use crate::model::project::Project;
use crate::model::{EntityId, ModelValidationError};
use crate::repo::crud::{
    date_value, flag_value, id_value, read_flag, CrudRepository, Entity, RepoResult,
    SqliteRepository,
};
use rusqlite::types::Value;
use rusqlite::Row;

pub type SqliteProjectRepository<'conn> = SqliteRepository<'conn, Project>;

impl Entity for Project {
    const NAME: &'static str = "project";
    const TABLE: &'static str = "projects";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "customer_id",
        "manager_id",
        "start_date",
        "end_date",
        "planned_start_date",
        "planned_end_date",
        "finished",
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
            Value::Integer(self.customer_id),
            id_value(self.manager_id),
            date_value(self.start_date),
            date_value(self.end_date),
            date_value(self.planned_start_date),
            date_value(self.planned_end_date),
            flag_value(self.finished),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: Some(row.get("id")?),
            name: row.get("name")?,
            customer_id: row.get("customer_id")?,
            manager_id: row.get("manager_id")?,
            start_date: row.get("start_date")?,
            end_date: row.get("end_date")?,
            planned_start_date: row.get("planned_start_date")?,
            planned_end_date: row.get("planned_end_date")?,
            finished: read_flag(row, Self::TABLE, "finished")?,
        })
    }
}

pub trait ProjectRepository: CrudRepository<Project> {
    fn find_by_customer_id(&self, customer_id: EntityId) -> RepoResult<Vec<Project>>;
    fn find_by_manager_id(&self, manager_id: EntityId) -> RepoResult<Vec<Project>>;
    /// The project a sprint belongs to.
    fn find_by_sprint_id(&self, sprint_id: EntityId) -> RepoResult<Option<Project>>;
}

impl ProjectRepository for SqliteRepository<'_, Project> {
    fn find_by_customer_id(&self, customer_id: EntityId) -> RepoResult<Vec<Project>> {
        self.query_many("customer_id = ?1", [customer_id])
    }

    fn find_by_manager_id(&self, manager_id: EntityId) -> RepoResult<Vec<Project>> {
        self.query_many("manager_id = ?1", [manager_id])
    }

    fn find_by_sprint_id(&self, sprint_id: EntityId) -> RepoResult<Option<Project>> {
        self.query_one(
            "id = (SELECT project_id FROM sprints WHERE id = ?1)",
            [sprint_id],
        )
    }
}
