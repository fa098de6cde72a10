//! Customer repository contract and SQLite implementation.

use crate::model::customer::Customer;
use crate::model::{EntityId, ModelValidationError};
use crate::repo::crud::{text_value, CrudRepository, Entity, RepoResult, SqliteRepository};
use rusqlite::types::Value;
use rusqlite::Row;

pub type SqliteCustomerRepository<'conn> = SqliteRepository<'conn, Customer>;

impl Entity for Customer {
    const NAME: &'static str = "customer";
    const TABLE: &'static str = "customers";
    const COLUMNS: &'static [&'static str] = &["name", "email"];

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
            text_value(self.email.as_deref()),
        ]
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        Ok(Self {
            id: Some(row.get("id")?),
            name: row.get("name")?,
            email: row.get("email")?,
        })
    }
}

pub trait CustomerRepository: CrudRepository<Customer> {
    /// The customer a project is delivered for.
    fn find_by_project_id(&self, project_id: EntityId) -> RepoResult<Option<Customer>>;
    /// Customers with exactly this name (case-insensitive).
    fn find_by_name(&self, name: &str) -> RepoResult<Vec<Customer>>;
}

impl CustomerRepository for SqliteRepository<'_, Customer> {
    fn find_by_project_id(&self, project_id: EntityId) -> RepoResult<Option<Customer>> {
        self.query_one(
            "id = (SELECT customer_id FROM projects WHERE id = ?1)",
            [project_id],
        )
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Vec<Customer>> {
        self.query_many("name = ?1 COLLATE NOCASE", [name.trim()])
    }
}
