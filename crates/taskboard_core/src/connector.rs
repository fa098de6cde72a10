//! Database connector: one DAO per entity over one shared connection.
//!
//! # Responsibility
//! - Own the single SQLite connection every DAO borrows.
//! - Hand out entity DAOs, as trait objects through `DatabaseConnector` or as
//!   concrete SQLite repositories.
//! - Scope multi-statement work in one transaction.
//!
//! # Invariants
//! - A constructed `SqliteConnector` has a fully migrated schema; DAO getters
//!   therefore never fail.
//! - DAOs cannot outlive the connector they borrow from.

use crate::config::StoreConfig;
use crate::db::{open_db_in_memory, open_with_config};
use crate::model::customer::Customer;
use crate::model::employee::Employee;
use crate::model::project::Project;
use crate::model::sprint::Sprint;
use crate::model::task::Task;
use crate::model::task_confirmation::TaskConfirmation;
use crate::repo::crud::{ensure_entity_table, ensure_schema_version, RepoError, RepoResult};
use crate::repo::customer_repo::{CustomerRepository, SqliteCustomerRepository};
use crate::repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
use crate::repo::project_repo::{ProjectRepository, SqliteProjectRepository};
use crate::repo::sprint_repo::{SprintRepository, SqliteSprintRepository};
use crate::repo::task_confirmation_repo::{
    SqliteTaskConfirmationRepository, TaskConfirmationRepository,
};
use crate::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use crate::service::sprint_service::SprintService;
use log::{debug, info, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Registry exposing one DAO per entity type.
///
/// Every DAO returned by one connector shares that connector's connection.
pub trait DatabaseConnector {
    fn customer_dao(&self) -> Box<dyn CustomerRepository + '_>;
    fn employee_dao(&self) -> Box<dyn EmployeeRepository + '_>;
    fn project_dao(&self) -> Box<dyn ProjectRepository + '_>;
    fn sprint_dao(&self) -> Box<dyn SprintRepository + '_>;
    fn task_dao(&self) -> Box<dyn TaskRepository + '_>;
    fn task_confirmation_dao(&self) -> Box<dyn TaskConfirmationRepository + '_>;
}

/// SQLite-backed connector.
pub struct SqliteConnector {
    conn: Connection,
}

impl SqliteConnector {
    /// Opens the store described by `config` and verifies its schema.
    pub fn open(config: &StoreConfig) -> RepoResult<Self> {
        let conn = open_with_config(config)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> RepoResult<Self> {
        Self::from_connection(open_db_in_memory()?)
    }

    /// Wraps an already bootstrapped connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when any entity
    ///   table does not match its mapping.
    pub fn from_connection(conn: Connection) -> RepoResult<Self> {
        ensure_schema_version(&conn)?;
        ensure_entity_table::<Customer>(&conn)?;
        ensure_entity_table::<Employee>(&conn)?;
        ensure_entity_table::<Project>(&conn)?;
        ensure_entity_table::<Sprint>(&conn)?;
        ensure_entity_table::<Task>(&conn)?;
        ensure_entity_table::<TaskConfirmation>(&conn)?;
        info!("event=connector_open module=connector status=ok");
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn into_connection(self) -> Connection {
        self.conn
    }

    pub fn customers(&self) -> SqliteCustomerRepository<'_> {
        SqliteCustomerRepository::new_unchecked(&self.conn)
    }

    pub fn employees(&self) -> SqliteEmployeeRepository<'_> {
        SqliteEmployeeRepository::new_unchecked(&self.conn)
    }

    pub fn projects(&self) -> SqliteProjectRepository<'_> {
        SqliteProjectRepository::new_unchecked(&self.conn)
    }

    pub fn sprints(&self) -> SqliteSprintRepository<'_> {
        SqliteSprintRepository::new_unchecked(&self.conn)
    }

    pub fn tasks(&self) -> SqliteTaskRepository<'_> {
        SqliteTaskRepository::new_unchecked(&self.conn)
    }

    pub fn task_confirmations(&self) -> SqliteTaskConfirmationRepository<'_> {
        SqliteTaskConfirmationRepository::new_unchecked(&self.conn)
    }

    pub fn sprint_service(&self) -> SprintService<SqliteSprintRepository<'_>> {
        SprintService::new(self.sprints())
    }

    /// Runs `work` inside one immediate transaction.
    ///
    /// Commits when `work` returns `Ok`; rolls back otherwise. Nested calls
    /// fail because SQLite does not nest `BEGIN`.
    pub fn transaction<T, E>(&self, work: impl FnOnce(&Self) -> Result<T, E>) -> Result<T, E>
    where
        E: From<RepoError>,
    {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)
            .map_err(|err| E::from(RepoError::from(err)))?;
        debug!("event=tx_begin module=connector status=ok");

        match work(self) {
            Ok(value) => {
                tx.commit().map_err(|err| E::from(RepoError::from(err)))?;
                debug!("event=tx_commit module=connector status=ok");
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    warn!(
                        "event=tx_rollback module=connector status=error error={}",
                        rollback_err
                    );
                } else {
                    debug!("event=tx_rollback module=connector status=ok");
                }
                Err(err)
            }
        }
    }
}

impl DatabaseConnector for SqliteConnector {
    fn customer_dao(&self) -> Box<dyn CustomerRepository + '_> {
        Box::new(self.customers())
    }

    fn employee_dao(&self) -> Box<dyn EmployeeRepository + '_> {
        Box::new(self.employees())
    }

    fn project_dao(&self) -> Box<dyn ProjectRepository + '_> {
        Box::new(self.projects())
    }

    fn sprint_dao(&self) -> Box<dyn SprintRepository + '_> {
        Box::new(self.sprints())
    }

    fn task_dao(&self) -> Box<dyn TaskRepository + '_> {
        Box::new(self.tasks())
    }

    fn task_confirmation_dao(&self) -> Box<dyn TaskConfirmationRepository + '_> {
        Box::new(self.task_confirmations())
    }
}
