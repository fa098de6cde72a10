//! Data-access layer for the taskboard project-management model.
//! Customers, employees, projects, sprints, tasks and task confirmations are
//! persisted one row per entity in SQLite.

pub mod config;
pub mod connector;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, StoreConfig};
pub use connector::{DatabaseConnector, SqliteConnector};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::customer::Customer;
pub use model::employee::{Employee, EmployeeRole};
pub use model::project::Project;
pub use model::sprint::Sprint;
pub use model::task::{Task, TaskStatus};
pub use model::task_confirmation::{ConfirmationStatus, TaskConfirmation};
pub use model::{EntityId, ModelValidationError};
pub use repo::crud::{CrudRepository, Entity, RepoError, RepoResult, SqliteRepository};
pub use repo::customer_repo::{CustomerRepository, SqliteCustomerRepository};
pub use repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
pub use repo::project_repo::{ProjectRepository, SqliteProjectRepository};
pub use repo::sprint_repo::{SprintRepository, SqliteSprintRepository};
pub use repo::task_confirmation_repo::{
    SqliteTaskConfirmationRepository, TaskConfirmationRepository,
};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use service::sprint_service::{SprintService, SprintServiceError, SprintServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
