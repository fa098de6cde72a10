//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define one generic CRUD contract plus per-entity relationship queries.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes enforce model validation before persistence.
//! - Single-row lookups return `Ok(None)` for missing rows; only writes that
//!   address a missing row return `NotFound`.

pub mod crud;
pub mod customer_repo;
pub mod employee_repo;
pub mod project_repo;
pub mod sprint_repo;
pub mod task_confirmation_repo;
pub mod task_repo;
