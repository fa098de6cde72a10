//! Project-management domain model.
//!
//! # Responsibility
//! - Define plain entity records persisted one row per entity.
//! - Validate field-level invariants before writes and after reads.
//!
//! # Invariants
//! - Relationships are foreign-key ids, never embedded objects.
//! - `id` is `None` until the store assigns one on create.

use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod customer;
pub mod employee;
pub mod project;
pub mod sprint;
pub mod task;
pub mod task_confirmation;

/// Store-generated row identifier shared by every entity.
pub type EntityId = i64;

/// Field-level invariant violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// A required text field is empty after trimming.
    EmptyField { entity: &'static str, field: &'static str },
    /// Range end precedes range start.
    InvalidDateRange {
        entity: &'static str,
        start_field: &'static str,
        start: NaiveDate,
        end: NaiveDate,
    },
    /// A sprint links to itself through `previous_sprint_id`/`next_sprint_id`.
    SelfLink { id: EntityId, field: &'static str },
    /// A numeric field is below its lower bound.
    Negative { entity: &'static str, field: &'static str, value: i64 },
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField { entity, field } => {
                write!(f, "{entity}.{field} cannot be empty")
            }
            Self::InvalidDateRange {
                entity,
                start_field,
                start,
                end,
            } => write!(
                f,
                "{entity}.{start_field} range ends at {end}, before its start {start}"
            ),
            Self::SelfLink { id, field } => {
                write!(f, "sprint {id} cannot reference itself through {field}")
            }
            Self::Negative {
                entity,
                field,
                value,
            } => write!(f, "{entity}.{field} must be non-negative, got {value}"),
        }
    }
}

impl Error for ModelValidationError {}

pub(crate) fn require_text(
    entity: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), ModelValidationError> {
    if value.trim().is_empty() {
        return Err(ModelValidationError::EmptyField { entity, field });
    }
    Ok(())
}

pub(crate) fn require_ordered(
    entity: &'static str,
    start_field: &'static str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), ModelValidationError> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(ModelValidationError::InvalidDateRange {
                entity,
                start_field,
                start,
                end,
            });
        }
    }
    Ok(())
}
