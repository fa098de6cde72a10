//! Sprint entity.
//!
//! # Responsibility
//! - Describe one iteration of a project and its place in the project's
//!   sprint chain.
//!
//! # Invariants
//! - `previous_sprint_id` and `next_sprint_id` are independent foreign keys;
//!   nothing at this layer keeps the two ends of a link consistent.
//! - `task_ids` mirrors the reverse `tasks.sprint_id` relation. It is filled
//!   on read and ignored on write.
//! - A sprint never links to itself.

use super::{require_ordered, require_text, EntityId, ModelValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprint {
    pub id: Option<EntityId>,
    pub name: String,
    pub project_id: EntityId,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub planned_start_date: Option<NaiveDate>,
    pub planned_end_date: Option<NaiveDate>,
    pub finished: bool,
    pub previous_sprint_id: Option<EntityId>,
    pub next_sprint_id: Option<EntityId>,
    #[serde(default)]
    pub task_ids: BTreeSet<EntityId>,
}

impl Sprint {
    pub fn new(name: impl Into<String>, project_id: EntityId) -> Self {
        Self {
            id: None,
            name: name.into(),
            project_id,
            start_date: None,
            end_date: None,
            planned_start_date: None,
            planned_end_date: None,
            finished: false,
            previous_sprint_id: None,
            next_sprint_id: None,
            task_ids: BTreeSet::new(),
        }
    }

    /// Returns whether this sprint is the first of its chain.
    pub fn is_head(&self) -> bool {
        self.previous_sprint_id.is_none()
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        require_text("sprint", "name", &self.name)?;
        require_ordered("sprint", "start_date", self.start_date, self.end_date)?;
        require_ordered(
            "sprint",
            "planned_start_date",
            self.planned_start_date,
            self.planned_end_date,
        )?;

        if let Some(id) = self.id {
            if self.previous_sprint_id == Some(id) {
                return Err(ModelValidationError::SelfLink {
                    id,
                    field: "previous_sprint_id",
                });
            }
            if self.next_sprint_id == Some(id) {
                return Err(ModelValidationError::SelfLink {
                    id,
                    field: "next_sprint_id",
                });
            }
        }
        Ok(())
    }
}
