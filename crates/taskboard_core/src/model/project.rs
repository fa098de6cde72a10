//! Project entity.
//!
//! # Invariants
//! - `customer_id` is mandatory; `manager_id` is cleared when the manager row
//!   is deleted.
//! - Actual and planned date ranges must not end before they start.

use super::{require_ordered, require_text, EntityId, ModelValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: Option<EntityId>,
    pub name: String,
    pub customer_id: EntityId,
    /// Employee responsible for delivery.
    pub manager_id: Option<EntityId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub planned_start_date: Option<NaiveDate>,
    pub planned_end_date: Option<NaiveDate>,
    pub finished: bool,
}

impl Project {
    pub fn new(name: impl Into<String>, customer_id: EntityId) -> Self {
        Self {
            id: None,
            name: name.into(),
            customer_id,
            manager_id: None,
            start_date: None,
            end_date: None,
            planned_start_date: None,
            planned_end_date: None,
            finished: false,
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        require_text("project", "name", &self.name)?;
        require_ordered("project", "start_date", self.start_date, self.end_date)?;
        require_ordered(
            "project",
            "planned_start_date",
            self.planned_start_date,
            self.planned_end_date,
        )
    }
}
