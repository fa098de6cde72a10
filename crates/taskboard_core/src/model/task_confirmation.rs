//! Task confirmation entity.
//!
//! An employee's acknowledgement of a task assignment. At most one
//! confirmation exists per (task, employee) pair.

use super::{EntityId, ModelValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationStatus {
    Pending,
    Confirmed,
    Rejected,
}

impl ConfirmationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "confirmed" => Some(Self::Confirmed),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConfirmation {
    pub id: Option<EntityId>,
    pub task_id: EntityId,
    pub employee_id: EntityId,
    pub status: ConfirmationStatus,
    pub requested_on: Option<NaiveDate>,
}

impl TaskConfirmation {
    /// Creates a pending confirmation request.
    pub fn new(task_id: EntityId, employee_id: EntityId) -> Self {
        Self {
            id: None,
            task_id,
            employee_id,
            status: ConfirmationStatus::Pending,
            requested_on: None,
        }
    }

    pub fn confirm(&mut self) {
        self.status = ConfirmationStatus::Confirmed;
    }

    pub fn reject(&mut self) {
        self.status = ConfirmationStatus::Rejected;
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        Ok(())
    }
}
