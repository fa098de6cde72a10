//! Task entity.

use super::{require_text, EntityId, ModelValidationError};
use serde::{Deserialize, Serialize};

/// Task progress state, persisted as snake_case text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Open,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "open" => Some(Self::Open),
            "in_progress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

/// Unit of work scheduled into exactly one sprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Option<EntityId>,
    pub name: String,
    pub sprint_id: EntityId,
    pub description: Option<String>,
    /// Estimated effort in minutes.
    pub estimate_minutes: Option<i64>,
    pub status: TaskStatus,
}

impl Task {
    pub fn new(name: impl Into<String>, sprint_id: EntityId) -> Self {
        Self {
            id: None,
            name: name.into(),
            sprint_id,
            description: None,
            estimate_minutes: None,
            status: TaskStatus::Open,
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        require_text("task", "name", &self.name)?;
        if let Some(value) = self.estimate_minutes {
            if value < 0 {
                return Err(ModelValidationError::Negative {
                    entity: "task",
                    field: "estimate_minutes",
                    value,
                });
            }
        }
        Ok(())
    }
}
