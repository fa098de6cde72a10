//! Employee entity.

use super::{require_text, EntityId, ModelValidationError};
use serde::{Deserialize, Serialize};

/// Staff role, persisted as snake_case text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeRole {
    Developer,
    Tester,
    Manager,
}

impl EmployeeRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Developer => "developer",
            Self::Tester => "tester",
            Self::Manager => "manager",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "developer" => Some(Self::Developer),
            "tester" => Some(Self::Tester),
            "manager" => Some(Self::Manager),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: Option<EntityId>,
    pub first_name: String,
    pub last_name: String,
    pub role: EmployeeRole,
}

impl Employee {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        role: EmployeeRole,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            role,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        require_text("employee", "first_name", &self.first_name)?;
        require_text("employee", "last_name", &self.last_name)
    }
}
