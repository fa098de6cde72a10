//! Customer entity.

use super::{require_text, EntityId, ModelValidationError};
use serde::{Deserialize, Serialize};

/// Organization or person a project is delivered for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Option<EntityId>,
    pub name: String,
    pub email: Option<String>,
}

impl Customer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: None,
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        require_text("customer", "name", &self.name)
    }
}
