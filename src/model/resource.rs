use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use utoipa::ToSchema;

use super::{
    fields::{optional_text, require_text},
    ValidationError,
};

/// A path-grouping container of operations, owned by exactly one api.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Resource {
    pub id: String,
    pub api_id: String,
    pub name: String,
    pub description: Option<String>,
    /// Derived from the store's ancestor index on read.
    pub operations: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ResourceInput {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFields {
    pub name: String,
    pub description: Option<String>,
}

impl ResourceInput {
    /// # Errors
    /// Returns `ValidationError` when `name` is missing or blank.
    pub fn validate(self) -> Result<ResourceFields, ValidationError> {
        Ok(ResourceFields {
            name: require_text(self.name, "name")?,
            description: optional_text(self.description),
        })
    }
}

impl Resource {
    #[must_use]
    pub fn new(id: String, api_id: String, fields: ResourceFields) -> Self {
        Self {
            id,
            api_id,
            name: fields.name,
            description: fields.description,
            operations: BTreeSet::new(),
        }
    }

    /// Replaces the writable fields; id, owner and operation membership are kept.
    #[must_use]
    pub fn with_fields(self, fields: ResourceFields) -> Self {
        Self {
            name: fields.name,
            description: fields.description,
            ..self
        }
    }
}
