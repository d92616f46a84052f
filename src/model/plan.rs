use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{
    fields::{optional_text, require_text},
    Status, ValidationError,
};

/// A consumption plan apis can be offered under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_default: bool,
    pub status: Status,
    pub creation_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct PlanInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_default: Option<bool>,
    pub status: Option<Status>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanFields {
    pub name: String,
    pub description: Option<String>,
    pub is_default: bool,
    pub status: Status,
}

impl PlanInput {
    /// # Errors
    /// Returns `ValidationError` when `name` is missing or blank.
    pub fn validate(self) -> Result<PlanFields, ValidationError> {
        Ok(PlanFields {
            name: require_text(self.name, "name")?,
            description: optional_text(self.description),
            is_default: self.is_default.unwrap_or(false),
            status: self.status.unwrap_or_default(),
        })
    }
}

impl Plan {
    #[must_use]
    pub fn new(id: String, fields: PlanFields, creation_date: DateTime<Utc>) -> Self {
        Self {
            id,
            name: fields.name,
            description: fields.description,
            is_default: fields.is_default,
            status: fields.status,
            creation_date,
        }
    }
}
