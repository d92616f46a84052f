use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{
    fields::{optional_text, require_text, require_url},
    Status, ValidationError,
};

/// A deployment target an api can be published to. `inbound_url` is where the
/// gateway listens, `outbound_url` is the upstream it forwards to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Environment {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub inbound_url: String,
    pub outbound_url: String,
    pub status: Status,
    pub creation_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub inbound_url: Option<String>,
    pub outbound_url: Option<String>,
    pub status: Option<Status>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentFields {
    pub name: String,
    pub description: Option<String>,
    pub inbound_url: String,
    pub outbound_url: String,
    pub status: Status,
}

impl EnvironmentInput {
    /// # Errors
    /// Returns `ValidationError` when the name is blank or either URL is not absolute `http(s)`.
    pub fn validate(self) -> Result<EnvironmentFields, ValidationError> {
        Ok(EnvironmentFields {
            name: require_text(self.name, "name")?,
            description: optional_text(self.description),
            inbound_url: require_url(self.inbound_url, "inbound_url")?,
            outbound_url: require_url(self.outbound_url, "outbound_url")?,
            status: self.status.unwrap_or_default(),
        })
    }
}

impl Environment {
    #[must_use]
    pub fn new(id: String, fields: EnvironmentFields, creation_date: DateTime<Utc>) -> Self {
        Self {
            id,
            name: fields.name,
            description: fields.description,
            inbound_url: fields.inbound_url,
            outbound_url: fields.outbound_url,
            status: fields.status,
            creation_date,
        }
    }

    #[must_use]
    pub fn with_fields(self, fields: EnvironmentFields) -> Self {
        Self {
            name: fields.name,
            description: fields.description,
            inbound_url: fields.inbound_url,
            outbound_url: fields.outbound_url,
            status: fields.status,
            ..self
        }
    }
}
