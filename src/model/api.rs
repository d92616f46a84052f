use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use utoipa::ToSchema;

use super::{
    fields::{optional_text, reference_ids, require_base_path, require_text},
    Status, ValidationError,
};

/// A service definition exposed by the gateway.
///
/// `resources` is derived from the store's ancestor index when the api is
/// read; it is never written through this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Api {
    pub id: String,
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    pub base_path: String,
    pub cors: bool,
    pub creation_date: DateTime<Utc>,
    pub status: Status,
    pub environments: Vec<String>,
    pub plans: Vec<String>,
    pub resources: BTreeSet<String>,
}

/// Create/update payload for an api.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ApiInput {
    pub name: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    pub base_path: Option<String>,
    pub cors: Option<bool>,
    pub status: Option<Status>,
    #[serde(default)]
    pub environments: Vec<String>,
    #[serde(default)]
    pub plans: Vec<String>,
}

/// Validated, caller-writable api fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFields {
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    pub base_path: String,
    pub cors: bool,
    pub status: Status,
    pub environments: Vec<String>,
    pub plans: Vec<String>,
}

impl ApiInput {
    /// Checks required fields and normalizes the base path and reference lists.
    ///
    /// # Errors
    /// Returns `ValidationError` when `name`, `version` or `base_path` is missing or malformed.
    pub fn validate(self) -> Result<ApiFields, ValidationError> {
        Ok(ApiFields {
            name: require_text(self.name, "name")?,
            version: require_text(self.version, "version")?,
            description: optional_text(self.description),
            base_path: require_base_path(self.base_path, "base_path")?,
            cors: self.cors.unwrap_or(false),
            status: self.status.unwrap_or_default(),
            environments: reference_ids(self.environments, "environments")?,
            plans: reference_ids(self.plans, "plans")?,
        })
    }
}

/// Normalizes a base-path filter the same way stored base paths are normalized.
///
/// # Errors
/// Returns `ValidationError` when the value is not a valid path.
pub fn normalize_base_path(raw: &str) -> Result<String, ValidationError> {
    require_base_path(Some(raw.to_string()), "base_path")
}

impl Api {
    #[must_use]
    pub fn new(id: String, fields: ApiFields, creation_date: DateTime<Utc>) -> Self {
        Self {
            id,
            name: fields.name,
            version: fields.version,
            description: fields.description,
            base_path: fields.base_path,
            cors: fields.cors,
            creation_date,
            status: fields.status,
            environments: fields.environments,
            plans: fields.plans,
            resources: BTreeSet::new(),
        }
    }

    /// Replaces every caller-writable field; `id`, `creation_date` and `resources` are kept.
    #[must_use]
    pub fn with_fields(self, fields: ApiFields) -> Self {
        Self {
            name: fields.name,
            version: fields.version,
            description: fields.description,
            base_path: fields.base_path,
            cors: fields.cors,
            status: fields.status,
            environments: fields.environments,
            plans: fields.plans,
            ..self
        }
    }
}
