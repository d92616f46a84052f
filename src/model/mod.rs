//! Entities managed by the control plane and the payloads that create them.
//!
//! Every entity is addressed by its own id and carries explicit parent ids
//! instead of nested children. Inputs are deserialized into `*Input` structs
//! whose fields are all optional, then validated by an explicit per-entity
//! constructor so missing fields surface as [`ValidationError`] instead of a
//! deserializer rejection.

mod api;
mod developer;
mod environment;
mod fields;
mod operation;
mod plan;
mod resource;

pub use api::{normalize_base_path, Api, ApiFields, ApiInput};
pub use developer::{hash_password, Developer, DeveloperCredentials, DeveloperFields, DeveloperInput};
pub use environment::{Environment, EnvironmentFields, EnvironmentInput};
pub use operation::{Operation, OperationFields, OperationInput};
pub use plan::{Plan, PlanFields, PlanInput};
pub use resource::{Resource, ResourceFields, ResourceInput};

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;

/// Input that is structurally invalid: a required field is missing or malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(String);

impl ValidationError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    #[must_use]
    pub fn missing(field: &str) -> Self {
        Self(format!("missing required field: {field}"))
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.0
    }
}

/// The kinds of entity the control plane stores. Used for error messages and
/// for privilege names (`READ_OPERATION`, `CREATE_API`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Api,
    Resource,
    Operation,
    Environment,
    Plan,
    Developer,
}

impl EntityKind {
    pub const ALL: [Self; 6] = [
        Self::Api,
        Self::Resource,
        Self::Operation,
        Self::Environment,
        Self::Plan,
        Self::Developer,
    ];

    /// Upper-case token used inside privilege names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Api => "API",
            Self::Resource => "RESOURCE",
            Self::Operation => "OPERATION",
            Self::Environment => "ENVIRONMENT",
            Self::Plan => "PLAN",
            Self::Developer => "DEVELOPER",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Api => "Api",
            Self::Resource => "Resource",
            Self::Operation => "Operation",
            Self::Environment => "Environment",
            Self::Plan => "Plan",
            Self::Developer => "Developer",
        };
        f.write_str(name)
    }
}

/// Lifecycle state. Transition rules are owned by the caller; the control
/// plane stores whatever value it is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    #[default]
    Active,
    Inactive,
}

impl Status {
    /// Canonical representation; must match the values written by the SQL store.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
        }
    }
}

impl FromStr for Status {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ACTIVE" => Ok(Self::Active),
            "INACTIVE" => Ok(Self::Inactive),
            other => Err(ValidationError::new(format!("invalid status: {other}"))),
        }
    }
}

/// HTTP verb an operation matches. `ALL` matches any verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    All,
}

impl HttpMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::All => "ALL",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            "ALL" => Ok(Self::All),
            other => Err(ValidationError::new(format!("invalid method: {other}"))),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
