use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{
    fields::{optional_text, require_path},
    HttpMethod, ValidationError,
};

/// A single method + path route under a resource.
///
/// Both ancestor ids are stored so an operation can be checked against the
/// full `(api, resource)` chain without walking the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Operation {
    pub id: String,
    pub resource_id: String,
    pub api_id: String,
    pub method: HttpMethod,
    pub path: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct OperationInput {
    pub method: Option<HttpMethod>,
    pub path: Option<String>,
    pub description: Option<String>,
}

/// Validated routing fields of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationFields {
    pub method: HttpMethod,
    pub path: String,
    pub description: Option<String>,
}

impl OperationInput {
    /// `method` and `path` are the routing fields the gateway needs; both are mandatory.
    ///
    /// # Errors
    /// Returns `ValidationError` when a routing field is missing or the path is malformed.
    pub fn validate(self) -> Result<OperationFields, ValidationError> {
        let method = self.method.ok_or_else(|| ValidationError::missing("method"))?;
        Ok(OperationFields {
            method,
            path: require_path(self.path, "path")?,
            description: optional_text(self.description),
        })
    }
}

impl Operation {
    #[must_use]
    pub fn new(id: String, api_id: String, resource_id: String, fields: OperationFields) -> Self {
        Self {
            id,
            resource_id,
            api_id,
            method: fields.method,
            path: fields.path,
            description: fields.description,
        }
    }

    /// Replaces routing fields; id and hierarchy references are kept.
    #[must_use]
    pub fn with_fields(self, fields: OperationFields) -> Self {
        Self {
            method: fields.method,
            path: fields.path,
            description: fields.description,
            ..self
        }
    }

    /// Location of this operation in the admin API.
    #[must_use]
    pub fn location(&self) -> String {
        format!(
            "/v1/apis/{}/resources/{}/operations/{}",
            self.api_id, self.resource_id, self.id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_and_path_are_required() {
        assert_eq!(
            OperationInput {
                path: Some("/x".to_string()),
                ..OperationInput::default()
            }
            .validate(),
            Err(ValidationError::missing("method"))
        );
        assert_eq!(
            OperationInput {
                method: Some(HttpMethod::Get),
                ..OperationInput::default()
            }
            .validate(),
            Err(ValidationError::missing("path"))
        );
    }

    #[test]
    fn location_is_hierarchical() {
        let operation = Operation::new(
            "o1".to_string(),
            "a1".to_string(),
            "r1".to_string(),
            OperationFields {
                method: HttpMethod::Get,
                path: "/x".to_string(),
                description: None,
            },
        );
        assert_eq!(operation.location(), "/v1/apis/a1/resources/r1/operations/o1");
    }

    #[test]
    fn payload_parses_method_token() {
        let input: Result<OperationInput, _> =
            serde_json::from_str(r#"{"method":"GET","path":"/x"}"#);
        assert!(input.is_ok());
        if let Ok(input) = input {
            assert_eq!(input.method, Some(HttpMethod::Get));
        }
    }
}
