//! JSON error bodies and the status mapping for gate and hierarchy failures.

use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::{access::AccessError, hierarchy::HierarchyError, store::StoreError};

/// Body of every non-2xx response.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    /// Machine-readable kind: `not_found`, `validation_error`, `conflict`, ...
    pub error: String,
    pub message: String,
}

pub(crate) fn error_response(status: StatusCode, error: &str, message: impl Into<String>) -> Response {
    let body = ErrorBody {
        error: error.to_string(),
        message: message.into(),
    };
    (status, Json(body)).into_response()
}

/// 400 for payloads or query strings axum could not decode.
pub(crate) fn bad_request(message: impl Into<String>) -> Response {
    error_response(StatusCode::BAD_REQUEST, "validation_error", message)
}

impl IntoResponse for HierarchyError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound(kind) => {
                error_response(StatusCode::NOT_FOUND, "not_found", format!("{kind} not found"))
            }
            Self::Validation(message) => bad_request(message),
            Self::Conflict(message) => error_response(StatusCode::CONFLICT, "conflict", message),
            Self::Store(StoreError::Unavailable(err)) => {
                error!("Store unavailable: {err}");
                error_response(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "unavailable",
                    "store unavailable",
                )
            }
            Self::Store(err) => {
                error!("Store error: {err}");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal server error",
                )
            }
        }
    }
}

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated => {
                let mut response =
                    error_response(StatusCode::UNAUTHORIZED, "unauthorized", self.to_string());
                response
                    .headers_mut()
                    .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
                response
            }
            Self::Forbidden(_) => {
                error_response(StatusCode::FORBIDDEN, "forbidden", self.to_string())
            }
        }
    }
}
