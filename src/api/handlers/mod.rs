//! Route handlers for the admin API.
//!
//! Every handler asks the access gate for the privilege it needs, decodes its
//! input, then delegates to the [`HierarchyManager`](crate::hierarchy::HierarchyManager).
//! Failures are rendered by the `IntoResponse` impls in [`error`].

pub mod apis;
pub mod developers;
pub mod environments;
pub mod error;
pub mod health;
pub mod operations;
pub mod plans;
pub mod resources;

pub use error::ErrorBody;

use axum::{
    extract::{rejection::QueryRejection, Query},
    http::{header::LOCATION, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

use crate::{access::AccessGate, pagination::PageParams};

/// Access gate as shared through an axum `Extension`.
pub type Gate = Arc<dyn AccessGate>;

/// 201 with a `Location` header pointing at the new entity.
pub(crate) fn created<T: Serialize>(location: &str, body: &T) -> Response {
    match HeaderValue::from_str(location) {
        Ok(location) => (StatusCode::CREATED, [(LOCATION, location)], Json(body)).into_response(),
        Err(err) => {
            error!("Failed to build Location header: {err}");
            (StatusCode::CREATED, Json(body)).into_response()
        }
    }
}

/// Unwraps `page`/`limit`, turning a malformed query string into a JSON 400.
pub(crate) fn page_params(
    query: Result<Query<PageParams>, QueryRejection>,
) -> Result<PageParams, Response> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| error::bad_request(rejection.body_text()))
}
