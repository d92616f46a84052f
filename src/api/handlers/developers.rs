//! Developers consuming the gateway. Credentials are write-only: accepted on
//! create and on authenticate, never returned.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};

use super::{created, error::bad_request, page_params, ErrorBody, Gate};
use crate::{
    access::Privilege,
    hierarchy::HierarchyManager,
    model::{Developer, DeveloperCredentials, DeveloperInput, EntityKind},
    pagination::PageParams,
};

#[utoipa::path(
    get,
    path = "/v1/developers",
    params(PageParams),
    responses(
        (status = 200, description = "Developers, paged when `page` or `limit` is supplied.", body = [Developer]),
        (status = 400, description = "Invalid paging parameters.", body = ErrorBody),
        (status = 401, description = "Missing or unknown bearer token.", body = ErrorBody),
        (status = 403, description = "Missing READ_DEVELOPER.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "developers"
)]
pub async fn list_developers(
    headers: HeaderMap,
    Extension(manager): Extension<HierarchyManager>,
    Extension(gate): Extension<Gate>,
    query: Result<Query<PageParams>, QueryRejection>,
) -> Response {
    if let Err(err) = gate
        .authorize(&headers, Privilege::read(EntityKind::Developer))
        .await
    {
        return err.into_response();
    }

    let params = match page_params(query) {
        Ok(params) => params,
        Err(response) => return response,
    };

    match manager.list_developers(params).await {
        Ok(listing) => Json(listing).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/v1/developers",
    request_body = DeveloperInput,
    responses(
        (status = 201, description = "Developer created.", body = Developer),
        (status = 400, description = "Invalid input.", body = ErrorBody),
        (status = 401, description = "Missing or unknown bearer token.", body = ErrorBody),
        (status = 403, description = "Missing CREATE_DEVELOPER.", body = ErrorBody),
        (status = 409, description = "Email already registered.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "developers"
)]
pub async fn create_developer(
    headers: HeaderMap,
    Extension(manager): Extension<HierarchyManager>,
    Extension(gate): Extension<Gate>,
    payload: Result<Json<DeveloperInput>, JsonRejection>,
) -> Response {
    if let Err(err) = gate
        .authorize(&headers, Privilege::create(EntityKind::Developer))
        .await
    {
        return err.into_response();
    }

    let Json(input) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    match manager.create_developer(input).await {
        Ok(developer) => created(&format!("/v1/developers/{}", developer.id), &developer),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/v1/developers/{developer_id}",
    params(("developer_id" = String, Path, description = "Developer id")),
    responses(
        (status = 200, description = "Developer found.", body = Developer),
        (status = 401, description = "Missing or unknown bearer token.", body = ErrorBody),
        (status = 403, description = "Missing READ_DEVELOPER.", body = ErrorBody),
        (status = 404, description = "Developer not found.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "developers"
)]
pub async fn get_developer(
    Path(developer_id): Path<String>,
    headers: HeaderMap,
    Extension(manager): Extension<HierarchyManager>,
    Extension(gate): Extension<Gate>,
) -> Response {
    if let Err(err) = gate
        .authorize(&headers, Privilege::read(EntityKind::Developer))
        .await
    {
        return err.into_response();
    }

    match manager.find_developer(&developer_id).await {
        Ok(developer) => Json(developer).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/v1/developers/{developer_id}",
    params(("developer_id" = String, Path, description = "Developer id")),
    responses(
        (status = 204, description = "Developer deleted."),
        (status = 401, description = "Missing or unknown bearer token.", body = ErrorBody),
        (status = 403, description = "Missing DELETE_DEVELOPER.", body = ErrorBody),
        (status = 404, description = "Developer not found.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "developers"
)]
pub async fn delete_developer(
    Path(developer_id): Path<String>,
    headers: HeaderMap,
    Extension(manager): Extension<HierarchyManager>,
    Extension(gate): Extension<Gate>,
) -> Response {
    if let Err(err) = gate
        .authorize(&headers, Privilege::delete(EntityKind::Developer))
        .await
    {
        return err.into_response();
    }

    match manager.delete_developer(&developer_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/v1/developers/authenticate",
    request_body = DeveloperCredentials,
    responses(
        (status = 200, description = "Email and password match a developer.", body = Developer),
        (status = 400, description = "Malformed payload.", body = ErrorBody),
        (status = 401, description = "Missing or unknown bearer token.", body = ErrorBody),
        (status = 403, description = "Missing READ_DEVELOPER.", body = ErrorBody),
        (status = 404, description = "No developer with these credentials.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "developers"
)]
pub async fn authenticate_developer(
    headers: HeaderMap,
    Extension(manager): Extension<HierarchyManager>,
    Extension(gate): Extension<Gate>,
    payload: Result<Json<DeveloperCredentials>, JsonRejection>,
) -> Response {
    if let Err(err) = gate
        .authorize(&headers, Privilege::read(EntityKind::Developer))
        .await
    {
        return err.into_response();
    }

    let Json(credentials) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    match manager.authenticate_developer(credentials).await {
        Ok(developer) => Json(developer).into_response(),
        Err(err) => err.into_response(),
    }
}
