//! Environments: where an api is exposed (`inbound_url`) and where traffic is
//! forwarded (`outbound_url`). Shared between apis by reference.

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
    model::{EntityKind, Environment, EnvironmentInput},
    pagination::PageParams,
};

#[utoipa::path(
    get,
    path = "/v1/environments",
    params(PageParams),
    responses(
        (status = 200, description = "Environments, paged when `page` or `limit` is supplied.", body = [Environment]),
        (status = 400, description = "Invalid paging parameters.", body = ErrorBody),
        (status = 401, description = "Missing or unknown bearer token.", body = ErrorBody),
        (status = 403, description = "Missing READ_ENVIRONMENT.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "environments"
)]
pub async fn list_environments(
    headers: HeaderMap,
    Extension(manager): Extension<HierarchyManager>,
    Extension(gate): Extension<Gate>,
    query: Result<Query<PageParams>, QueryRejection>,
) -> Response {
    if let Err(err) = gate
        .authorize(&headers, Privilege::read(EntityKind::Environment))
        .await
    {
        return err.into_response();
    }

    let params = match page_params(query) {
        Ok(params) => params,
        Err(response) => return response,
    };

    match manager.list_environments(params).await {
        Ok(listing) => Json(listing).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/v1/environments",
    request_body = EnvironmentInput,
    responses(
        (status = 201, description = "Environment created.", body = Environment),
        (status = 400, description = "Invalid input.", body = ErrorBody),
        (status = 401, description = "Missing or unknown bearer token.", body = ErrorBody),
        (status = 403, description = "Missing CREATE_ENVIRONMENT.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "environments"
)]
pub async fn create_environment(
    headers: HeaderMap,
    Extension(manager): Extension<HierarchyManager>,
    Extension(gate): Extension<Gate>,
    payload: Result<Json<EnvironmentInput>, JsonRejection>,
) -> Response {
    if let Err(err) = gate
        .authorize(&headers, Privilege::create(EntityKind::Environment))
        .await
    {
        return err.into_response();
    }

    let Json(input) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    match manager.create_environment(input).await {
        Ok(environment) => created(
            &format!("/v1/environments/{}", environment.id),
            &environment,
        ),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/v1/environments/{environment_id}",
    params(("environment_id" = String, Path, description = "Environment id")),
    responses(
        (status = 200, description = "Environment found.", body = Environment),
        (status = 401, description = "Missing or unknown bearer token.", body = ErrorBody),
        (status = 403, description = "Missing READ_ENVIRONMENT.", body = ErrorBody),
        (status = 404, description = "Environment not found.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "environments"
)]
pub async fn get_environment(
    Path(environment_id): Path<String>,
    headers: HeaderMap,
    Extension(manager): Extension<HierarchyManager>,
    Extension(gate): Extension<Gate>,
) -> Response {
    if let Err(err) = gate
        .authorize(&headers, Privilege::read(EntityKind::Environment))
        .await
    {
        return err.into_response();
    }

    match manager.find_environment(&environment_id).await {
        Ok(environment) => Json(environment).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/v1/environments/{environment_id}",
    request_body = EnvironmentInput,
    params(("environment_id" = String, Path, description = "Environment id")),
    responses(
        (status = 200, description = "Environment updated.", body = Environment),
        (status = 400, description = "Invalid input.", body = ErrorBody),
        (status = 401, description = "Missing or unknown bearer token.", body = ErrorBody),
        (status = 403, description = "Missing UPDATE_ENVIRONMENT.", body = ErrorBody),
        (status = 404, description = "Environment not found.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "environments"
)]
pub async fn update_environment(
    Path(environment_id): Path<String>,
    headers: HeaderMap,
    Extension(manager): Extension<HierarchyManager>,
    Extension(gate): Extension<Gate>,
    payload: Result<Json<EnvironmentInput>, JsonRejection>,
) -> Response {
    if let Err(err) = gate
        .authorize(&headers, Privilege::update(EntityKind::Environment))
        .await
    {
        return err.into_response();
    }

    let Json(input) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    match manager.update_environment(&environment_id, input).await {
        Ok(environment) => Json(environment).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/v1/environments/{environment_id}",
    params(("environment_id" = String, Path, description = "Environment id")),
    responses(
        (status = 204, description = "Environment deleted."),
        (status = 401, description = "Missing or unknown bearer token.", body = ErrorBody),
        (status = 403, description = "Missing DELETE_ENVIRONMENT.", body = ErrorBody),
        (status = 404, description = "Environment not found.", body = ErrorBody),
        (status = 409, description = "Environment still referenced by an api.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "environments"
)]
pub async fn delete_environment(
    Path(environment_id): Path<String>,
    headers: HeaderMap,
    Extension(manager): Extension<HierarchyManager>,
    Extension(gate): Extension<Gate>,
) -> Response {
    if let Err(err) = gate
        .authorize(&headers, Privilege::delete(EntityKind::Environment))
        .await
    {
        return err.into_response();
    }

    match manager.delete_environment(&environment_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}
