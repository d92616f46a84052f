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
    model::{EntityKind, Resource, ResourceInput},
    pagination::PageParams,
};

#[utoipa::path(
    get,
    path = "/v1/apis/{api_id}/resources",
    params(("api_id" = String, Path, description = "Api id"), PageParams),
    responses(
        (status = 200, description = "Resources of the api, paged when `page` or `limit` is supplied.", body = [Resource]),
        (status = 400, description = "Invalid paging parameters.", body = ErrorBody),
        (status = 401, description = "Missing or unknown bearer token.", body = ErrorBody),
        (status = 403, description = "Missing READ_RESOURCE.", body = ErrorBody),
        (status = 404, description = "Api not found.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "resources"
)]
pub async fn list_resources(
    Path(api_id): Path<String>,
    headers: HeaderMap,
    Extension(manager): Extension<HierarchyManager>,
    Extension(gate): Extension<Gate>,
    query: Result<Query<PageParams>, QueryRejection>,
) -> Response {
    if let Err(err) = gate
        .authorize(&headers, Privilege::read(EntityKind::Resource))
        .await
    {
        return err.into_response();
    }

    let params = match page_params(query) {
        Ok(params) => params,
        Err(response) => return response,
    };

    match manager.list_resources(&api_id, params).await {
        Ok(listing) => Json(listing).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/v1/apis/{api_id}/resources",
    request_body = ResourceInput,
    params(("api_id" = String, Path, description = "Api id")),
    responses(
        (status = 201, description = "Resource created.", body = Resource),
        (status = 400, description = "Invalid input.", body = ErrorBody),
        (status = 401, description = "Missing or unknown bearer token.", body = ErrorBody),
        (status = 403, description = "Missing CREATE_RESOURCE.", body = ErrorBody),
        (status = 404, description = "Api not found.", body = ErrorBody),
        (status = 409, description = "Resource name already used in this api.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "resources"
)]
pub async fn create_resource(
    Path(api_id): Path<String>,
    headers: HeaderMap,
    Extension(manager): Extension<HierarchyManager>,
    Extension(gate): Extension<Gate>,
    payload: Result<Json<ResourceInput>, JsonRejection>,
) -> Response {
    if let Err(err) = gate
        .authorize(&headers, Privilege::create(EntityKind::Resource))
        .await
    {
        return err.into_response();
    }

    let Json(input) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    match manager.create_resource(&api_id, input).await {
        Ok(resource) => created(
            &format!("/v1/apis/{}/resources/{}", resource.api_id, resource.id),
            &resource,
        ),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/v1/apis/{api_id}/resources/{resource_id}",
    params(
        ("api_id" = String, Path, description = "Api id"),
        ("resource_id" = String, Path, description = "Resource id")
    ),
    responses(
        (status = 200, description = "Resource found.", body = Resource),
        (status = 401, description = "Missing or unknown bearer token.", body = ErrorBody),
        (status = 403, description = "Missing READ_RESOURCE.", body = ErrorBody),
        (status = 404, description = "Api not found or resource not under it.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "resources"
)]
pub async fn get_resource(
    Path((api_id, resource_id)): Path<(String, String)>,
    headers: HeaderMap,
    Extension(manager): Extension<HierarchyManager>,
    Extension(gate): Extension<Gate>,
) -> Response {
    if let Err(err) = gate
        .authorize(&headers, Privilege::read(EntityKind::Resource))
        .await
    {
        return err.into_response();
    }

    match manager.find_resource(&api_id, &resource_id).await {
        Ok(resource) => Json(resource).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/v1/apis/{api_id}/resources/{resource_id}",
    request_body = ResourceInput,
    params(
        ("api_id" = String, Path, description = "Api id"),
        ("resource_id" = String, Path, description = "Resource id")
    ),
    responses(
        (status = 200, description = "Resource updated.", body = Resource),
        (status = 400, description = "Invalid input.", body = ErrorBody),
        (status = 401, description = "Missing or unknown bearer token.", body = ErrorBody),
        (status = 403, description = "Missing UPDATE_RESOURCE.", body = ErrorBody),
        (status = 404, description = "Api not found or resource not under it.", body = ErrorBody),
        (status = 409, description = "Resource name already used in this api.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "resources"
)]
pub async fn update_resource(
    Path((api_id, resource_id)): Path<(String, String)>,
    headers: HeaderMap,
    Extension(manager): Extension<HierarchyManager>,
    Extension(gate): Extension<Gate>,
    payload: Result<Json<ResourceInput>, JsonRejection>,
) -> Response {
    if let Err(err) = gate
        .authorize(&headers, Privilege::update(EntityKind::Resource))
        .await
    {
        return err.into_response();
    }

    let Json(input) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    match manager.update_resource(&api_id, &resource_id, input).await {
        Ok(resource) => Json(resource).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/v1/apis/{api_id}/resources/{resource_id}",
    params(
        ("api_id" = String, Path, description = "Api id"),
        ("resource_id" = String, Path, description = "Resource id")
    ),
    responses(
        (status = 204, description = "Resource and its operations deleted."),
        (status = 401, description = "Missing or unknown bearer token.", body = ErrorBody),
        (status = 403, description = "Missing DELETE_RESOURCE.", body = ErrorBody),
        (status = 404, description = "Api not found or resource not under it.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "resources"
)]
pub async fn delete_resource(
    Path((api_id, resource_id)): Path<(String, String)>,
    headers: HeaderMap,
    Extension(manager): Extension<HierarchyManager>,
    Extension(gate): Extension<Gate>,
) -> Response {
    if let Err(err) = gate
        .authorize(&headers, Privilege::delete(EntityKind::Resource))
        .await
    {
        return err.into_response();
    }

    match manager.delete_resource(&api_id, &resource_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}
