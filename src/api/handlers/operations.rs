//! Operation endpoints, always addressed through their api and resource.

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
    model::{EntityKind, Operation, OperationInput},
    pagination::PageParams,
};

#[utoipa::path(
    get,
    path = "/v1/apis/{api_id}/resources/{resource_id}/operations",
    params(
        ("api_id" = String, Path, description = "Api id"),
        ("resource_id" = String, Path, description = "Resource id"),
        PageParams
    ),
    responses(
        (status = 200, description = "Every operation of the resource, or one page of them when `page` or `limit` is supplied.", body = [Operation]),
        (status = 400, description = "Invalid paging parameters.", body = ErrorBody),
        (status = 401, description = "Missing or unknown bearer token.", body = ErrorBody),
        (status = 403, description = "Missing READ_OPERATION.", body = ErrorBody),
        (status = 404, description = "Api or resource not found.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "operations"
)]
pub async fn list_operations(
    Path((api_id, resource_id)): Path<(String, String)>,
    headers: HeaderMap,
    Extension(manager): Extension<HierarchyManager>,
    Extension(gate): Extension<Gate>,
    query: Result<Query<PageParams>, QueryRejection>,
) -> Response {
    if let Err(err) = gate
        .authorize(&headers, Privilege::read(EntityKind::Operation))
        .await
    {
        return err.into_response();
    }

    let params = match page_params(query) {
        Ok(params) => params,
        Err(response) => return response,
    };

    match manager.list_operations(&api_id, &resource_id, params).await {
        Ok(listing) => Json(listing).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/v1/apis/{api_id}/resources/{resource_id}/operations",
    request_body = OperationInput,
    params(
        ("api_id" = String, Path, description = "Api id"),
        ("resource_id" = String, Path, description = "Resource id")
    ),
    responses(
        (status = 201, description = "Operation created; `Location` points at it.", body = Operation),
        (status = 400, description = "Invalid input.", body = ErrorBody),
        (status = 401, description = "Missing or unknown bearer token.", body = ErrorBody),
        (status = 403, description = "Missing CREATE_OPERATION.", body = ErrorBody),
        (status = 404, description = "Api or resource not found.", body = ErrorBody),
        (status = 409, description = "Method and path already routed in this api.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "operations"
)]
pub async fn create_operation(
    Path((api_id, resource_id)): Path<(String, String)>,
    headers: HeaderMap,
    Extension(manager): Extension<HierarchyManager>,
    Extension(gate): Extension<Gate>,
    payload: Result<Json<OperationInput>, JsonRejection>,
) -> Response {
    if let Err(err) = gate
        .authorize(&headers, Privilege::create(EntityKind::Operation))
        .await
    {
        return err.into_response();
    }

    let Json(input) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    match manager.create_operation(&api_id, &resource_id, input).await {
        Ok(operation) => created(&operation.location(), &operation),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/v1/apis/{api_id}/resources/{resource_id}/operations/{operation_id}",
    params(
        ("api_id" = String, Path, description = "Api id"),
        ("resource_id" = String, Path, description = "Resource id"),
        ("operation_id" = String, Path, description = "Operation id")
    ),
    responses(
        (status = 200, description = "Operation found.", body = Operation),
        (status = 401, description = "Missing or unknown bearer token.", body = ErrorBody),
        (status = 403, description = "Missing READ_OPERATION.", body = ErrorBody),
        (status = 404, description = "Api, resource or operation not found under this chain.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "operations"
)]
pub async fn get_operation(
    Path((api_id, resource_id, operation_id)): Path<(String, String, String)>,
    headers: HeaderMap,
    Extension(manager): Extension<HierarchyManager>,
    Extension(gate): Extension<Gate>,
) -> Response {
    if let Err(err) = gate
        .authorize(&headers, Privilege::read(EntityKind::Operation))
        .await
    {
        return err.into_response();
    }

    match manager
        .find_operation(&api_id, &resource_id, &operation_id)
        .await
    {
        Ok(operation) => Json(operation).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/v1/apis/{api_id}/resources/{resource_id}/operations/{operation_id}",
    request_body = OperationInput,
    params(
        ("api_id" = String, Path, description = "Api id"),
        ("resource_id" = String, Path, description = "Resource id"),
        ("operation_id" = String, Path, description = "Operation id")
    ),
    responses(
        (status = 200, description = "Operation updated.", body = Operation),
        (status = 400, description = "Invalid input.", body = ErrorBody),
        (status = 401, description = "Missing or unknown bearer token.", body = ErrorBody),
        (status = 403, description = "Missing UPDATE_OPERATION.", body = ErrorBody),
        (status = 404, description = "Api, resource or operation not found under this chain.", body = ErrorBody),
        (status = 409, description = "Method and path already routed in this api.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "operations"
)]
pub async fn update_operation(
    Path((api_id, resource_id, operation_id)): Path<(String, String, String)>,
    headers: HeaderMap,
    Extension(manager): Extension<HierarchyManager>,
    Extension(gate): Extension<Gate>,
    payload: Result<Json<OperationInput>, JsonRejection>,
) -> Response {
    if let Err(err) = gate
        .authorize(&headers, Privilege::update(EntityKind::Operation))
        .await
    {
        return err.into_response();
    }

    let Json(input) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    match manager
        .update_operation(&api_id, &resource_id, &operation_id, input)
        .await
    {
        Ok(operation) => Json(operation).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/v1/apis/{api_id}/resources/{resource_id}/operations/{operation_id}",
    params(
        ("api_id" = String, Path, description = "Api id"),
        ("resource_id" = String, Path, description = "Resource id"),
        ("operation_id" = String, Path, description = "Operation id")
    ),
    responses(
        (status = 204, description = "Operation deleted, or it did not exist."),
        (status = 401, description = "Missing or unknown bearer token.", body = ErrorBody),
        (status = 403, description = "Missing DELETE_OPERATION.", body = ErrorBody),
        (status = 404, description = "Api or resource not found.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "operations"
)]
pub async fn delete_operation(
    Path((api_id, resource_id, operation_id)): Path<(String, String, String)>,
    headers: HeaderMap,
    Extension(manager): Extension<HierarchyManager>,
    Extension(gate): Extension<Gate>,
) -> Response {
    if let Err(err) = gate
        .authorize(&headers, Privilege::delete(EntityKind::Operation))
        .await
    {
        return err.into_response();
    }

    match manager
        .delete_operation(&api_id, &resource_id, &operation_id)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/v1/apis/{api_id}/operations",
    params(("api_id" = String, Path, description = "Api id")),
    responses(
        (status = 200, description = "Operations across every resource of the api.", body = [Operation]),
        (status = 401, description = "Missing or unknown bearer token.", body = ErrorBody),
        (status = 403, description = "Missing READ_OPERATION.", body = ErrorBody),
        (status = 404, description = "Api not found.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "operations"
)]
pub async fn list_api_operations(
    Path(api_id): Path<String>,
    headers: HeaderMap,
    Extension(manager): Extension<HierarchyManager>,
    Extension(gate): Extension<Gate>,
) -> Response {
    if let Err(err) = gate
        .authorize(&headers, Privilege::read(EntityKind::Operation))
        .await
    {
        return err.into_response();
    }

    match manager.list_operations_by_api(&api_id).await {
        Ok(operations) => Json(operations).into_response(),
        Err(err) => err.into_response(),
    }
}
