use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::{created, error::bad_request, ErrorBody, Gate};
use crate::{
    access::Privilege,
    hierarchy::HierarchyManager,
    model::{Api, ApiInput, EntityKind},
    pagination::{empty_as_none, PageParams},
};

/// Query string of `GET /v1/apis`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ApiListParams {
    /// Only apis mounted at this base path (trailing `/` ignored).
    #[serde(default, deserialize_with = "empty_as_none")]
    pub base_path: Option<String>,
    /// Zero-based page index.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<i64>,
    /// Maximum number of items per page.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub limit: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/v1/apis",
    params(ApiListParams),
    responses(
        (status = 200, description = "Apis in creation order, paged when `page` or `limit` is supplied.", body = [Api]),
        (status = 400, description = "Invalid paging parameters or base path.", body = ErrorBody),
        (status = 401, description = "Missing or unknown bearer token.", body = ErrorBody),
        (status = 403, description = "Missing READ_API.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "apis"
)]
pub async fn list_apis(
    headers: HeaderMap,
    Extension(manager): Extension<HierarchyManager>,
    Extension(gate): Extension<Gate>,
    query: Result<Query<ApiListParams>, QueryRejection>,
) -> Response {
    if let Err(err) = gate
        .authorize(&headers, Privilege::read(EntityKind::Api))
        .await
    {
        return err.into_response();
    }

    let Query(params) = match query {
        Ok(query) => query,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    let paging = PageParams {
        page: params.page,
        limit: params.limit,
    };

    match manager.list_apis(params.base_path.as_deref(), paging).await {
        Ok(listing) => Json(listing).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/v1/apis",
    request_body = ApiInput,
    responses(
        (status = 201, description = "Api created.", body = Api),
        (status = 400, description = "Invalid input or unknown environment/plan id.", body = ErrorBody),
        (status = 401, description = "Missing or unknown bearer token.", body = ErrorBody),
        (status = 403, description = "Missing CREATE_API.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "apis"
)]
pub async fn create_api(
    headers: HeaderMap,
    Extension(manager): Extension<HierarchyManager>,
    Extension(gate): Extension<Gate>,
    payload: Result<Json<ApiInput>, JsonRejection>,
) -> Response {
    if let Err(err) = gate
        .authorize(&headers, Privilege::create(EntityKind::Api))
        .await
    {
        return err.into_response();
    }

    let Json(input) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    match manager.create_api(input).await {
        Ok(api) => created(&format!("/v1/apis/{}", api.id), &api),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/v1/apis/{api_id}",
    params(("api_id" = String, Path, description = "Api id")),
    responses(
        (status = 200, description = "Api found.", body = Api),
        (status = 401, description = "Missing or unknown bearer token.", body = ErrorBody),
        (status = 403, description = "Missing READ_API.", body = ErrorBody),
        (status = 404, description = "Api not found.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "apis"
)]
pub async fn get_api(
    Path(api_id): Path<String>,
    headers: HeaderMap,
    Extension(manager): Extension<HierarchyManager>,
    Extension(gate): Extension<Gate>,
) -> Response {
    if let Err(err) = gate
        .authorize(&headers, Privilege::read(EntityKind::Api))
        .await
    {
        return err.into_response();
    }

    match manager.find_api(&api_id).await {
        Ok(api) => Json(api).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/v1/apis/{api_id}",
    request_body = ApiInput,
    params(("api_id" = String, Path, description = "Api id")),
    responses(
        (status = 200, description = "Api updated.", body = Api),
        (status = 400, description = "Invalid input or unknown environment/plan id.", body = ErrorBody),
        (status = 401, description = "Missing or unknown bearer token.", body = ErrorBody),
        (status = 403, description = "Missing UPDATE_API.", body = ErrorBody),
        (status = 404, description = "Api not found.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "apis"
)]
pub async fn update_api(
    Path(api_id): Path<String>,
    headers: HeaderMap,
    Extension(manager): Extension<HierarchyManager>,
    Extension(gate): Extension<Gate>,
    payload: Result<Json<ApiInput>, JsonRejection>,
) -> Response {
    if let Err(err) = gate
        .authorize(&headers, Privilege::update(EntityKind::Api))
        .await
    {
        return err.into_response();
    }

    let Json(input) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    match manager.update_api(&api_id, input).await {
        Ok(api) => Json(api).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/v1/apis/{api_id}",
    params(("api_id" = String, Path, description = "Api id")),
    responses(
        (status = 204, description = "Api deleted with its resources and operations."),
        (status = 401, description = "Missing or unknown bearer token.", body = ErrorBody),
        (status = 403, description = "Missing DELETE_API.", body = ErrorBody),
        (status = 404, description = "Api not found.", body = ErrorBody),
    ),
    security(("bearer" = [])),
    tag = "apis"
)]
pub async fn delete_api(
    Path(api_id): Path<String>,
    headers: HeaderMap,
    Extension(manager): Extension<HierarchyManager>,
    Extension(gate): Extension<Gate>,
) -> Response {
    if let Err(err) = gate
        .authorize(&headers, Privilege::delete(EntityKind::Api))
        .await
    {
        return err.into_response();
    }

    match manager.delete_api(&api_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}
